use axum::{
    extract::Request,
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::dashboard;
use crate::dataset::DatasetRepo;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dataset: Arc<DatasetRepo>,
}

impl AppState {
    pub fn new(config: Config, dataset: Arc<DatasetRepo>) -> Self {
        Self {
            config: Arc::new(config),
            dataset,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/dataset", get(dashboard::get_dataset))
        .route("/api/reload", post(dashboard::reload_dataset))
        .route("/api/actors", get(dashboard::get_actors))
        .route("/api/films", get(dashboard::get_films))
        .route("/api/recommend/:actor", get(dashboard::get_recommendation))
        .route("/api/stats/films", get(dashboard::get_film_table))
        .route("/api/stats/ratings", get(dashboard::get_rating_histogram))
        .route("/api/stats/years", get(dashboard::get_films_per_year))
        .route("/api/stats/top-films", get(dashboard::get_top_films))
        .route("/api/stats/film/:film", get(dashboard::get_film_detail))
        .route("/api/stats/actors", get(dashboard::get_actor_summary))
        .route("/api/stats/top-actors", get(dashboard::get_top_actors))
        .route("/api/stats/actor/:actor", get(dashboard::get_actor_detail));

    let mut router = Router::new()
        .route("/", get(dashboard::about))
        .route("/health", get(dashboard::health))
        .route("/robots.txt", get(robots_txt_handler))
        .merge(api_routes)
        .fallback(fallback_handler);

    if let Some(ref appdir) = state.config.dashboard.appdir {
        router = router.fallback_service(ServeDir::new(appdir));
    }

    router
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::dataset_etag,
        ))
        .layer(axum::middleware::from_fn(crate::middleware::etag_validation))
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `build_router` behind path normalisation, applied before the inner router matches.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .fallback_service(build_router(state))
        .layer(axum::middleware::from_fn(crate::middleware::normalize_path))
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

async fn fallback_handler(req: Request) -> impl IntoResponse {
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
