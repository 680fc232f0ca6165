use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use tracing::{info, warn};

use super::pages::render_about;
use super::types::*;
use crate::dataset::stats::{
    self, ActorSummary, FilmRow, YearCount, DEFAULT_HISTOGRAM_BINS, MAX_HISTOGRAM_BINS,
};
use crate::dataset::{ReloadOutcome, Snapshot};
use crate::recommend::{recommend, Recommendation, RecommendError};
use crate::server::AppState;
use crate::util::{generate_id, paginate, Page, QueryError, QueryParams};

const DEFAULT_TOP_LIMIT: usize = 10;

fn bad_request(e: QueryError) -> StatusCode {
    warn!("Bad request: {}", e);
    StatusCode::BAD_REQUEST
}

/// Sorted names narrowed by the optional case-insensitive `q` substring, then paginated.
fn name_list(names: Vec<String>, params: &QueryParams) -> Result<Page<NameIdPair>, StatusCode> {
    let needle = params.get("q").map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());

    let items: Vec<NameIdPair> = names
        .into_iter()
        .filter(|name| {
            needle
                .as_deref()
                .map_or(true, |q| name.to_lowercase().contains(q))
        })
        .map(|name| {
            let id = generate_id(&name);
            NameIdPair { name, id }
        })
        .collect();

    paginate(items, params).map_err(bad_request)
}

pub async fn about(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.dataset.snapshot();
    Html(render_about(&state.config.dashboard.title, &snapshot))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

fn dataset_info(snapshot: &Snapshot) -> DatasetInfo {
    let dataset = &snapshot.dataset;
    DatasetInfo {
        path: dataset.source.to_string_lossy().to_string(),
        rows: dataset.len(),
        skipped_rows: dataset.skipped,
        actors: snapshot.model.len(),
        films: dataset.films().len(),
        fingerprint: dataset.fingerprint.clone(),
        loaded_at: dataset.loaded_at,
    }
}

pub async fn get_dataset(State(state): State<AppState>) -> Json<DatasetInfo> {
    Json(dataset_info(&state.dataset.snapshot()))
}

pub async fn get_actors(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Page<NameIdPair>>, StatusCode> {
    let snapshot = state.dataset.snapshot();
    let names = snapshot.model.actors().to_vec();
    Ok(Json(name_list(names, &params)?))
}

pub async fn get_films(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Page<NameIdPair>>, StatusCode> {
    let snapshot = state.dataset.snapshot();
    Ok(Json(name_list(snapshot.dataset.films(), &params)?))
}

pub async fn get_recommendation(
    State(state): State<AppState>,
    Path(actor): Path<String>,
) -> Result<Json<Recommendation>, StatusCode> {
    let snapshot = state.dataset.snapshot();

    match recommend(&snapshot.dataset, &snapshot.model, &actor, &state.config.recommend) {
        Ok(rec) => {
            info!(
                actor = %actor,
                similar = rec.similar_actors.len(),
                films = rec.films.len(),
                "Recommendation served"
            );
            Ok(Json(rec))
        }
        Err(RecommendError::UnknownActor(_)) => Err(StatusCode::NOT_FOUND),
    }
}

pub async fn get_film_table(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Page<FilmRow>>, StatusCode> {
    let snapshot = state.dataset.snapshot();
    let films = stats::film_table(&snapshot.dataset);
    Ok(Json(paginate(films, &params).map_err(bad_request)?))
}

pub async fn get_rating_histogram(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<RatingHistogram>, StatusCode> {
    let bins = params
        .usize_or("bins", DEFAULT_HISTOGRAM_BINS)
        .map_err(bad_request)?;
    if bins == 0 || bins > MAX_HISTOGRAM_BINS {
        return Err(StatusCode::BAD_REQUEST);
    }

    let snapshot = state.dataset.snapshot();
    Ok(Json(RatingHistogram {
        bins: stats::rating_histogram(&snapshot.dataset, bins),
    }))
}

pub async fn get_films_per_year(State(state): State<AppState>) -> Json<Vec<YearCount>> {
    let snapshot = state.dataset.snapshot();
    Json(stats::films_per_year(&snapshot.dataset))
}

pub async fn get_top_films(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<FilmRow>>, StatusCode> {
    let limit = params.usize_or("limit", DEFAULT_TOP_LIMIT).map_err(bad_request)?;
    let snapshot = state.dataset.snapshot();
    Ok(Json(stats::top_films(&snapshot.dataset, limit)))
}

pub async fn get_film_detail(
    State(state): State<AppState>,
    Path(film): Path<String>,
) -> Result<Json<FilmDetail>, StatusCode> {
    let snapshot = state.dataset.snapshot();
    let actors = stats::film_detail(&snapshot.dataset, &film).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(FilmDetail { film, actors }))
}

pub async fn get_actor_summary(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Page<ActorSummary>>, StatusCode> {
    let snapshot = state.dataset.snapshot();
    let summary = stats::actor_summary(&snapshot.dataset);
    Ok(Json(paginate(summary, &params).map_err(bad_request)?))
}

pub async fn get_top_actors(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<ActorSummary>>, StatusCode> {
    let limit = params.usize_or("limit", DEFAULT_TOP_LIMIT).map_err(bad_request)?;
    let snapshot = state.dataset.snapshot();
    Ok(Json(stats::top_actors(&snapshot.dataset, limit)))
}

pub async fn get_actor_detail(
    State(state): State<AppState>,
    Path(actor): Path<String>,
) -> Result<Json<ActorDetail>, StatusCode> {
    let snapshot = state.dataset.snapshot();
    let films = stats::actor_detail(&snapshot.dataset, &actor).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(ActorDetail { actor, films }))
}

pub async fn reload_dataset(State(state): State<AppState>) -> Result<Json<ReloadStatus>, StatusCode> {
    let repo = state.dataset.clone();
    let outcome = tokio::task::spawn_blocking(move || repo.reload(true))
        .await
        .map_err(|e| {
            warn!("Reload task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            warn!("Reload failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let snapshot = state.dataset.snapshot();
    Ok(Json(ReloadStatus {
        reloaded: outcome == ReloadOutcome::Reloaded,
        rows: snapshot.dataset.len(),
        fingerprint: snapshot.dataset.fingerprint.clone(),
    }))
}
