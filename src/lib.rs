pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod middleware;
pub mod recommend;
pub mod server;
pub mod util;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Dataset error: {0}")]
    Dataset(#[from] dataset::DatasetError),
    #[error("Recommendation error: {0}")]
    Recommend(#[from] recommend::RecommendError),
    #[error("Server error: {0}")]
    Server(String),
}

pub async fn run(config_path: &str, debug_logs: bool) -> Result<(), ServerError> {
    let mut config = config::Config::from_file(config_path)?;
    config.debug_logs = debug_logs;

    info!("Using config file: {}", config_path);
    if debug_logs {
        info!("Debug logging enabled");
    }

    let dataset_path = config.dataset_path();
    info!("Loading dataset from {}", dataset_path.display());
    let repo = tokio::task::spawn_blocking(move || dataset::DatasetRepo::open(dataset_path))
        .await
        .map_err(|e| ServerError::Server(format!("Dataset loader failed: {}", e)))??;
    let repo = Arc::new(repo);

    if let Some(interval) = config.dataset.reload_interval {
        info!("Watching dataset for changes every {}s", interval);
        repo.clone().start_background_reload(interval);
    }

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls_paths = config
        .tls_paths()
        .map(|(cert, key)| (cert.to_string(), key.to_string()));

    let state = server::AppState::new(config, repo);
    let app = server::build_app(state);

    if let Some((cert_path, key_path)) = tls_paths {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}

/// Load `dataset_path` and compute a single recommendation, without starting the server.
pub fn recommend_once(
    dataset_path: &Path,
    actor: &str,
    options: &config::RecommendConfig,
) -> Result<recommend::Recommendation, ServerError> {
    let snapshot = dataset::Snapshot::new(dataset::load_csv(dataset_path)?);
    Ok(recommend::recommend(&snapshot.dataset, &snapshot.model, actor, options)?)
}
