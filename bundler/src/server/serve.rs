//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::BundlerError;
use crate::server::handlers::{
    download_es_handler, download_logstash_handler, health_handler, save_es_handler,
    save_logstash_handler, templates_handler, test_cluster_handler, version_handler,
};
use crate::server::state::ServerState;

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Health and version
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        // Bundles
        .route(
            "/download_es_monitoring_configuration_files",
            post(download_es_handler),
        )
        .route(
            "/download_logstash_monitoring_configuration_files",
            post(download_logstash_handler),
        )
        .route(
            "/save_es_monitoring_configuration_files",
            post(save_es_handler),
        )
        .route(
            "/save_logstash_monitoring_configuration_files",
            post(save_logstash_handler),
        )
        // Cluster and templates
        .route("/test_cluster", post(test_cluster_handler))
        .route("/templates", get(templates_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), BundlerError>>, BundlerError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| BundlerError::ServerError(format!("{}: {}", addr, e)))?;
    info!("Listening on {}", addr);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| BundlerError::ServerError(e.to_string()))
    });

    Ok(handle)
}
