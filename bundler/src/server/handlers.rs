//! HTTP request handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use cluster_models::{Cluster, ClusterIdentity, EnvironmentConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::bundle::{BundleKind, DiskSink, ZipSink};
use crate::errors::BundlerError;
use crate::server::state::ServerState;
use crate::utils::version_info;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "dbeast-bundler".to_string(),
        version: version_info().version,
    })
}

pub async fn version_handler() -> impl IntoResponse {
    Json(version_info())
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<String>,
    pub total: usize,
}

pub async fn templates_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let templates: Vec<String> = state.registry.ids().into_iter().map(String::from).collect();
    let total = templates.len();
    Json(TemplatesResponse { templates, total })
}

/// Decode a JSON body ourselves so malformed payloads get the JSON error body
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, BundlerError> {
    serde_json::from_slice(body).map_err(|e| BundlerError::InvalidPayload(e.to_string()))
}

async fn resolve_identity(
    state: &ServerState,
    cluster: &Cluster,
) -> Result<ClusterIdentity, BundlerError> {
    state
        .probe
        .identity(&cluster.cluster_connection_settings.prod.elasticsearch)
        .await
}

async fn download_bundle(
    state: &ServerState,
    kind: BundleKind,
    body: &[u8],
) -> Result<Response, BundlerError> {
    let cluster: Cluster = decode(body)?;
    debug!("Cluster description: {:?}", cluster);

    let identity = resolve_identity(state, &cluster).await?;

    let mut sink = ZipSink::new();
    state
        .assembler()
        .assemble(kind, &cluster, &identity, &mut sink)
        .await?;
    let archive = sink.finish()?;

    info!(
        "Serving {} ({} bytes) for cluster {}",
        kind.archive_name(),
        archive.len(),
        identity.slug()
    );

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", kind.archive_name()),
        ),
    ];
    Ok((StatusCode::OK, headers, archive).into_response())
}

pub async fn download_es_handler(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Response, BundlerError> {
    info!("Got request for the Elasticsearch configuration files generation");
    download_bundle(&state, BundleKind::Elasticsearch, &body).await
}

pub async fn download_logstash_handler(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Response, BundlerError> {
    info!("Got request for the Logstash configuration files generation");
    download_bundle(&state, BundleKind::Logstash, &body).await
}

/// Save response
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub folder: String,
    pub written: Vec<String>,
    pub failed: usize,
}

async fn save_bundle(
    state: &ServerState,
    kind: BundleKind,
    body: &[u8],
) -> Result<Json<SaveResponse>, BundlerError> {
    let cluster: Cluster = decode(body)?;
    let identity = resolve_identity(state, &cluster).await?;

    let mut sink = DiskSink::new(state.output_dir.clone());
    let summary = state
        .assembler()
        .assemble(kind, &cluster, &identity, &mut sink)
        .await?;

    Ok(Json(SaveResponse {
        folder: state.output_dir.path().display().to_string(),
        written: sink.into_written(),
        failed: summary.failed,
    }))
}

pub async fn save_es_handler(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Json<SaveResponse>, BundlerError> {
    info!("Got request to save the Elasticsearch configuration files");
    save_bundle(&state, BundleKind::Elasticsearch, &body).await
}

pub async fn save_logstash_handler(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Json<SaveResponse>, BundlerError> {
    info!("Got request to save the Logstash configuration files");
    save_bundle(&state, BundleKind::Logstash, &body).await
}

/// Check every endpoint of an environment description
pub async fn test_cluster_handler(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<impl IntoResponse, BundlerError> {
    let environments: EnvironmentConfig = decode(&body)?;
    Ok(Json(state.probe.status(&environments).await))
}
