//! Elasticsearch and Kibana API calls

use cluster_models::{ClusterIdentity, Credentials};
use serde::Deserialize;

use crate::errors::BundlerError;
use crate::http::client::HttpClient;

/// Subset of the `GET /` banner
#[derive(Debug, Clone, Deserialize)]
pub struct RootInfo {
    pub cluster_name: String,
    pub cluster_uuid: String,
}

/// Subset of `GET /_cluster/health`
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterHealth {
    pub status: String,
}

impl HttpClient {
    /// Resolve cluster name and uuid from the root endpoint
    pub async fn cluster_identity(
        &self,
        credentials: &Credentials,
    ) -> Result<ClusterIdentity, BundlerError> {
        let info: RootInfo = self.get(credentials, "/").await?;
        Ok(ClusterIdentity::new(info.cluster_name, info.cluster_uuid))
    }

    pub async fn cluster_health(
        &self,
        credentials: &Credentials,
    ) -> Result<ClusterHealth, BundlerError> {
        self.get(credentials, "/_cluster/health").await
    }

    /// Overall Kibana state; 8.x reports `level`, 7.x reports `state`
    pub async fn kibana_status(&self, credentials: &Credentials) -> Result<String, BundlerError> {
        let body: serde_json::Value = self.get(credentials, "/api/status").await?;
        let overall = &body["status"]["overall"];
        let status = overall["level"]
            .as_str()
            .or_else(|| overall["state"].as_str())
            .unwrap_or("available");
        Ok(status.to_string())
    }
}
