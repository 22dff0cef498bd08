//! Cluster probe: identity resolution and endpoint status

use async_trait::async_trait;
use cluster_models::{ClusterIdentity, Credentials, EnvironmentConfig, Status, StatusData};
use tracing::{info, warn};

use crate::errors::BundlerError;
use crate::http::client::HttpClient;

pub const STATUS_ERROR: &str = "ERROR";

#[async_trait]
pub trait ClusterProbe: Send + Sync {
    /// Name and uuid of the cluster behind `credentials`
    async fn identity(&self, credentials: &Credentials) -> Result<ClusterIdentity, BundlerError>;

    /// Reachability of every endpoint in `environments`
    async fn status(&self, environments: &EnvironmentConfig) -> StatusData;
}

fn to_status(result: Result<String, BundlerError>, what: &str) -> Status {
    match result {
        Ok(status) => Status {
            status,
            error: String::new(),
        },
        Err(e) => {
            warn!("{} is unreachable: {}", what, e);
            Status {
                status: STATUS_ERROR.to_string(),
                error: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ClusterProbe for HttpClient {
    async fn identity(&self, credentials: &Credentials) -> Result<ClusterIdentity, BundlerError> {
        let identity = self.cluster_identity(credentials).await.map_err(|e| match e {
            BundlerError::Identity(_) => e,
            other => BundlerError::Identity(other.to_string()),
        })?;
        info!(
            "Resolved cluster {} ({}) at {}",
            identity.name, identity.id, credentials.host
        );
        Ok(identity)
    }

    async fn status(&self, environments: &EnvironmentConfig) -> StatusData {
        let (prod_es, prod_kibana, mon_es) = tokio::join!(
            self.cluster_health(&environments.prod.elasticsearch),
            self.kibana_status(&environments.prod.kibana),
            self.cluster_health(&environments.mon.elasticsearch),
        );

        let mut data = StatusData::default();
        data.prod.elasticsearch = to_status(prod_es.map(|h| h.status), "prod elasticsearch");
        data.prod.kibana = to_status(prod_kibana, "prod kibana");
        data.mon.elasticsearch = to_status(mon_es.map(|h| h.status), "mon elasticsearch");
        data
    }
}
