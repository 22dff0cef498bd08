//! API models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Connection settings for one Elasticsearch or Kibana endpoint
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub host: String,
    pub authentication_enabled: bool,
    pub username: String,
    pub password: String,
    pub status: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("authentication_enabled", &self.authentication_enabled)
            .field("username", &self.username)
            .field("password", &"***")
            .field("status", &self.status)
            .finish()
    }
}

/// Production environment: the monitored cluster and its Kibana
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProdEnvironment {
    pub elasticsearch: Credentials,
    pub kibana: Credentials,
}

/// Monitoring environment: the cluster receiving the collected data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonEnvironment {
    pub elasticsearch: Credentials,
}

/// The two environments a bundle may reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub prod: ProdEnvironment,
    pub mon: MonEnvironment,
}

/// One selectable configuration template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationCheckbox {
    pub label: String,
    pub id: String,
    pub is_checked: bool,
}

/// A Logstash node that receives a per-host file set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogstashHost {
    pub server_address: String,
    pub logstash_api_host: String,
    pub logstash_logs_folder: String,
}

/// Templates and hosts for Logstash self-monitoring bundles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogstashMonitoringConfigurationFiles {
    pub configurations: Vec<ConfigurationCheckbox>,
    pub hosts: Vec<LogstashHost>,
}

/// Template selections for both bundle kinds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogstashConfigurations {
    pub es_monitoring_configuration_files: Vec<ConfigurationCheckbox>,
    pub logstash_monitoring_configuration_files: LogstashMonitoringConfigurationFiles,
}

/// Cluster description sent by the UI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    pub cluster_connection_settings: EnvironmentConfig,
    pub logstash_configurations: LogstashConfigurations,
}

/// Resolved name and uuid of the production cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterIdentity {
    pub name: String,
    pub id: String,
}

impl ClusterIdentity {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    /// `{name}-{id}`, used as the bundle folder and pipeline suffix
    pub fn slug(&self) -> String {
        format!("{}-{}", self.name, self.id)
    }
}

/// Reachability of a single endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub status: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProdStatus {
    pub elasticsearch: Status,
    pub kibana: Status,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonStatus {
    pub elasticsearch: Status,
}

/// Status of every endpoint in an [`EnvironmentConfig`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusData {
    pub prod: ProdStatus,
    pub mon: MonStatus,
}
