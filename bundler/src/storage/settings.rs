//! Settings file management

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::BundlerError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Bundler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON formatted logs
    #[serde(default)]
    pub log_json: bool,

    /// Optional folder for rolling log files
    #[serde(default)]
    pub log_dir: Option<String>,

    #[serde(default)]
    pub server: ServerSettings,

    /// Template folder, defaults to `<base>/templates`
    #[serde(default)]
    pub templates_dir: Option<String>,

    /// Root for saved configuration files, defaults to `<base>/logstash_configurations`
    #[serde(default)]
    pub output_dir: Option<String>,

    #[serde(default)]
    pub probe: ProbeSettings,

    /// Fail bundles that select a template that was not loaded
    #[serde(default)]
    pub strict_templates: bool,

    /// Fail the bundle on the first entry that cannot be written
    #[serde(default = "default_true")]
    pub abort_on_write_failure: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_json: false,
            log_dir: None,
            server: ServerSettings::default(),
            templates_dir: None,
            output_dir: None,
            probe: ProbeSettings::default(),
            strict_templates: false,
            abort_on_write_failure: true,
        }
    }
}

impl Settings {
    /// Read settings from `file`, falling back to defaults when it is absent
    pub async fn load_or_default(file: &File) -> Result<Self, BundlerError> {
        if !file.exists().await {
            info!(
                "No settings file at {}, using defaults",
                file.path().display()
            );
            return Ok(Self::default());
        }
        file.read_json().await.map_err(|e| {
            BundlerError::ConfigError(format!("{}: {}", file.path().display(), e))
        })
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_server_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8090
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

/// Settings for calls to the monitored cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSettings {
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_probe_timeout() -> u64 {
    10
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout(),
            accept_invalid_certs: false,
        }
    }
}
