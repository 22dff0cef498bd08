//! Application configuration options

use std::path::PathBuf;
use std::time::Duration;

use crate::bundle::{GenerationOptions, WriteFailurePolicy};
use crate::http::client::ClientOptions;
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;
use crate::templates::TemplatePolicy;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub server: ServerOptions,

    /// Folder the template registry is loaded from
    pub templates_dir: PathBuf,

    /// Root folder for the save routes
    pub output_dir: PathBuf,

    pub generation: GenerationOptions,

    pub client: ClientOptions,

    /// Upper bound for in-flight requests to drain on shutdown
    pub max_shutdown_delay: Duration,
}

impl AppOptions {
    /// Resolve settings against the storage layout
    pub fn from_settings(settings: &Settings, layout: &StorageLayout) -> Self {
        let templates_dir = settings
            .templates_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| layout.templates_dir().path().to_path_buf());
        let output_dir = settings
            .output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| layout.output_dir().path().to_path_buf());

        Self {
            server: ServerOptions {
                host: settings.server.host.clone(),
                port: settings.server.port,
            },
            templates_dir,
            output_dir,
            generation: GenerationOptions {
                template_policy: if settings.strict_templates {
                    TemplatePolicy::Strict
                } else {
                    TemplatePolicy::Lenient
                },
                write_failure_policy: if settings.abort_on_write_failure {
                    WriteFailurePolicy::Abort
                } else {
                    WriteFailurePolicy::Continue
                },
            },
            client: ClientOptions {
                timeout: Duration::from_secs(settings.probe.timeout_secs),
                accept_invalid_certs: settings.probe.accept_invalid_certs,
            },
            ..Default::default()
        }
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        let layout = StorageLayout::default();
        Self {
            server: ServerOptions::default(),
            templates_dir: layout.templates_dir().path().to_path_buf(),
            output_dir: layout.output_dir().path().to_path_buf(),
            generation: GenerationOptions::default(),
            client: ClientOptions::default(),
            max_shutdown_delay: Duration::from_secs(30),
        }
    }
}

/// Local HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8090,
        }
    }
}
