//! dbeast bundler - Entry Point
//!
//! Serves Logstash monitoring configuration bundles for Elasticsearch clusters.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use dbeast_bundler::app::options::AppOptions;
use dbeast_bundler::app::run::run;
use dbeast_bundler::filesys::file::File;
use dbeast_bundler::logs::{init_logging, LogOptions};
use dbeast_bundler::storage::layout::StorageLayout;
use dbeast_bundler::storage::settings::Settings;
use dbeast_bundler::utils::version_info;

use tracing::{error, info};

#[tokio::main]
async fn main() {
    // --key=value and bare --flag arguments
    let mut cli_args: HashMap<String, String> = HashMap::new();
    for arg in env::args().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            cli_args.insert(key.trim_start_matches('-').to_string(), value.to_string());
        } else if arg.starts_with("--") {
            cli_args.insert(arg.trim_start_matches('-').to_string(), "true".to_string());
        }
    }

    if cli_args.contains_key("version") {
        let version = version_info();
        println!("{} ({}, built {})", version.version, version.git_hash, version.build_time);
        return;
    }

    let layout = cli_args
        .get("base-dir")
        .map(StorageLayout::new)
        .unwrap_or_default();

    let settings_file = cli_args
        .get("settings")
        .map(File::new)
        .unwrap_or_else(|| layout.settings_file());
    let mut settings = match Settings::load_or_default(&settings_file).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file: {e}");
            return;
        }
    };

    if let Some(templates) = cli_args.get("templates") {
        settings.templates_dir = Some(templates.clone());
    }
    if let Some(port) = cli_args.get("port") {
        match port.parse() {
            Ok(port) => settings.server.port = port,
            Err(_) => {
                eprintln!("Invalid port: {port}");
                return;
            }
        }
    }
    if let Some(level) = cli_args.get("log-level") {
        match level.parse() {
            Ok(level) => settings.log_level = level,
            Err(e) => {
                eprintln!("{e}");
                return;
            }
        }
    }

    let log_options = LogOptions {
        log_level: settings.log_level,
        json_format: settings.log_json,
        log_dir: settings.log_dir.as_ref().map(PathBuf::from),
    };
    let _log_guard = match init_logging(&log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let options = AppOptions::from_settings(&settings, &layout);
    info!("Running dbeast bundler with options: {:?}", options);

    if let Err(e) = run(options, await_shutdown_signal()).await {
        error!("Bundler stopped with an error: {e}");
        std::process::exit(1);
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                error!("Unable to listen for SIGTERM: {e}");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => info!("SIGTERM received, shutting down..."),
            _ = tokio::signal::ctrl_c() => info!("Ctrl+C received, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Ctrl+C received, shutting down...");
    }
}
