//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{error, info};

use crate::app::options::AppOptions;
use crate::errors::BundlerError;
use crate::filesys::dir::Dir;
use crate::http::client::HttpClient;
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::templates::TemplateRegistry;

/// Load templates, start the HTTP server and run until `shutdown_signal` fires
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), BundlerError> {
    info!("Initializing dbeast bundler...");

    // The registry is complete before the first request can be accepted
    let registry = TemplateRegistry::load(&Dir::new(&options.templates_dir)).await?;
    if registry.is_empty() {
        error!(
            "No templates found in {}, every bundle will be empty",
            options.templates_dir.display()
        );
    }

    let client = HttpClient::new(&options.client)?;
    let state = ServerState::new(
        Arc::new(registry),
        Arc::new(client),
        options.generation,
        Dir::new(&options.output_dir),
    );

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = serve(&options.server, Arc::new(state), async move {
        let _ = stop_rx.await;
    })
    .await?;

    tokio::select! {
        _ = shutdown_signal => {
            info!("Shutdown signal received, draining requests...");
        }
        joined = &mut server => {
            // server stopped on its own
            return joined.map_err(|e| BundlerError::ServerError(e.to_string()))?;
        }
    }

    let _ = stop_tx.send(());
    match tokio::time::timeout(options.max_shutdown_delay, server).await {
        Ok(joined) => {
            joined.map_err(|e| BundlerError::ServerError(e.to_string()))??;
            info!("Shutdown complete");
            Ok(())
        }
        Err(_) => {
            error!(
                "Shutdown timed out after {:?}",
                options.max_shutdown_delay
            );
            Err(BundlerError::ServerError("shutdown timed out".to_string()))
        }
    }
}
