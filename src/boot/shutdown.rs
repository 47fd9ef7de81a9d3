//! Graceful Shutdown Handler
//!
//! Handles OS signals and tears down the registered extensions.

use super::Bootstrapper;
use std::sync::Arc;
use tokio::signal;

/// Drives a graceful shutdown when the process receives a signal.
///
/// `ShutdownHandler` listens for SIGTERM and SIGINT and runs the
/// bootstrapper's shutdown sequence when one arrives.
///
/// # Example
///
/// ```rust,ignore
/// let bootstrapper = Arc::new(bootstrapper);
/// let handler = ShutdownHandler::new(Arc::clone(&bootstrapper));
///
/// tokio::spawn(async move {
///     handler.wait_for_shutdown().await;
///     std::process::exit(0);
/// });
/// ```
pub struct ShutdownHandler {
    bootstrapper: Arc<Bootstrapper>,
}

impl ShutdownHandler {
    /// Create a new ShutdownHandler
    pub fn new(bootstrapper: Arc<Bootstrapper>) -> Self {
        Self { bootstrapper }
    }

    /// Wait for a shutdown signal and tear down the extensions.
    ///
    /// This method blocks until either SIGTERM or SIGINT is received, then
    /// runs the shutdown sequence. A failing extension is logged; there is
    /// nobody left to propagate the error to at this point.
    pub async fn wait_for_shutdown(&self) {
        shutdown_signal().await;

        tracing::info!("Starting graceful shutdown...");
        if let Err(e) = self.bootstrapper.shutdown().await {
            tracing::error!("Error during shutdown: {}", e);
        }
        tracing::info!("Graceful shutdown complete");
    }
}

/// Create a future that completes when a shutdown signal is received
///
/// This is a standalone function that can be used without a ShutdownHandler.
///
/// # Example
///
/// ```rust,ignore
/// tokio::select! {
///     _ = shutdown_signal() => {
///         println!("Shutdown signal received");
///     }
///     _ = server.serve() => {}
/// }
/// ```
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
