//! Termination signal wiring.
//!
//! The handler never touches controller state. It only broadcasts a unit
//! notification that the control loop polls between ticks.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Register termination handlers and forward the first signal to `shutdown`.
///
/// On Unix this listens for SIGINT and SIGTERM, elsewhere for Ctrl-C. Must
/// be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns an error if a signal handler cannot be registered.
pub fn spawn_shutdown_listener(
    shutdown: broadcast::Sender<()>,
) -> std::io::Result<JoinHandle<()>> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        Ok(tokio::spawn(async move {
            tokio::select! {
                _ = sigint.recv() => info!("Received SIGINT"),
                _ = sigterm.recv() => info!("Received SIGTERM"),
            }
            notify(&shutdown);
        }))
    }

    #[cfg(not(unix))]
    {
        Ok(tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Error waiting for Ctrl+C: {}", e);
                return;
            }
            info!("Received Ctrl+C");
            notify(&shutdown);
        }))
    }
}

fn notify(shutdown: &broadcast::Sender<()>) {
    if shutdown.send(()).is_err() {
        debug!("control loop already stopped");
    }
}
