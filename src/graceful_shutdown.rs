//! Graceful shutdown

use tokio::signal;

/// Wait for a shutdown signal
///
/// Resolves on Ctrl+C, or on SIGTERM on unix; the server finishes its
/// in-flight requests before the process exits. With the in-memory
/// storage this is also the moment all notes disappear.
pub async fn handler() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Valid CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Valid terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, finishing in-flight requests");
}
