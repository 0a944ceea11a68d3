//! HTTP server lifecycle: static asset lookup and graceful shutdown.

use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::router::build_router;
use crate::state::AppState;

/// Use the configured asset directory when it exists, otherwise the one
/// shipped next to this crate.
pub fn resolve_static_dir(configured: &str) -> PathBuf {
    let path = PathBuf::from(configured);
    if path.is_dir() {
        return path;
    }
    let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("static");
    warn!("Static directory {} not found, serving {}", configured, bundled.display());
    bundled
}

/// Serve until `signal` resolves, then end open event streams and drain
/// remaining connections.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    static_dir: PathBuf,
    signal: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let shutdown = state.shutdown_handle();
    let app = build_router(state, static_dir);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            info!("Shutting down, closing event streams");
            shutdown.trigger();
        })
        .await
}
