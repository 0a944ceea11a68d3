//! GROMACS GUI web server
//!
//! Run with: cargo run -p gmxgui-web

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use gmxgui_config::Config;
use gmxgui_web::{server, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gmxgui=debug,info")),
        )
        .init();

    info!("🧪 GROMACS GUI starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!("Could not load gmxgui.toml: {e}");
            warn!("Falling back to built-in defaults.");
            Config::default()
        }
    };
    info!(
        "Backend endpoint: {} (every {}s, timeout {}s)",
        config.monitor.endpoint, config.monitor.interval_secs, config.monitor.timeout_secs
    );

    let state = AppState::from_config(&config)?;
    let static_dir = server::resolve_static_dir(&config.server.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("🚀 Server listening on http://{}", listener.local_addr()?);

    server::serve(listener, state, static_dir, shutdown_signal()).await?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received"),
        Err(e) => {
            // Without a signal handler the server runs until killed
            error!("Could not install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}
