//! Meridian Console Kernel
//!
//! HTTP server for the console's access data and IPO queries.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use meridian_kernel::{AppState, Config, build_router};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting Meridian console kernel");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        port = config.port,
        api = %config.api_base_url,
        "Configuration loaded"
    );

    let state = AppState::new(&config).context("failed to initialize application state")?;

    // Server routes are optional at startup; the console works on the
    // static table until they arrive.
    if config.load_remote_routes {
        match state.access().load_remote(state.api()).await {
            Ok(access) => info!(routes = access.flat_route_list.len(), "Server routes loaded"),
            Err(e) => warn!(error = %e, "continuing with static routes only"),
        }
    }

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,reqwest=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
