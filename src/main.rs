use std::sync::Arc;

use anyhow::{Context, Result};
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stacks_api::config::Settings;
use stacks_api::server::{self, routes, snapshot, AppState, CorsPolicy};
use stacks_api::service::finance::FinanceService;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let settings = Settings::from_env()?;
    info!(?settings, "Loaded settings");

    info!("Initializing FinanceService...");
    let finance = Arc::new(FinanceService::new(settings.yahoo_proxy.clone())?);
    let state = AppState::new(finance, &settings);

    let cors = CorsPolicy::new(&settings.allowed_origin, settings.cors_max_age)
        .with_context(|| format!("invalid CORS_ALLOWED_ORIGIN {:?}", settings.allowed_origin))?;
    let api = routes::router(state.clone(), cors);
    let api_listener = TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    match settings.snapshot_bind_addr {
        Some(addr) => {
            let snapshot_listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            tokio::try_join!(
                server::serve(api_listener, api, "api"),
                server::serve(snapshot_listener, snapshot::router(state), "snapshot"),
            )?;
        }
        None => {
            info!("Snapshot endpoints disabled (SNAPSHOT_BIND_ADDR=off)");
            server::serve(api_listener, api, "api").await?;
        }
    }

    Ok(())
}

/// Log at info for this crate unless RUST_LOG says otherwise.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stacks_api=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
