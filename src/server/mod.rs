use std::{sync::Arc, time::Duration};

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Settings;
use crate::service::finance::MarketDataProvider;

pub mod cors;
pub mod error;
pub mod routes;
pub mod snapshot;

pub use cors::CorsPolicy;
pub use error::{ApiError, ErrorBody};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MarketDataProvider>,
    pub stream_event_delay: Duration,
}

impl AppState {
    pub fn new(provider: Arc<dyn MarketDataProvider>, settings: &Settings) -> Self {
        Self {
            provider,
            stream_event_delay: settings.stream_event_delay,
        }
    }
}

/// Serve `app` on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router, name: &'static str) -> std::io::Result<()> {
    info!(app = name, addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(app = name, "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}
