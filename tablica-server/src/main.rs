mod routes;
mod state;

use anyhow::Result;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use tablica_core::config::TablicaConfig;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = TablicaConfig::load()?;
    let state = AppState::from_config(&config)?;

    if config.admin_password.is_none() {
        tracing::warn!("No admin_password configured, user events are read-only");
    }

    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!("tablica-server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::calendar::router())
        .merge(routes::user_calendar::router())
        .with_state(state)
        .layer(cors)
}
