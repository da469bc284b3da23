use std::sync::Arc;

use anyhow::Context;
use healthbot_backend::{config::AppConfig, routes, state::AppState};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("refusing to start")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let state = Arc::new(AppState::new(&config)?);
    let cors = CorsLayer::very_permissive();
    let app = routes::create_router(state).layer(cors);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(
        %addr,
        model = %config.model,
        media_dir = %config.media_dir.display(),
        "HealthBot running"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
