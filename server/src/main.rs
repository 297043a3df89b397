//! Campus Server binary.

use std::sync::Arc;

use campus_server::config::Config;
use campus_server::source::HttpSource;
use campus_server::{app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Campus Server on {}:{}", config.host, config.port);

    let source = HttpSource::new(
        config.upstream_url.clone(),
        config.upstream_token.clone(),
        config.upstream_timeout,
    )?;
    tracing::info!(upstream = %source.base_url(), "Using upstream API");

    let addr = format!("{}:{}", config.host, config.port);
    let screen_idle = config.screen_idle;
    let state = AppState::new(config, Arc::new(source));

    // Browsers that leave without closing their screen never send DELETE.
    let _sweep = state.screens.spawn_idle_sweep(screen_idle);
    tracing::info!(idle_secs = screen_idle.as_secs(), "Screen idle sweep started");

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
