//! Campus Server - listing screens, record writes and dashboard over the school API.
//!
//! The school REST API stays the system of record. This service fetches whole
//! collections from it, runs them through the `campus-engine` listing pipeline,
//! keeps per-visitor screen state, and validates writes before forwarding them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod screens;
pub mod source;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::screens::ScreenManager;
use crate::source::DataSource;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn DataSource>,
    pub screens: Arc<ScreenManager>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn DataSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
            screens: ScreenManager::new_shared(),
        }
    }
}

/// Build the router with tracing and CORS layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
