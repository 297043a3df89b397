//! HTTP route definitions.

mod api;
mod dashboard;
mod health;
mod screens;

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(api::routes())
        .merge(screens::routes())
        .merge(dashboard::routes())
}
