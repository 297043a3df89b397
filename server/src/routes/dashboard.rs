//! Dashboard endpoint.

use axum::{extract::State, routing::get, Json, Router};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::{handle_dashboard, DashboardResponse};
use crate::AppState;

/// Create dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard_handler))
}

/// GET /dashboard - Totals and the subjects chart.
async fn dashboard_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DashboardResponse>> {
    Ok(Json(handle_dashboard(state.source.as_ref(), &auth).await?))
}
