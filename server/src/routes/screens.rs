//! Screen endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::{
    handle_close, handle_dismiss_alert, handle_get, handle_open, handle_page, handle_page_size,
    handle_refresh, handle_search, handle_sort, OpenScreenRequest, PageAction, PageSizeRequest,
    ScreenResponse, SearchRequest, SortRequest,
};
use crate::AppState;

/// Create screen routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/screens", post(open_handler))
        .route("/screens/{id}", get(get_handler).delete(close_handler))
        .route("/screens/{id}/search", post(search_handler))
        .route("/screens/{id}/sort", post(sort_handler))
        .route("/screens/{id}/page", post(page_handler))
        .route("/screens/{id}/page-size", post(page_size_handler))
        .route("/screens/{id}/refresh", post(refresh_handler))
        .route("/screens/{id}/alert", delete(dismiss_alert_handler))
}

/// POST /screens - Open a screen.
async fn open_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<OpenScreenRequest>,
) -> Result<(StatusCode, Json<ScreenResponse>)> {
    let response = handle_open(
        state.source.as_ref(),
        &state.screens,
        state.config.default_page_size,
        &auth,
        request,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /screens/{id} - Current view.
async fn get_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ScreenResponse>> {
    Ok(Json(handle_get(&state.screens, &id, &auth)?))
}

/// POST /screens/{id}/search
async fn search_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ScreenResponse>> {
    Ok(Json(handle_search(&state.screens, &id, &auth, request)?))
}

/// POST /screens/{id}/sort
async fn sort_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<SortRequest>,
) -> Result<Json<ScreenResponse>> {
    Ok(Json(handle_sort(&state.screens, &id, &auth, request)?))
}

/// POST /screens/{id}/page
async fn page_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(action): Json<PageAction>,
) -> Result<Json<ScreenResponse>> {
    Ok(Json(handle_page(&state.screens, &id, &auth, action)?))
}

/// POST /screens/{id}/page-size
async fn page_size_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<PageSizeRequest>,
) -> Result<Json<ScreenResponse>> {
    Ok(Json(handle_page_size(&state.screens, &id, &auth, request)?))
}

/// POST /screens/{id}/refresh - Refetch the collection.
async fn refresh_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ScreenResponse>> {
    let response = handle_refresh(state.source.as_ref(), &state.screens, &id, &auth).await?;
    Ok(Json(response))
}

/// DELETE /screens/{id}/alert
async fn dismiss_alert_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ScreenResponse>> {
    Ok(Json(handle_dismiss_alert(&state.screens, &id, &auth)?))
}

/// DELETE /screens/{id} - Leave the screen.
async fn close_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    handle_close(&state.screens, &id, &auth)?;
    Ok(StatusCode::NO_CONTENT)
}
