//! Record endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use campus_engine::EntityKind;
use serde_json::Value;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::{
    handle_create, handle_delete, handle_list, handle_update, ListQuery, ListResponse,
};
use crate::AppState;

/// Create record routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/{entity}", get(list_handler).post(create_handler))
        .route("/api/{entity}/{id}", put(update_handler).delete(delete_handler))
}

fn parse_entity(raw: &str) -> Result<EntityKind> {
    Ok(raw.parse::<EntityKind>()?)
}

/// GET /api/{entity} - One page of a collection.
async fn list_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entity): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let entity = parse_entity(&entity)?;
    let response = handle_list(
        state.source.as_ref(),
        state.config.default_page_size,
        entity,
        &auth,
        query,
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/{entity} - Create a record.
async fn create_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(entity): Path<String>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>)> {
    let entity = parse_entity(&entity)?;
    let created = handle_create(
        state.source.as_ref(),
        &state.screens,
        entity,
        &auth,
        payload,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/{entity}/{id} - Update a record.
async fn update_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((entity, id)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>> {
    let entity = parse_entity(&entity)?;
    let updated = handle_update(
        state.source.as_ref(),
        &state.screens,
        entity,
        &auth,
        &id,
        payload,
    )
    .await?;
    Ok(Json(updated))
}

/// DELETE /api/{entity}/{id} - Delete a record.
async fn delete_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((entity, id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let entity = parse_entity(&entity)?;
    handle_delete(state.source.as_ref(), &state.screens, entity, &auth, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
