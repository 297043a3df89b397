//! Record handlers - create, update and delete forwarded to the upstream API.

use campus_engine::{validate_record, EntityKind};
use serde_json::Value;

use super::{authorize, Action};
use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::screens::ScreenManager;
use crate::source::DataSource;

/// Validate and create a record.
pub async fn handle_create(
    source: &dyn DataSource,
    screens: &ScreenManager,
    entity: EntityKind,
    user: &AuthUser,
    payload: Value,
) -> Result<Value> {
    authorize(user, entity, Action::Edit)?;
    validate_record(entity, &payload, false)?;

    let created = source.create(entity, payload, user.token()).await?;
    tracing::info!(%entity, role = %user.role(), "Record created");

    refresh_open_screens(source, screens, entity).await;
    Ok(created)
}

/// Validate and update the record with `id`.
///
/// The id from the path wins over any id in the body.
pub async fn handle_update(
    source: &dyn DataSource,
    screens: &ScreenManager,
    entity: EntityKind,
    user: &AuthUser,
    id: &str,
    mut payload: Value,
) -> Result<Value> {
    authorize(user, entity, Action::Edit)?;

    let Some(fields) = payload.as_object_mut() else {
        return Err(AppError::BadRequest("expected a JSON object".into()));
    };
    let id_value = id
        .parse::<u64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(id));
    fields.insert("id".into(), id_value);

    validate_record(entity, &payload, true)?;

    let updated = source.update(entity, payload, user.token()).await?;
    tracing::info!(%entity, %id, role = %user.role(), "Record updated");

    refresh_open_screens(source, screens, entity).await;
    Ok(updated)
}

/// Delete the record with `id`.
pub async fn handle_delete(
    source: &dyn DataSource,
    screens: &ScreenManager,
    entity: EntityKind,
    user: &AuthUser,
    id: &str,
) -> Result<()> {
    authorize(user, entity, Action::Delete)?;

    source.delete(entity, id, user.token()).await?;
    tracing::info!(%entity, %id, role = %user.role(), "Record deleted");

    refresh_open_screens(source, screens, entity).await;
    Ok(())
}

/// Refetch `entity` for every open screen showing it.
///
/// Each distinct owner gets a fetch made with its own token, so a screen
/// only ever holds what its owner could list. A failed refetch leaves that
/// owner's screens on their previous collection.
pub async fn refresh_open_screens(
    source: &dyn DataSource,
    screens: &ScreenManager,
    entity: EntityKind,
) {
    if !screens.has_screens_for(entity) {
        return;
    }

    for owner in screens.owners_for(entity) {
        match source.fetch_all(entity, owner.token.as_deref()).await {
            Ok(records) => {
                screens.replace_collection_for(entity, &owner, &records);
            }
            Err(e) => {
                tracing::warn!(
                    %entity,
                    role = %owner.role,
                    error = %e,
                    "Failed to refresh open screens"
                );
            }
        }
    }
}
