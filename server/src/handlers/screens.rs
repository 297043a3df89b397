//! Screen handlers - stateful listings driven one interaction at a time.

use campus_engine::{Capabilities, EntityKind, Screen, ScreenView};
use serde::{Deserialize, Serialize};

use super::{authorize, Action};
use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::screens::ScreenManager;
use crate::source::DataSource;

/// Request to open a screen.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenScreenRequest {
    pub entity: EntityKind,
    /// Falls back to the configured default
    pub page_size: Option<usize>,
}

/// Search box update.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub term: String,
}

/// Column header click.
#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub field: String,
}

/// Pagination control click.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum PageAction {
    Goto { page: usize },
    Next,
    Previous,
}

/// Page size selector change.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSizeRequest {
    pub page_size: usize,
}

/// A screen's current view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenResponse {
    pub id: String,
    pub capabilities: Capabilities,
    #[serde(flatten)]
    pub view: ScreenView,
}

fn fetch_alert(entity: EntityKind) -> String {
    format!("Could not load the {entity} list. Try again later.")
}

/// Open a screen and load its first collection.
///
/// A failed fetch still opens the screen, empty and carrying an alert.
pub async fn handle_open(
    source: &dyn DataSource,
    screens: &ScreenManager,
    default_page_size: usize,
    user: &AuthUser,
    request: OpenScreenRequest,
) -> Result<ScreenResponse> {
    let entity = request.entity;
    let capabilities = authorize(user, entity, Action::View)?;

    let mut screen = Screen::new(entity, request.page_size.unwrap_or(default_page_size))?;
    match source.fetch_all(entity, user.token()).await {
        Ok(records) => screen.replace_collection(records),
        Err(e) => {
            tracing::warn!(%entity, error = %e, "Initial fetch failed");
            screen.fetch_failed(fetch_alert(entity));
        }
    }

    let view = screen.view();
    let id = screens.register(user.0.clone(), screen);

    Ok(ScreenResponse {
        id,
        capabilities,
        view,
    })
}

/// Look up a screen the caller owns. Returns its entity and capabilities.
///
/// Ownership is the role and token the screen was opened with.
fn owned(
    screens: &ScreenManager,
    id: &str,
    user: &AuthUser,
) -> Result<(EntityKind, Capabilities)> {
    let (entity, owner) = screens
        .describe(id)
        .ok_or_else(|| AppError::NotFound(format!("screen {id}")))?;

    if owner != user.0 {
        tracing::warn!(screen_id = %id, role = %user.role(), "Screen owned by another caller");
        return Err(AppError::Forbidden(format!("screen {id} belongs to another user")));
    }

    Ok((entity, user.0.capabilities(entity)))
}

/// Apply `change` to an owned screen and return the new view.
fn apply(
    screens: &ScreenManager,
    id: &str,
    user: &AuthUser,
    change: impl FnOnce(&mut Screen) -> Result<()>,
) -> Result<ScreenResponse> {
    let (_, capabilities) = owned(screens, id, user)?;

    let view = screens
        .with_screen(id, |entry| -> Result<ScreenView> {
            change(&mut entry.screen)?;
            Ok(entry.screen.view())
        })
        .ok_or_else(|| AppError::NotFound(format!("screen {id}")))??;

    Ok(ScreenResponse {
        id: id.to_string(),
        capabilities,
        view,
    })
}

/// Current view, unchanged.
pub fn handle_get(screens: &ScreenManager, id: &str, user: &AuthUser) -> Result<ScreenResponse> {
    apply(screens, id, user, |_| Ok(()))
}

/// Update the search term. Goes back to page 1.
pub fn handle_search(
    screens: &ScreenManager,
    id: &str,
    user: &AuthUser,
    request: SearchRequest,
) -> Result<ScreenResponse> {
    apply(screens, id, user, |screen| {
        screen.set_search(request.term);
        Ok(())
    })
}

/// Toggle sorting on a column.
pub fn handle_sort(
    screens: &ScreenManager,
    id: &str,
    user: &AuthUser,
    request: SortRequest,
) -> Result<ScreenResponse> {
    apply(screens, id, user, |screen| {
        screen.toggle_sort(&request.field);
        Ok(())
    })
}

/// Move between pages.
pub fn handle_page(
    screens: &ScreenManager,
    id: &str,
    user: &AuthUser,
    action: PageAction,
) -> Result<ScreenResponse> {
    apply(screens, id, user, |screen| {
        match action {
            PageAction::Goto { page } => screen.go_to_page(page),
            PageAction::Next => screen.next_page(),
            PageAction::Previous => screen.previous_page(),
        }
        Ok(())
    })
}

/// Change the page size. Goes back to page 1.
pub fn handle_page_size(
    screens: &ScreenManager,
    id: &str,
    user: &AuthUser,
    request: PageSizeRequest,
) -> Result<ScreenResponse> {
    apply(screens, id, user, |screen| {
        screen.set_page_size(request.page_size)?;
        Ok(())
    })
}

/// Refetch the collection, keeping search, sort and page.
pub async fn handle_refresh(
    source: &dyn DataSource,
    screens: &ScreenManager,
    id: &str,
    user: &AuthUser,
) -> Result<ScreenResponse> {
    let (entity, _) = owned(screens, id, user)?;

    // Fetch before locking the entry.
    let fetched = source.fetch_all(entity, user.token()).await;

    apply(screens, id, user, |screen| {
        match fetched {
            Ok(records) => screen.replace_collection(records),
            Err(e) => {
                tracing::warn!(%entity, error = %e, "Refresh failed");
                screen.fetch_failed(fetch_alert(entity));
            }
        }
        Ok(())
    })
}

/// Dismiss the alert banner.
pub fn handle_dismiss_alert(
    screens: &ScreenManager,
    id: &str,
    user: &AuthUser,
) -> Result<ScreenResponse> {
    apply(screens, id, user, |screen| {
        screen.dismiss_alert();
        Ok(())
    })
}

/// Close a screen.
pub fn handle_close(screens: &ScreenManager, id: &str, user: &AuthUser) -> Result<()> {
    owned(screens, id, user)?;
    screens.unregister(id);
    Ok(())
}
