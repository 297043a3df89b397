//! Request handlers.

mod dashboard;
mod listing;
mod records;
mod screens;

pub use dashboard::*;
pub use listing::*;
pub use records::*;
pub use screens::*;

use campus_engine::{Capabilities, EntityKind};

use crate::auth::AuthUser;
use crate::error::{AppError, Result};

/// Capability a request needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Delete,
}

/// Check the caller may perform `action` on `entity`.
pub fn authorize(user: &AuthUser, entity: EntityKind, action: Action) -> Result<Capabilities> {
    let caps = user.0.capabilities(entity);
    let allowed = match action {
        Action::View => caps.view,
        Action::Edit => caps.edit,
        Action::Delete => caps.delete,
    };

    if allowed {
        Ok(caps)
    } else {
        tracing::warn!(role = %user.role(), %entity, ?action, "Permission denied");
        Err(AppError::Forbidden(format!(
            "{} may not {} {}",
            user.role(),
            match action {
                Action::View => "view",
                Action::Edit => "edit",
                Action::Delete => "delete",
            },
            entity
        )))
    }
}
