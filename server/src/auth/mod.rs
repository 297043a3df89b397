//! Caller identity.

mod middleware;

pub use middleware::{AuthUser, ROLE_HEADER};
