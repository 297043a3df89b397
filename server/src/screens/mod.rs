//! Server-side listing screens.
//!
//! A screen holds one visitor's search, sort and page state over a fetched
//! collection, so each interaction only sends the change and gets back the
//! recomputed view.

mod manager;

pub use manager::{ScreenEntry, ScreenManager};
