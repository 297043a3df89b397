//! # Campus Engine
//!
//! A deterministic listing engine for the Campus school administration
//! screens (administrators, teachers, students and subjects).
//!
//! Every listing screen does the same thing: take the full collection
//! fetched from the school API, keep the records matching the search box,
//! order them by the selected column, and show one page. This crate does
//! that once, driven by a per-entity field-descriptor table.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine never fetches; callers hand it a collection
//! - **Deterministic**: same inputs always produce the same page
//! - **Permissive**: missing fields read as empty, unknown sort columns are
//!   ignored, out-of-range pages fall back to page 1
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`Record`] is a read-only JSON snapshot. Nested values (e.g. the
//! `user` mapping holding names and email) are read null-safely.
//!
//! ### Descriptor tables
//!
//! [`EntityKind::schema`] returns an [`EntitySchema`] listing the
//! searchable fields ([`SearchField`]), the sortable columns
//! ([`SortField`]) and the payload fields ([`FieldDef`]) for that entity.
//!
//! ### Pipeline
//!
//! The [`listing`] module provides [`listing::filter`], [`listing::sort`],
//! [`listing::paginate`] and [`listing::visible_page_numbers`].
//!
//! ### Screens
//!
//! A [`Screen`] holds the collection plus search/sort/page state and applies
//! the reset rules: a new search or page size returns to page 1, a sort
//! change keeps the page and re-slices it.
//!
//! ## Quick Start
//!
//! ```rust
//! use campus_engine::{EntityKind, Record, Screen};
//! use serde_json::json;
//!
//! let mut screen = Screen::new(EntityKind::Students, 5).unwrap();
//! screen.replace_collection(vec![
//!     Record::new(json!({"id": 1, "user": {"first_name": "Ana", "last_name": "López"}})),
//!     Record::new(json!({"id": 2, "user": {"first_name": "Juan", "last_name": "Pérez"}})),
//!     Record::new(json!({"id": 3, "user": {"first_name": "Mariana", "last_name": "Ruiz"}})),
//! ]);
//!
//! screen.set_search("ana");
//! screen.toggle_sort("nombre");
//!
//! let view = screen.view();
//! assert_eq!(view.total_items, 2);
//! assert_eq!(view.items[0].full_name(), "Ana López");
//! ```

pub mod access;
pub mod entity;
pub mod error;
pub mod listing;
pub mod record;
pub mod schema;
pub mod screen;
pub mod validate;

// Re-export main types at crate root
pub use access::{AccessContext, Capabilities, Role};
pub use entity::EntityKind;
pub use error::Error;
pub use listing::{Direction, Page, SortIndicator, SortState, DEFAULT_PAGE_SIZE};
pub use record::Record;
pub use schema::{EntitySchema, Extractor, FieldDef, FieldType, SearchField, SortField, SortKind};
pub use screen::{ColumnIndicator, ListingState, Screen, ScreenView};
pub use validate::{validate_record, FieldErrors};
