//! Per-screen listing state.
//!
//! A [`Screen`] is created when a user opens a listing, mutated by search,
//! header clicks and page controls, and dropped when the user leaves. It
//! owns the fetched collection exclusively; a completed fetch replaces the
//! collection wholesale.

use crate::error::Result;
use crate::listing::{self, Page, SortIndicator, SortState, DEFAULT_WINDOW};
use crate::schema::EntitySchema;
use crate::{EntityKind, Error, Record};
use serde::{Deserialize, Serialize};

/// User-controlled listing inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingState {
    pub search: String,
    pub sort: SortState,
    pub page: usize,
    pub page_size: usize,
}

impl ListingState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            sort: SortState::default(),
            page: 1,
            page_size,
        }
    }
}

/// Header state for one sortable column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnIndicator {
    pub field: &'static str,
    pub indicator: SortIndicator,
}

/// Read-only projection handed to the view layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenView {
    pub entity: EntityKind,
    pub items: Vec<Record>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    pub page_numbers: Vec<usize>,
    pub search: String,
    pub sort: SortState,
    pub columns: Vec<ColumnIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
}

/// A listing screen for one entity type.
#[derive(Debug, Clone)]
pub struct Screen {
    schema: EntitySchema,
    records: Vec<Record>,
    state: ListingState,
    alert: Option<String>,
}

impl Screen {
    /// Open a screen with an empty collection.
    pub fn new(entity: EntityKind, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize(page_size));
        }
        Ok(Self {
            schema: entity.schema(),
            records: Vec::new(),
            state: ListingState::new(page_size),
            alert: None,
        })
    }

    pub fn entity(&self) -> EntityKind {
        self.schema.entity
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    /// The full, unfiltered collection.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Swap in a freshly fetched collection.
    pub fn replace_collection(&mut self, records: Vec<Record>) {
        self.records = records;
        self.alert = None;
        self.reclamp();
    }

    /// Record a failed fetch. The current collection stays as it was.
    pub fn fetch_failed(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    /// Clear a previously shown alert.
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Change the search term. Always returns to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.state.search = term.into();
        self.state.page = 1;
    }

    /// Header click. Keeps the page number but re-slices the new order.
    pub fn toggle_sort(&mut self, field: &str) {
        self.state.sort.toggle(field);
        self.reclamp();
    }

    /// Change items per page. Always returns to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize(page_size));
        }
        self.state.page_size = page_size;
        self.state.page = 1;
        Ok(())
    }

    /// Jump to a page. Requests outside `1..=total_pages` are ignored.
    pub fn go_to_page(&mut self, page: usize) {
        if (1..=self.total_pages()).contains(&page) {
            self.state.page = page;
        }
    }

    pub fn next_page(&mut self) {
        if self.state.page < self.total_pages() {
            self.state.page += 1;
        }
    }

    pub fn previous_page(&mut self) {
        if self.state.page > 1 {
            self.state.page -= 1;
        }
    }

    /// Total pages for the current filter.
    pub fn total_pages(&self) -> usize {
        let term = self.state.search.trim().to_lowercase();
        let count = if term.is_empty() {
            self.records.len()
        } else {
            self.records
                .iter()
                .filter(|record| listing::matches(record, &term, &self.schema.searchable))
                .count()
        };
        listing::total_pages(count, self.state.page_size)
    }

    /// Run the pipeline for the current state.
    pub fn page(&self) -> Page<Record> {
        listing::run(
            &self.records,
            &self.schema,
            &self.state.search,
            &self.state.sort,
            self.state.page,
            self.state.page_size,
        )
    }

    /// Build the view projection.
    pub fn view(&self) -> ScreenView {
        let page = self.page();
        let columns = self
            .schema
            .sortable_names()
            .map(|field| ColumnIndicator {
                field,
                indicator: self.state.sort.indicator(field),
            })
            .collect();

        ScreenView {
            entity: self.entity(),
            page_numbers: listing::visible_page_numbers(
                page.page,
                page.total_pages,
                DEFAULT_WINDOW,
            ),
            items: page.items,
            current_page: page.page,
            total_pages: page.total_pages,
            total_items: page.total_items,
            page_size: self.state.page_size,
            search: self.state.search.clone(),
            sort: self.state.sort.clone(),
            columns,
            alert: self.alert.clone(),
        }
    }

    /// Store the clamped page so the state never points past the end.
    fn reclamp(&mut self) {
        self.state.page = listing::clamp_page(self.state.page, self.total_pages());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::Direction;
    use serde_json::json;

    fn subjects(n: u64) -> Vec<Record> {
        (1..=n)
            .map(|i| {
                Record::new(json!({
                    "id": i,
                    "nrc": format!("{:05}", 10000 + i),
                    "nombre": if i % 2 == 0 { "Álgebra" } else { "Cálculo" },
                    "seccion": "1",
                }))
            })
            .collect()
    }

    fn screen(n: u64) -> Screen {
        let mut screen = Screen::new(EntityKind::Subjects, 5).unwrap();
        screen.replace_collection(subjects(n));
        screen
    }

    #[test]
    fn rejects_zero_page_size() {
        assert_eq!(
            Screen::new(EntityKind::Students, 0).unwrap_err(),
            Error::InvalidPageSize(0)
        );
        let mut screen = screen(3);
        assert!(screen.set_page_size(0).is_err());
        assert_eq!(screen.state().page_size, 5);
    }

    #[test]
    fn starts_empty_on_first_page() {
        let screen = Screen::new(EntityKind::Teachers, 5).unwrap();
        let view = screen.view();
        assert!(view.items.is_empty());
        assert_eq!(view.current_page, 1);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.page_numbers, [1]);
    }

    #[test]
    fn search_resets_page() {
        let mut screen = screen(12);
        screen.go_to_page(3);
        assert_eq!(screen.state().page, 3);

        screen.set_search("cálculo");
        assert_eq!(screen.state().page, 1);
        let view = screen.view();
        assert_eq!(view.total_items, 6);
        assert_eq!(view.total_pages, 2);
    }

    #[test]
    fn sort_keeps_page_and_reslices() {
        let mut screen = screen(12);
        screen.go_to_page(2);
        screen.toggle_sort("nrc");
        screen.toggle_sort("nrc");
        assert_eq!(screen.state().page, 2);
        assert_eq!(screen.state().sort, SortState::new("nrc", Direction::Descending));

        let view = screen.view();
        let nrcs: Vec<String> = view.items.iter().map(|r| r.text(&["nrc"])).collect();
        assert_eq!(nrcs, ["10007", "10006", "10005", "10004", "10003"]);
    }

    #[test]
    fn page_size_change_resets_page() {
        let mut screen = screen(12);
        screen.go_to_page(2);
        screen.set_page_size(10).unwrap();
        assert_eq!(screen.state().page, 1);
        assert_eq!(screen.view().total_pages, 2);
    }

    #[test]
    fn page_controls_stay_in_bounds() {
        let mut screen = screen(12);
        screen.previous_page();
        assert_eq!(screen.state().page, 1);

        screen.go_to_page(9);
        assert_eq!(screen.state().page, 1);

        screen.next_page();
        screen.next_page();
        screen.next_page();
        assert_eq!(screen.state().page, 3);
        assert_eq!(screen.view().items.len(), 2);
    }

    #[test]
    fn shrinking_collection_clamps_to_first_page() {
        let mut screen = screen(12);
        screen.go_to_page(3);
        screen.replace_collection(subjects(4));
        assert_eq!(screen.state().page, 1);
    }

    #[test]
    fn failed_fetch_keeps_collection() {
        let mut screen = screen(3);
        screen.fetch_failed("could not load subjects");
        let view = screen.view();
        assert_eq!(view.total_items, 3);
        assert_eq!(view.alert.as_deref(), Some("could not load subjects"));

        screen.replace_collection(subjects(4));
        assert!(screen.alert().is_none());
    }

    #[test]
    fn column_indicators_follow_sort() {
        let mut screen = screen(2);
        screen.toggle_sort("nombre");
        let view = screen.view();
        let nombre = view.columns.iter().find(|c| c.field == "nombre").unwrap();
        assert_eq!(nombre.indicator, SortIndicator::Ascending);
        assert!(view
            .columns
            .iter()
            .filter(|c| c.field != "nombre")
            .all(|c| c.indicator == SortIndicator::Neutral));
    }

    #[test]
    fn view_serializes_camel_case() {
        let json = serde_json::to_value(screen(1).view()).unwrap();
        assert_eq!(json["entity"], "subjects");
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["pageNumbers"], json!([1]));
        assert!(json.get("alert").is_none());
    }
}
