//! The listing pipeline: filter, then sort, then paginate.
//!
//! Every function here is pure. Running the pipeline twice with the same
//! inputs yields the same page, and the input collection is never mutated.

use crate::schema::{EntitySchema, SearchField};
use crate::Record;
use serde::{Deserialize, Serialize};

/// Page size the screens start with.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Width of the page-control strip.
pub const DEFAULT_WINDOW: usize = 5;

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl Direction {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// Icon state for a column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortIndicator {
    Neutral,
    Ascending,
    Descending,
}

/// Current sort column and direction. An empty field means unsorted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub field: String,
    pub direction: Direction,
}

impl SortState {
    /// Sort state on `field` in the given direction.
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Whether a column is selected.
    pub fn is_active(&self) -> bool {
        !self.field.is_empty()
    }

    /// Header click: flips direction on the same field, otherwise selects
    /// the new field ascending.
    pub fn toggle(&mut self, field: &str) {
        if self.field == field {
            self.direction = self.direction.toggled();
        } else {
            self.field = field.to_string();
            self.direction = Direction::Ascending;
        }
    }

    /// Indicator for a column header.
    pub fn indicator(&self, field: &str) -> SortIndicator {
        if !self.is_active() || self.field != field {
            return SortIndicator::Neutral;
        }
        match self.direction {
            Direction::Ascending => SortIndicator::Ascending,
            Direction::Descending => SortIndicator::Descending,
        }
    }
}

/// One page of the filtered and sorted collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page actually shown, after clamping.
    pub page: usize,
    pub total_pages: usize,
    /// Number of records across all pages.
    pub total_items: usize,
}

/// Records matching `term` on at least one searchable field.
///
/// The term is trimmed and lower-cased; an empty term keeps everything.
/// Matching is an unanchored substring test and the original order is kept.
pub fn filter(records: &[Record], term: &str, fields: &[SearchField]) -> Vec<Record> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| matches(record, &term, fields))
        .cloned()
        .collect()
}

/// Whether any field of `record` contains the already-normalized `term`.
pub fn matches(record: &Record, term: &str, fields: &[SearchField]) -> bool {
    fields
        .iter()
        .any(|field| field.extractor.extract(record).contains(term))
}

/// Stable sort on a named column. Unknown or empty field names leave the
/// order untouched.
pub fn sort(records: &mut [Record], schema: &EntitySchema, sort: &SortState) {
    let Some(field) = schema.sort_field(&sort.field) else {
        return;
    };

    records.sort_by(|a, b| {
        let ordering = field.compare(a, b);
        match sort.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });
}

/// `max(1, ceil(count / page_size))`. A zero page size is treated as one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a requested page: anything outside `1..=total` resets to page 1.
pub fn clamp_page(page: usize, total: usize) -> usize {
    if page == 0 || page > total {
        1
    } else {
        page
    }
}

/// Slice one page out of `records`.
pub fn paginate<T: Clone>(records: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = total_pages(records.len(), page_size);
    let page = clamp_page(page, total);

    let start = ((page - 1) * page_size).min(records.len());
    let end = (start + page_size).min(records.len());

    Page {
        items: records[start..end].to_vec(),
        page,
        total_pages: total,
        total_items: records.len(),
    }
}

/// Page numbers for the page-control strip.
///
/// Shows every page when there are at most `window` pages. Otherwise keeps
/// the first `window` pages near the start, the last `window` pages near
/// the end, and centres on `current` in between.
pub fn visible_page_numbers(current: usize, total: usize, window: usize) -> Vec<usize> {
    if total <= window {
        return (1..=total).collect();
    }

    let half = window / 2;
    let start = if current <= half + 1 {
        1
    } else if current + half >= total {
        total + 1 - window
    } else {
        current - half
    };

    (start..start + window).collect()
}

/// Run filter, sort and paginate in one pass.
pub fn run(
    records: &[Record],
    schema: &EntitySchema,
    term: &str,
    sort_state: &SortState,
    page: usize,
    page_size: usize,
) -> Page<Record> {
    let mut filtered = filter(records, term, &schema.searchable);
    sort(&mut filtered, schema, sort_state);
    paginate(&filtered, page, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityKind;
    use serde_json::json;

    fn student(id: u64, first: &str, last: &str, matricula: &str) -> Record {
        Record::new(json!({
            "id": id,
            "matricula": matricula,
            "curp": format!("CURP{id:04}"),
            "user": {
                "first_name": first,
                "last_name": last,
                "email": format!("{}@uni.mx", first.to_lowercase()),
            },
        }))
    }

    fn students() -> Vec<Record> {
        vec![
            student(1, "Ana", "López", "2023001"),
            student(2, "Juan", "Pérez", "2023002"),
            student(3, "Mariana", "Ruiz", "2023003"),
        ]
    }

    fn names(records: &[Record]) -> Vec<String> {
        records.iter().map(Record::full_name).collect()
    }

    #[test]
    fn empty_term_keeps_everything_in_order() {
        let schema = EntityKind::Students.schema();
        let records = students();
        assert_eq!(filter(&records, "", &schema.searchable), records);
        assert_eq!(filter(&records, "   ", &schema.searchable), records);
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let schema = EntityKind::Students.schema();
        let result = filter(&students(), "ana", &schema.searchable);
        assert_eq!(names(&result), ["Ana López", "Mariana Ruiz"]);

        let result = filter(&students(), "  PÉREZ ", &schema.searchable);
        assert_eq!(names(&result), ["Juan Pérez"]);
    }

    #[test]
    fn matches_any_searchable_field() {
        let schema = EntityKind::Students.schema();
        assert_eq!(filter(&students(), "2023002", &schema.searchable).len(), 1);
        assert_eq!(filter(&students(), "curp0003", &schema.searchable).len(), 1);
        assert_eq!(filter(&students(), "juan@", &schema.searchable).len(), 1);
        assert!(filter(&students(), "zzz", &schema.searchable).is_empty());
    }

    #[test]
    fn missing_nested_fields_do_not_match_or_fail() {
        let schema = EntityKind::Students.schema();
        let records = vec![Record::new(json!({"id": 5})), Record::new(json!(null))];
        assert_eq!(filter(&records, "5", &schema.searchable).len(), 1);
        assert!(filter(&records, "ana", &schema.searchable).is_empty());
    }

    #[test]
    fn sort_by_name_both_directions() {
        let schema = EntityKind::Students.schema();
        let mut records = students();
        records.reverse();

        sort(&mut records, &schema, &SortState::new("nombre", Direction::Ascending));
        assert_eq!(names(&records), ["Ana López", "Juan Pérez", "Mariana Ruiz"]);

        sort(&mut records, &schema, &SortState::new("nombre", Direction::Descending));
        assert_eq!(names(&records), ["Mariana Ruiz", "Juan Pérez", "Ana López"]);
    }

    #[test]
    fn sort_by_id_is_numeric() {
        let schema = EntityKind::Administrators.schema();
        let mut records: Vec<Record> = [10, 9, 100]
            .into_iter()
            .map(|id| Record::new(json!({"id": id})))
            .collect();

        sort(&mut records, &schema, &SortState::new("id", Direction::Ascending));
        let ids: Vec<String> = records.iter().map(Record::id).collect();
        assert_eq!(ids, ["9", "10", "100"]);
    }

    #[test]
    fn sort_is_stable() {
        let schema = EntityKind::Subjects.schema();
        let mut records = vec![
            Record::new(json!({"nrc": "1", "programa_educativo": "ICC"})),
            Record::new(json!({"nrc": "2", "programa_educativo": "LCC"})),
            Record::new(json!({"nrc": "3", "programa_educativo": "icc"})),
        ];
        sort(
            &mut records,
            &schema,
            &SortState::new("programa_educativo", Direction::Ascending),
        );
        let nrcs: Vec<String> = records.iter().map(|r| r.text(&["nrc"])).collect();
        assert_eq!(nrcs, ["1", "3", "2"]);
    }

    #[test]
    fn unknown_or_empty_sort_field_is_noop() {
        let schema = EntityKind::Students.schema();
        let original = students();

        let mut records = original.clone();
        sort(&mut records, &schema, &SortState::new("curp", Direction::Descending));
        assert_eq!(records, original);

        sort(&mut records, &schema, &SortState::default());
        assert_eq!(records, original);
    }

    #[test]
    fn toggle_flips_then_resets() {
        let mut state = SortState::default();
        state.toggle("nombre");
        assert_eq!(state, SortState::new("nombre", Direction::Ascending));
        state.toggle("nombre");
        assert_eq!(state.direction, Direction::Descending);
        state.toggle("nombre");
        assert_eq!(state.direction, Direction::Ascending);

        state.toggle("nombre");
        state.toggle("id");
        assert_eq!(state, SortState::new("id", Direction::Ascending));
    }

    #[test]
    fn indicators() {
        let state = SortState::new("id", Direction::Descending);
        assert_eq!(state.indicator("id"), SortIndicator::Descending);
        assert_eq!(state.indicator("nombre"), SortIndicator::Neutral);
        assert_eq!(SortState::default().indicator(""), SortIndicator::Neutral);
    }

    #[test]
    fn twelve_records_in_pages_of_five() {
        let records: Vec<u32> = (1..=12).collect();

        let sizes: Vec<usize> = (1..=3).map(|p| paginate(&records, p, 5).items.len()).collect();
        assert_eq!(sizes, [5, 5, 2]);

        let last = paginate(&records, 3, 5);
        assert_eq!(last.items, [11, 12]);
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.total_items, 12);

        let clamped = paginate(&records, 4, 5);
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.items, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn empty_collection_has_one_empty_page() {
        let records: Vec<u32> = Vec::new();
        let page = paginate(&records, 1, 5);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn page_zero_clamps_to_first() {
        let records: Vec<u32> = (1..=3).collect();
        assert_eq!(paginate(&records, 0, 2).page, 1);
    }

    #[test]
    fn total_pages_formula() {
        assert_eq!(total_pages(0, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn page_number_strip() {
        assert_eq!(visible_page_numbers(1, 10, 5), [1, 2, 3, 4, 5]);
        assert_eq!(visible_page_numbers(3, 10, 5), [1, 2, 3, 4, 5]);
        assert_eq!(visible_page_numbers(4, 10, 5), [2, 3, 4, 5, 6]);
        assert_eq!(visible_page_numbers(5, 10, 5), [3, 4, 5, 6, 7]);
        assert_eq!(visible_page_numbers(8, 10, 5), [6, 7, 8, 9, 10]);
        assert_eq!(visible_page_numbers(10, 10, 5), [6, 7, 8, 9, 10]);
        assert_eq!(visible_page_numbers(2, 3, 5), [1, 2, 3]);
        assert_eq!(visible_page_numbers(1, 1, 5), [1]);
    }

    #[test]
    fn run_slices_filtered_then_sorted() {
        let schema = EntityKind::Students.schema();
        let page = run(
            &students(),
            &schema,
            "ana",
            &SortState::new("nombre", Direction::Descending),
            1,
            1,
        );
        assert_eq!(names(&page.items), ["Mariana Ruiz"]);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_items, 2);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        type Row = (String, String, u32, String);

        fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
            prop::collection::vec(
                ("[a-zA-Z]{0,8}", "[a-zA-Z]{0,8}", 0u32..500, "[0-9]{0,6}"),
                0..40,
            )
        }

        fn to_record((first, last, id, matricula): &Row) -> Record {
            Record::new(json!({
                "id": id,
                "matricula": matricula,
                "user": {"first_name": first, "last_name": last},
            }))
        }

        fn arb_records() -> impl Strategy<Value = Vec<Record>> {
            arb_rows().prop_map(|rows| rows.iter().map(to_record).collect())
        }

        /// Whether any raw column of `row` contains `needle`, case-insensitively.
        fn row_contains((first, last, id, matricula): &Row, needle: &str) -> bool {
            [
                id.to_string(),
                format!("{first} {last}"),
                matricula.clone(),
            ]
            .iter()
            .any(|column| column.to_lowercase().contains(needle))
        }

        fn arb_direction() -> impl Strategy<Value = Direction> {
            prop_oneof![Just(Direction::Ascending), Just(Direction::Descending)]
        }

        fn arb_field() -> impl Strategy<Value = String> {
            prop_oneof![
                Just("id".to_string()),
                Just("nombre".to_string()),
                Just("matricula".to_string()),
                Just("bogus".to_string()),
            ]
        }

        proptest! {
            #[test]
            fn prop_filter_keeps_exactly_matching_rows(
                rows in arb_rows(),
                term in "[a-zA-Z0-9 ]{0,3}",
            ) {
                let schema = EntityKind::Students.schema();
                let records: Vec<Record> = rows.iter().map(to_record).collect();
                let kept = filter(&records, &term, &schema.searchable);

                let needle = term.trim().to_lowercase();
                let expected: Vec<Record> = rows
                    .iter()
                    .filter(|row| row_contains(row, &needle))
                    .map(to_record)
                    .collect();
                prop_assert_eq!(kept, expected);
            }

            #[test]
            fn prop_sort_idempotent(
                records in arb_records(),
                field in arb_field(),
                direction in arb_direction(),
            ) {
                let schema = EntityKind::Students.schema();
                let state = SortState::new(field, direction);

                let mut once = records.clone();
                sort(&mut once, &schema, &state);
                let mut twice = once.clone();
                sort(&mut twice, &schema, &state);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn prop_pages_cover_collection(len in 0usize..60, page_size in 1usize..12) {
                let records: Vec<usize> = (0..len).collect();
                let total = total_pages(len, page_size);
                prop_assert_eq!(total, std::cmp::max(1, len.div_ceil(page_size)));

                let joined: Vec<usize> = (1..=total)
                    .flat_map(|p| paginate(&records, p, page_size).items)
                    .collect();
                prop_assert_eq!(joined, records);
            }

            #[test]
            fn prop_page_strip_within_bounds(total in 1usize..50, current in 1usize..50) {
                let current = current.min(total);
                let strip = visible_page_numbers(current, total, DEFAULT_WINDOW);
                prop_assert_eq!(strip.len(), total.min(DEFAULT_WINDOW));
                prop_assert!(strip.contains(&current));
                prop_assert!(strip.iter().all(|p| (1..=total).contains(p)));
            }

            #[test]
            fn prop_run_deterministic(
                records in arb_records(),
                term in "[a-z]{0,2}",
                field in arb_field(),
                direction in arb_direction(),
                page in 1usize..6,
            ) {
                let schema = EntityKind::Students.schema();
                let state = SortState::new(field, direction);
                let a = run(&records, &schema, &term, &state, page, 5);
                let b = run(&records, &schema, &term, &state, page, 5);
                prop_assert_eq!(a, b);
            }
        }
    }
}
