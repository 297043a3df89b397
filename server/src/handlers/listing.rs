//! Listing handler - one stateless pass of the listing pipeline.

use campus_engine::listing::{self, DEFAULT_WINDOW};
use campus_engine::{Capabilities, Direction, EntityKind, Record, SortState};
use serde::{Deserialize, Serialize};

use super::{authorize, Action};
use crate::auth::AuthUser;
use crate::error::Result;
use crate::source::DataSource;

/// Query parameters for a listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Search box contents
    pub search: Option<String>,
    /// Sortable column name
    pub sort: Option<String>,
    /// `asc`/`desc` (or `ascending`/`descending`)
    pub dir: Option<Direction>,
    /// 1-based page number
    pub page: Option<usize>,
    /// Items per page
    pub per_page: Option<usize>,
}

/// Response for a listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub entity: EntityKind,
    pub items: Vec<Record>,
    /// Page shown after clamping
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    pub page_numbers: Vec<usize>,
    pub sort: SortState,
    pub capabilities: Capabilities,
}

/// Maximum items per page.
pub const MAX_PAGE_SIZE: usize = 100;

/// Fetch the full collection and return one page of it.
pub async fn handle_list(
    source: &dyn DataSource,
    default_page_size: usize,
    entity: EntityKind,
    user: &AuthUser,
    query: ListQuery,
) -> Result<ListResponse> {
    let capabilities = authorize(user, entity, Action::View)?;

    let page_size = query
        .per_page
        .map(|n| n.clamp(1, MAX_PAGE_SIZE))
        .unwrap_or(default_page_size);
    let sort = SortState::new(query.sort.unwrap_or_default(), query.dir.unwrap_or_default());

    let records = source.fetch_all(entity, user.token()).await?;
    let schema = entity.schema();
    let page = listing::run(
        &records,
        &schema,
        query.search.as_deref().unwrap_or_default(),
        &sort,
        query.page.unwrap_or(1),
        page_size,
    );

    tracing::debug!(
        %entity,
        fetched = records.len(),
        matched = page.total_items,
        page = page.page,
        "Listed collection"
    );

    Ok(ListResponse {
        entity,
        page_numbers: listing::visible_page_numbers(page.page, page.total_pages, DEFAULT_WINDOW),
        items: page.items,
        page: page.page,
        total_pages: page.total_pages,
        total_items: page.total_items,
        page_size,
        sort,
        capabilities,
    })
}
