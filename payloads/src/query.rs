//! The list query contract shared by every collection endpoint, and the
//! canonical pagination shape the two server envelope variants normalise to.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::RangeInclusive;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Parameters of a list request.
///
/// `F` holds the entity-specific equality filters and is flattened into the
/// same query string as the common parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery<F> {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    #[serde(flatten)]
    pub filters: F,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl<F: Default> ListQuery<F> {
    /// First page with the given page size and no filters.
    pub fn first_page(limit: u32) -> Self {
        Self {
            page: Some(1),
            limit: Some(limit),
            ..Self::default()
        }
    }
}

impl<F> ListQuery<F> {
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn filters(mut self, filters: F) -> Self {
        self.filters = filters;
        self
    }

    pub fn sort(mut self, by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(by.into());
        self.sort_order = Some(order);
        self
    }
}

impl<F: Serialize> ListQuery<F> {
    /// Encode as query pairs, sorted by key.
    ///
    /// Parameters that are unset or set to the empty string are omitted
    /// rather than sent empty.
    pub fn to_pairs(&self) -> Result<Vec<(String, String)>, serde_json::Error> {
        let Value::Object(fields) = serde_json::to_value(self)? else {
            return Ok(Vec::new());
        };
        Ok(fields
            .into_iter()
            .filter_map(|(key, value)| {
                query_value(value).map(|value| (key, value))
            })
            .collect())
    }
}

fn query_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(values) => {
            let joined = values
                .into_iter()
                .filter_map(query_value)
                .collect::<Vec<_>>()
                .join(",");
            (!joined.is_empty()).then_some(joined)
        }
        Value::Object(_) => None,
    }
}

/// Canonical pagination.
///
/// Only the four stored fields come from the server; everything else is
/// derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE as u64, 0)
    }
}

impl Pagination {
    pub fn new(page: u64, page_size: u64, total_items: u64) -> Self {
        let total_pages = if page_size == 0 {
            u64::from(total_items > 0)
        } else {
            total_items.div_ceil(page_size)
        };
        Self {
            page: page.max(1),
            page_size,
            total_items,
            total_pages,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }

    /// 1-based positions of the items on this page within the whole
    /// collection, e.g. `21..=25` for the last page of 25 items by 10.
    pub fn item_range(&self) -> Option<RangeInclusive<u64>> {
        if self.total_items == 0 || self.page_size == 0 {
            return None;
        }
        let page = self.page.max(1);
        let skipped = (page - 1).saturating_mul(self.page_size);
        if skipped >= self.total_items {
            return None;
        }
        let end = page.saturating_mul(self.page_size).min(self.total_items);
        Some(skipped + 1..=end)
    }

    /// Normalise a raw server pagination object.
    ///
    /// Accepts both `{current, pages, total, limit}` and
    /// `{currentPage, totalPages, totalItems, itemsPerPage, ...}`. Missing
    /// fields fall back to the requested page and limit and to the number of
    /// items actually returned.
    pub fn from_server(
        raw: Option<&Value>,
        requested_page: Option<u32>,
        requested_limit: Option<u32>,
        returned_items: usize,
    ) -> Self {
        let raw: RawPagination = raw
            .and_then(|value| RawPagination::deserialize(value).ok())
            .unwrap_or_default();

        let page = raw
            .current_page
            .or(requested_page.map(u64::from))
            .unwrap_or(1)
            .max(1);
        let page_size = raw
            .items_per_page
            .or(requested_limit.map(u64::from))
            .unwrap_or(returned_items as u64);
        let total_items = raw.total_items.unwrap_or_else(|| {
            (page - 1)
                .saturating_mul(page_size)
                .saturating_add(returned_items as u64)
        });

        let mut pagination = Self::new(page, page_size, total_items);
        if page_size == 0
            && let Some(total_pages) = raw.total_pages
        {
            pagination.total_pages = total_pages;
        }
        pagination
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPagination {
    #[serde(alias = "current")]
    current_page: Option<u64>,
    #[serde(alias = "pages")]
    total_pages: Option<u64>,
    #[serde(alias = "total")]
    total_items: Option<u64>,
    #[serde(alias = "limit")]
    items_per_page: Option<u64>,
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
        }
    }
}
