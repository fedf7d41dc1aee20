//! The fetch-everything-then-slice pipeline shared by every resource
//! screen: free-text search, screen filters, column sort, pagination.
//!
//! The backend returns whole collections and has no query parameters, so
//! all of this runs in the console over the fetched rows.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_PER_PAGE: usize = 8;
pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Query parameters every list endpoint understands. Screen-specific
/// filters are extracted separately from the same query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub per_page: Option<usize>,
}

impl ListQuery {
    fn needle(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }
}

/// A comparable value for one sortable column. Variant order makes rows
/// with no value sort before everything else when ascending.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum SortKey {
    Missing,
    Number(f64),
    Text(String),
    Time(DateTime<Utc>),
}

impl SortKey {
    pub fn text(value: Option<&str>) -> Self {
        match value {
            Some(v) => SortKey::Text(v.to_lowercase()),
            None => SortKey::Missing,
        }
    }

    pub fn time(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(SortKey::Missing, SortKey::Time)
    }
}

/// A row that can go through the list pipeline.
pub trait Listable {
    /// Column names accepted by `?sort=`.
    const SORT_COLUMNS: &'static [&'static str];

    /// Fields the free-text search looks at.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Key for one of [`Self::SORT_COLUMNS`].
    fn sort_key(&self, column: &str) -> SortKey;
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Borrow the present values out of a row's optional text fields.
pub fn fields<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Vec<Cow<'a, str>> {
    values.into_iter().flatten().map(Cow::Borrowed).collect()
}

fn matches<T: Listable>(row: &T, needle: &str) -> bool {
    row.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Search, screen filter, then sort. The result is what CSV export writes
/// and what [`paginate`] slices.
pub fn select<T, F>(rows: Vec<T>, query: &ListQuery, keep: F) -> Result<Vec<T>, ApiError>
where
    T: Listable,
    F: Fn(&T) -> bool,
{
    let column = match query.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(column) if T::SORT_COLUMNS.contains(&column) => Some(column),
        Some(column) => {
            return Err(ApiError::bad_request(format!(
                "cannot sort by '{column}'; expected one of {}",
                T::SORT_COLUMNS.join(", ")
            )));
        }
        None => None,
    };

    let needle = query.needle();
    let mut selected: Vec<T> = rows
        .into_iter()
        .filter(|row| needle.as_deref().is_none_or(|n| matches(row, n)))
        .filter(|row| keep(row))
        .collect();

    if let Some(column) = column {
        selected.sort_by(|a, b| {
            let ordering = a
                .sort_key(column)
                .partial_cmp(&b.sort_key(column))
                .unwrap_or(Ordering::Equal);
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    Ok(selected)
}

/// Cut one page out of the selected rows. Pages past the end come back
/// empty with the real totals.
pub fn paginate<T>(rows: Vec<T>, query: &ListQuery) -> Page<T> {
    let page = query.page();
    let per_page = query.per_page();
    let total = rows.len();

    let items = rows
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        per_page,
        total,
        total_pages: total.div_ceil(per_page),
    }
}
