//! Catalog filters
//!
//! [`CatalogLocation`] is the catalog page's state as it appears in the URL
//! query string (`page`, `q`, `sort_by`, `status_ketersediaan`). It converts
//! both ways, and into the [`ProductQuery`] sent to `GET /pupuk`.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::Serialize;
use thiserror::Error;
use url::form_urlencoded;

/// Products per catalog page.
pub const DEFAULT_PER_PAGE: u32 = 12;

/// Products shown in the landing page's featured strip.
pub const FEATURED_LIMIT: usize = 8;

/// Catalog sort key, as it appears in `sort_by`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// `terbaru`: newest first
    #[default]
    Newest,

    /// `harga_asc`: cheapest first
    PriceAsc,

    /// `harga_desc`: most expensive first
    PriceDesc,
}

impl SortKey {
    /// Query-string value
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "terbaru",
            Self::PriceAsc => "harga_asc",
            Self::PriceDesc => "harga_desc",
        }
    }

    /// Backend `sort`/`order` pair.
    pub const fn ordering(self) -> (SortField, SortOrder) {
        match self {
            Self::Newest => (SortField::CreatedAt, SortOrder::Desc),
            Self::PriceAsc => (SortField::Price, SortOrder::Asc),
            Self::PriceDesc => (SortField::Price, SortOrder::Desc),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A `sort_by` value that names no known sort key.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key {0:?}")]
pub struct UnknownSortKey(String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "terbaru" => Ok(Self::Newest),
            "harga_asc" => Ok(Self::PriceAsc),
            "harga_desc" => Ok(Self::PriceDesc),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

/// Backend sort column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortField {
    /// `created_at`
    #[serde(rename = "created_at")]
    CreatedAt,

    /// `harga`
    #[serde(rename = "harga")]
    Price,
}

/// Backend sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,

    /// Descending
    Desc,
}

/// User-facing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilters {
    /// Free-text search (`q`)
    pub search: String,

    /// Sort key (`sort_by`)
    pub sort: SortKey,

    /// Availability status filter (`status_ketersediaan`)
    pub availability: Option<String>,
}

/// A single filter edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    /// New search text
    Search(String),

    /// New sort key
    Sort(SortKey),

    /// New availability filter; `None` clears it
    Availability(Option<String>),
}

/// Filters plus current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLocation {
    /// Active filters
    pub filters: CatalogFilters,

    /// 1-based page
    pub page: u32,
}

impl Default for CatalogLocation {
    fn default() -> Self {
        Self {
            filters: CatalogFilters::default(),
            page: 1,
        }
    }
}

impl CatalogLocation {
    /// Restore state from a URL query string (with or without leading `?`).
    ///
    /// Missing or malformed values fall back to their defaults.
    pub fn from_query(query: &str) -> Self {
        let mut location = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => {
                    location.page = value.parse().ok().filter(|page| *page >= 1).unwrap_or(1);
                }
                "q" => location.filters.search = value.into_owned(),
                "sort_by" => location.filters.sort = value.parse().unwrap_or_default(),
                "status_ketersediaan" => {
                    location.filters.availability =
                        Some(value.into_owned()).filter(|status| !status.is_empty());
                }
                _ => {}
            }
        }

        location
    }

    /// Query string for the URL, omitting defaults.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        if self.page > 1 {
            serializer.append_pair("page", &self.page.to_string());
        }

        if !self.filters.search.is_empty() {
            serializer.append_pair("q", &self.filters.search);
        }

        if self.filters.sort != SortKey::Newest {
            serializer.append_pair("sort_by", self.filters.sort.as_str());
        }

        if let Some(availability) = &self.filters.availability {
            serializer.append_pair("status_ketersediaan", availability);
        }

        serializer.finish()
    }

    /// Apply a filter edit. Returns whether anything changed; a change
    /// always returns to page 1.
    pub fn apply(&mut self, change: FilterChange) -> bool {
        let filters = &mut self.filters;

        let changed = match change {
            FilterChange::Search(search) => replace_if_different(&mut filters.search, search),
            FilterChange::Sort(sort) => replace_if_different(&mut filters.sort, sort),
            FilterChange::Availability(availability) => replace_if_different(
                &mut filters.availability,
                availability.filter(|status| !status.is_empty()),
            ),
        };

        if changed {
            self.page = 1;
        }

        changed
    }

    /// Move to `page` when it lies within `1..=last_page` and differs from
    /// the current page. Filters are never touched.
    pub fn go_to_page(&mut self, page: u32, last_page: u32) -> bool {
        if page < 1 || page > last_page.max(1) || page == self.page {
            return false;
        }

        self.page = page;

        true
    }

    /// Clear every filter and return to page 1.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Backend request for this location.
    pub fn product_query(&self, per_page: u32) -> ProductQuery {
        let (sort, order) = self.filters.sort.ordering();

        ProductQuery {
            page: Some(self.page),
            per_page: Some(per_page),
            q: Some(self.filters.search.clone()).filter(|search| !search.is_empty()),
            sort: Some(sort),
            order: Some(order),
            status_ketersediaan: self.filters.availability.clone(),
            kategori_slug: None,
        }
    }
}

fn replace_if_different<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }

    *slot = value;

    true
}

/// Query parameters for `GET /pupuk`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductQuery {
    /// 1-based page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Page size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,

    /// Search text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,

    /// Sort column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortField>,

    /// Sort direction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,

    /// Availability status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_ketersediaan: Option<String>,

    /// Category slug
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kategori_slug: Option<String>,
}

impl ProductQuery {
    /// Products sharing a category.
    pub fn by_category(slug: &str, per_page: u32) -> Self {
        Self {
            per_page: Some(per_page),
            kategori_slug: Some(slug.to_string()),
            ..Self::default()
        }
    }

    /// A plain page of the catalog.
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }
}
