//! Pagination
//!
//! Paginated list bodies (`{ data, meta, links }`) and helpers for turning
//! `meta.links` into page numbers.

use serde::Deserialize;
use url::Url;

/// Base used to resolve relative pagination URLs.
const RELATIVE_BASE: &str = "http://localhost/";

/// `{ "data": [...], "meta": {...}, "links": {...} }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Paginated<T> {
    /// Items on this page
    pub data: Vec<T>,

    /// Page metadata; absent on malformed responses
    #[serde(default)]
    pub meta: Option<PageMeta>,

    /// First/last/prev/next URLs
    #[serde(default)]
    pub links: Option<PageUrls>,
}

/// Page metadata
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    /// Current page, 1-based
    pub current_page: u32,

    /// Last page, 1-based
    pub last_page: u32,

    /// Page size
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Total number of results
    #[serde(default)]
    pub total: Option<u64>,

    /// 1-based index of the first result on this page
    #[serde(default)]
    pub from: Option<u64>,

    /// 1-based index of the last result on this page
    #[serde(default)]
    pub to: Option<u64>,

    /// Numbered page links
    #[serde(default)]
    pub links: Vec<PageLink>,
}

impl PageMeta {
    /// Whether there is more than one page to navigate.
    pub fn is_paginated(&self) -> bool {
        self.last_page > 1
    }
}

/// First/last/prev/next URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageUrls {
    /// First page
    #[serde(default)]
    pub first: Option<String>,

    /// Last page
    #[serde(default)]
    pub last: Option<String>,

    /// Previous page
    #[serde(default)]
    pub prev: Option<String>,

    /// Next page
    #[serde(default)]
    pub next: Option<String>,
}

/// One entry of `meta.links`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageLink {
    /// Target URL; `null` for disabled entries
    #[serde(default)]
    pub url: Option<String>,

    /// Label, e.g. `"2"`, `"&laquo; Previous"`, `"..."`
    pub label: String,

    /// Whether this is the current page
    #[serde(default)]
    pub active: bool,
}

/// What a [`PageLink`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Previous page control
    Previous,

    /// Next page control
    Next,

    /// `...` separator
    Ellipsis,

    /// Numbered page
    Page,
}

impl PageLink {
    /// Page number carried by the link URL's `page` parameter.
    pub fn page_number(&self) -> Option<u32> {
        let raw = self.url.as_deref()?;
        let url = Url::parse(raw)
            .or_else(|_relative| Url::parse(RELATIVE_BASE).and_then(|base| base.join(raw)))
            .ok()?;

        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    }

    /// Classify the link from its label.
    pub fn kind(&self) -> LinkKind {
        if self.label.contains("Previous") || self.label.contains("&laquo;") {
            LinkKind::Previous
        } else if self.label.contains("Next") || self.label.contains("&raquo;") {
            LinkKind::Next
        } else if self.label.trim() == "..." {
            LinkKind::Ellipsis
        } else {
            LinkKind::Page
        }
    }

    /// Label without HTML arrows.
    pub fn clean_label(&self) -> String {
        self.label
            .replace("&laquo;", "")
            .replace("&raquo;", "")
            .trim()
            .to_string()
    }

    /// Whether the link can be followed.
    pub fn is_enabled(&self) -> bool {
        self.url.is_some() && !self.active
    }
}

/// Entry of a compact page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    /// Numbered page button
    Page(u32),

    /// Gap marker
    Gap,
}

/// Compact page selector: the first and last page, pages within one of the
/// current page, and a gap marker two pages away.
///
/// Only the handful of candidate pages around `current` are visited, so the
/// cost does not depend on `last`.
pub fn page_window(current: u32, last: u32) -> Vec<PageSlot> {
    let mut candidates = [
        1,
        current.saturating_sub(2),
        current.saturating_sub(1),
        current,
        current.saturating_add(1),
        current.saturating_add(2),
        last,
    ];

    candidates.sort_unstable();

    let mut window = Vec::with_capacity(candidates.len());
    let mut previous = None;

    for page in candidates {
        if page < 1 || page > last || previous == Some(page) {
            continue;
        }

        previous = Some(page);

        let distance = page.abs_diff(current);

        if page == 1 || page == last || distance <= 1 {
            window.push(PageSlot::Page(page));
        } else if distance == 2 {
            window.push(PageSlot::Gap);
        }
    }

    window
}
