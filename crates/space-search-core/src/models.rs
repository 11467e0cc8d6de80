//! Core data models shared by the catalog, ranking engine, and history.
//!
//! Field names on the wire follow the existing JSON contract: catalog items
//! carry `type` and `launch_date`, history entries carry `timestamp`,
//! `resultCount`, and `confidence_scores`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Confidence per catalog item id, in `[0, 100]`, rounded to two decimals.
pub type ConfidenceScores = BTreeMap<u64, f64>;

/// One indexed media item. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Dense, 1-based id assigned in feed order.
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "launch_date")]
    pub created_date: String,
    pub description: String,
    pub image_url: Option<String>,
    pub status: String,
}

/// A catalog item paired with its relevance for one ranking call.
#[derive(Debug, Clone, Copy)]
pub struct ScoredItem<'a> {
    pub item: &'a CatalogItem,
    pub confidence: f64,
}

/// Durable record of one completed search, holding the full match set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub query: String,
    /// Unix timestamp in milliseconds.
    #[serde(rename = "timestamp", alias = "timestampMillis")]
    pub timestamp_millis: i64,
    #[serde(rename = "resultCount")]
    pub result_count: usize,
    pub results: Vec<CatalogItem>,
    #[serde(rename = "confidence_scores", alias = "confidenceScores", default)]
    pub confidence_scores: ConfidenceScores,
}

/// One page of the catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    pub page: usize,
    pub limit: usize,
    pub total_items: usize,
    pub has_more: bool,
    pub returned_count: usize,
}

/// One page of the search history, newest entry first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPage {
    pub items: Vec<HistoryEntry>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Opaque caller identity threaded through history operations.
///
/// Accepted on every call so that per-caller filtering can be added without
/// changing signatures. No filtering happens today: every caller observes
/// the whole shared log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerId(String);

impl CallerId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Start offset of a 1-based page. Page 0 is treated as page 1.
pub fn page_offset(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Clamp `[offset, offset + len)` to a slice of `total` elements.
pub(crate) fn page_bounds(page: usize, page_size: usize, total: usize) -> (usize, usize) {
    let start = page_offset(page, page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    (start, end)
}
