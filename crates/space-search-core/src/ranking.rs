//! Word-overlap ranking over the catalog.
//!
//! The ranking pass is read-only over the [`Catalog`] and pure with respect
//! to its inputs, so it runs without any locking. The caller ranks once per
//! request and reuses the same [`RankedMatches`] for the page it returns and
//! for the history entry it records.
//!
//! # Scoring Algorithm
//!
//! 1. Trim the query; an empty query matches nothing.
//! 2. Lower-case it and split on whitespace into query words.
//! 3. For every item, `text = lower(name + " " + description)` and
//!    `matches` = number of query words (duplicates included) that occur
//!    as substrings of `text`.
//! 4. Items with no match are dropped. Otherwise
//!    `score = matches / words × 100`, multiplied by 1.5 and capped at 100
//!    when the whole query occurs in `text`, then rounded to 2 decimals.
//! 5. Stable sort by score (desc), so ties keep catalog order.
//! 6. Slice `[(page-1)×size, (page-1)×size + size)`; the confidence map
//!    always covers every match.

use std::cmp::Ordering;

use crate::catalog::Catalog;
use crate::models::{page_bounds, page_offset, CatalogItem, ConfidenceScores, ScoredItem};

/// Multiplier applied when the full query appears verbatim.
pub const PHRASE_BOOST: f64 = 1.5;

/// Upper bound of a confidence value.
pub const MAX_CONFIDENCE: f64 = 100.0;

/// All matches for one query, sorted by confidence (desc).
#[derive(Debug, Clone, Default)]
pub struct RankedMatches<'a> {
    matches: Vec<ScoredItem<'a>>,
}

/// One page of search results plus the scores of every match.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub items: Vec<CatalogItem>,
    /// Confidence for every match, not only the returned page.
    pub confidence_scores: ConfidenceScores,
    pub has_more: bool,
    pub total_count: usize,
}

impl<'a> RankedMatches<'a> {
    pub fn total_count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn scored(&self) -> &[ScoredItem<'a>] {
        &self.matches
    }

    /// Every matching item in ranked order.
    pub fn items(&self) -> Vec<CatalogItem> {
        self.matches.iter().map(|m| m.item.clone()).collect()
    }

    /// Confidence keyed by item id for every match.
    pub fn confidence_scores(&self) -> ConfidenceScores {
        self.matches
            .iter()
            .map(|m| (m.item.id, m.confidence))
            .collect()
    }

    /// Slices one page out of the ranked list.
    ///
    /// A page past the end yields an empty slice rather than an error.
    pub fn page(&self, page: usize, page_size: usize) -> SearchPage {
        let total_count = self.matches.len();
        let (start, end) = page_bounds(page, page_size, total_count);

        SearchPage {
            items: self.matches[start..end]
                .iter()
                .map(|m| m.item.clone())
                .collect(),
            confidence_scores: self.confidence_scores(),
            has_more: page_offset(page, page_size).saturating_add(page_size) < total_count,
            total_count,
        }
    }
}

/// Ranks every catalog item against `query`.
pub fn rank<'a>(catalog: &'a Catalog, query: &str) -> RankedMatches<'a> {
    let query_lower = query.trim().to_lowercase();
    let words: Vec<&str> = query_lower.split_whitespace().collect();
    if words.is_empty() {
        return RankedMatches::default();
    }

    let mut matches: Vec<ScoredItem<'a>> = catalog
        .all()
        .iter()
        .filter_map(|item| {
            let text = searchable_text(item);
            let confidence = score(&text, &query_lower, &words);
            (confidence > 0.0).then_some(ScoredItem { item, confidence })
        })
        .collect();

    // `sort_by` is stable: equal scores keep catalog order.
    matches.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    RankedMatches { matches }
}

/// Ranks and returns one page in a single call.
pub fn search(catalog: &Catalog, query: &str, page: usize, page_size: usize) -> SearchPage {
    rank(catalog, query).page(page, page_size)
}

/// Lower-cased `name + " " + description`.
pub fn searchable_text(item: &CatalogItem) -> String {
    format!("{} {}", item.name, item.description).to_lowercase()
}

/// Confidence of one item's searchable text against a lower-cased query.
///
/// Returns `0.0` when no query word occurs in `text`.
pub fn score(text: &str, query_lower: &str, words: &[&str]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }

    let matches = words.iter().filter(|w| text.contains(**w)).count();
    if matches == 0 {
        return 0.0;
    }

    let mut score = matches as f64 / words.len() as f64 * 100.0;
    if text.contains(query_lower) {
        score = (score * PHRASE_BOOST).min(MAX_CONFIDENCE);
    }
    round2(score)
}

/// Two decimals, ties to even: 3.125 becomes 3.12, 3.135 becomes 3.14.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
