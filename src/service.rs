//! Application service shared by the CLI and the HTTP server.
//!
//! [`SpaceSearch`] bundles the read-only catalog with the shared search
//! history and applies the caller-layer rules: page bounds, empty-query
//! rejection, and when a search gets recorded.
//!
//! A search ranks the catalog once. The same ranked list feeds both the
//! returned page and, for a first-page search, the history entry, which
//! always stores the full match set.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use space_search_core::catalog::Catalog;
use space_search_core::history::{SearchHistory, SearchRecord};
use space_search_core::models::{
    CallerId, CatalogItem, CatalogPage, ConfidenceScores, HistoryEntry, HistoryPage,
};
use space_search_core::ranking;
use space_search_core::{Error, Result};

use crate::config::{Config, PaginationConfig};
use crate::feed;
use crate::json_store::JsonFileBackend;

/// Body of a search call. camelCase, with snake_case aliases.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default, alias = "page_size")]
    pub page_size: Option<usize>,
    /// Follow-up page loads set this so they don't create history.
    #[serde(default, alias = "skip_history")]
    pub skip_history: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: None,
            page_size: None,
            skip_history: false,
        }
    }
}

/// Result of a search call.
///
/// Field names are the browser client's contract: `resultCount` and
/// `pageSize` are camelCase, the rest snake_case.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<CatalogItem>,
    /// Confidence of every match, not only the returned page.
    pub confidence_scores: ConfidenceScores,
    pub timestamp: i64,
    /// Total number of matches across all pages.
    #[serde(rename = "resultCount")]
    pub result_count: usize,
    pub page: usize,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
    pub has_more: bool,
    /// Id of the history entry this search created, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_id: Option<String>,
}

pub struct SpaceSearch {
    catalog: Arc<Catalog>,
    history: Arc<SearchHistory>,
    pagination: PaginationConfig,
}

impl SpaceSearch {
    pub fn new(catalog: Catalog, history: SearchHistory, pagination: PaginationConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            history: Arc::new(history),
            pagination,
        }
    }

    /// Builds the service from configuration: loads the catalog feed and
    /// opens the JSON history file.
    ///
    /// A missing catalog feed is fatal. A missing or corrupt history file is
    /// not: the history starts empty.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let catalog = feed::load_catalog(&config.catalog.path)?;
        let retention = config.history.retention();
        if retention.is_unbounded() {
            debug!("history retention is unbounded");
        }
        let history = SearchHistory::open(
            Box::new(JsonFileBackend::new(&config.history.path)),
            retention,
        );
        Ok(Self::new(catalog, history, config.pagination.clone()))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn history_store(&self) -> &SearchHistory {
        &self.history
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// Resolves caller-supplied paging into a validated `(page, size)`.
    fn page_args(&self, page: Option<usize>, size: Option<usize>) -> Result<(usize, usize)> {
        let page = page.unwrap_or(1);
        let size = size.unwrap_or(self.pagination.default_page_size);
        if page < 1 {
            return Err(Error::invalid("page must be >= 1"));
        }
        if size < 1 || size > self.pagination.max_page_size {
            return Err(Error::invalid(format!(
                "page size must be between 1 and {}",
                self.pagination.max_page_size
            )));
        }
        Ok((page, size))
    }

    /// One page of the raw catalog.
    pub fn sources(&self, page: Option<usize>, limit: Option<usize>) -> Result<CatalogPage> {
        let (page, limit) = self.page_args(page, limit)?;
        self.catalog.page(page, limit)
    }

    /// Ranks the catalog and returns the requested page.
    ///
    /// Records the full match set to history when this is the first page
    /// and `skip_history` is unset. A failed history flush is logged and
    /// does not fail the search.
    pub fn search(&self, req: &SearchRequest, identity: Option<&CallerId>) -> Result<SearchResponse> {
        let query = req.query.trim();
        if query.is_empty() {
            return Err(Error::invalid("query must not be empty"));
        }
        let (page, page_size) = self.page_args(req.page, req.page_size)?;

        let ranked = ranking::rank(&self.catalog, query);
        let result = ranked.page(page, page_size);
        debug!(query, page, page_size, total = result.total_count, "search ranked");

        let history_id = if page == 1 && !req.skip_history {
            let record = SearchRecord {
                query: query.to_string(),
                results: ranked.items(),
                confidence_scores: result.confidence_scores.clone(),
                total_count: Some(result.total_count),
            };
            match self.history.append(record, identity) {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(error = %e, query, "search not persisted to history");
                    None
                }
            }
        } else {
            None
        };

        Ok(SearchResponse {
            query: query.to_string(),
            result_count: result.total_count,
            results: result.items,
            confidence_scores: result.confidence_scores,
            timestamp: Utc::now().timestamp_millis(),
            page,
            page_size,
            has_more: result.has_more,
            history_id,
        })
    }

    pub fn history(
        &self,
        page: Option<usize>,
        page_size: Option<usize>,
        identity: Option<&CallerId>,
    ) -> Result<HistoryPage> {
        let (page, page_size) = self.page_args(page, page_size)?;
        self.history.paginate(page, page_size, identity)
    }

    pub fn history_entry(&self, id: &str, identity: Option<&CallerId>) -> Result<HistoryEntry> {
        self.history.get(id, identity)
    }

    /// Deletes one entry. `Ok(false)` when the id is unknown.
    pub fn delete_history(&self, id: &str, identity: Option<&CallerId>) -> Result<bool> {
        self.history.delete_by_id(id, identity)
    }

    pub fn clear_history(&self, identity: Option<&CallerId>) -> Result<()> {
        self.history.clear_all(identity)
    }
}
