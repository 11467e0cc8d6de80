//! Persisted, paginated search history.
//!
//! [`SearchHistory`] owns the ordered log (newest first) behind a single
//! `RwLock`. Every mutation and the flush that follows it run under the
//! write lock as one unit, so mutations never interleave and no reader can
//! observe a log that has not been handed to the backend yet.
//!
//! Durable storage is pluggable through the [`HistoryBackend`] trait,
//! which always receives the full log rather than a delta.
//!
//! # Operations
//!
//! | Method | Flushes | Purpose |
//! |--------|---------|---------|
//! | [`append`](SearchHistory::append) | yes | Record a completed search |
//! | [`paginate`](SearchHistory::paginate) | no | List entries page by page |
//! | [`get`](SearchHistory::get) | no | Fetch one entry by id |
//! | [`delete_by_id`](SearchHistory::delete_by_id) | on hit | Remove one entry |
//! | [`clear_all`](SearchHistory::clear_all) | yes | Remove every entry |

pub mod memory;

use std::collections::VecDeque;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{page_bounds, CallerId, CatalogItem, ConfidenceScores, HistoryEntry, HistoryPage};

/// Durable medium for the history log.
///
/// `flush` is called synchronously after every successful mutation with the
/// complete current log, newest first. `load` is called once at startup and
/// must return `Ok(vec![])` when nothing has been stored yet.
pub trait HistoryBackend: Send + Sync {
    fn load(&self) -> Result<Vec<HistoryEntry>>;

    fn flush(&self, entries: &[HistoryEntry]) -> Result<()>;
}

/// Optional bounds on how much history is kept.
///
/// Both limits default to `None`, which keeps every entry until it is
/// deleted or cleared. The log then grows without bound, so long-running
/// deployments should set at least one of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Keep at most this many of the newest entries.
    pub max_entries: Option<usize>,
    /// Drop entries older than this.
    pub max_age: Option<Duration>,
}

impl RetentionPolicy {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_entries.is_none() && self.max_age.is_none()
    }

    /// Removes entries outside the policy. Returns how many were dropped.
    fn prune(&self, entries: &mut VecDeque<HistoryEntry>, now_millis: i64) -> usize {
        let before = entries.len();
        if let Some(max_age) = self.max_age {
            let age_millis = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
            let cutoff = now_millis.saturating_sub(age_millis);
            entries.retain(|e| e.timestamp_millis >= cutoff);
        }
        if let Some(max_entries) = self.max_entries {
            entries.truncate(max_entries);
        }
        before - entries.len()
    }
}

/// A completed search to be recorded.
#[derive(Debug, Clone, Default)]
pub struct SearchRecord {
    pub query: String,
    /// Every match in ranked order, not only the page that was viewed.
    pub results: Vec<CatalogItem>,
    pub confidence_scores: ConfidenceScores,
    /// Total number of matches. Falls back to `results.len()` when absent.
    pub total_count: Option<usize>,
}

/// Shared, single-owner search history log.
pub struct SearchHistory {
    backend: Box<dyn HistoryBackend>,
    retention: RetentionPolicy,
    entries: RwLock<VecDeque<HistoryEntry>>,
    startup_warning: Option<String>,
}

impl SearchHistory {
    /// Loads the log from `backend`.
    ///
    /// Never fails: an unreadable or corrupt store starts an empty log and
    /// records a warning, available through [`startup_warning`](Self::startup_warning).
    pub fn open(backend: Box<dyn HistoryBackend>, retention: RetentionPolicy) -> Self {
        let (loaded, startup_warning) = match backend.load() {
            Ok(entries) => (entries, None),
            Err(e) => {
                warn!(error = %e, "search history could not be loaded, starting empty");
                (Vec::new(), Some(e.to_string()))
            }
        };

        let mut entries: VecDeque<HistoryEntry> = loaded.into();
        let pruned = retention.prune(&mut entries, now_millis());
        debug!(entries = entries.len(), pruned, "search history opened");

        let history = Self {
            backend,
            retention,
            entries: RwLock::new(entries),
            startup_warning,
        };

        // The store must match the pruned log before the first read.
        if pruned > 0 {
            let mut entries = history.entries.write();
            // A failure is logged by flush_locked; the pruned log is kept.
            let _ = history.flush_locked(&mut entries);
        }

        history
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// The load error that forced an empty log at startup, if any.
    pub fn startup_warning(&self) -> Option<&str> {
        self.startup_warning.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Records a search at the head of the log and flushes.
    ///
    /// Returns the new entry id. On a flush failure the entry stays in
    /// memory and `Error::Persistence` is returned.
    pub fn append(&self, record: SearchRecord, _identity: Option<&CallerId>) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let result_count = record.total_count.unwrap_or(record.results.len());
        let now = now_millis();

        let entry = HistoryEntry {
            id: id.clone(),
            query: record.query,
            timestamp_millis: now,
            result_count,
            results: record.results,
            confidence_scores: record.confidence_scores,
        };

        let mut entries = self.entries.write();
        entries.push_front(entry);
        self.retention.prune(&mut entries, now);
        debug!(id = %id, result_count, "recorded search");
        self.flush_locked(&mut entries)?;

        Ok(id)
    }

    /// One page of the log, newest first. Out-of-range pages are empty.
    pub fn paginate(
        &self,
        page: usize,
        page_size: usize,
        _identity: Option<&CallerId>,
    ) -> Result<HistoryPage> {
        if page < 1 {
            return Err(Error::invalid("page must be >= 1"));
        }
        if page_size < 1 {
            return Err(Error::invalid("page_size must be >= 1"));
        }

        let entries = self.entries.read();
        let total_items = entries.len();
        let total_pages = total_items.div_ceil(page_size);
        let (start, end) = page_bounds(page, page_size, total_items);

        Ok(HistoryPage {
            items: entries.range(start..end).cloned().collect(),
            page,
            page_size,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        })
    }

    /// Fetches one entry by id.
    pub fn get(&self, id: &str, _identity: Option<&CallerId>) -> Result<HistoryEntry> {
        self.entries
            .read()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("search history entry {}", id)))
    }

    /// Removes the first entry with `id`.
    ///
    /// Returns `Ok(false)` without flushing when no entry matches.
    pub fn delete_by_id(&self, id: &str, _identity: Option<&CallerId>) -> Result<bool> {
        let mut entries = self.entries.write();
        let Some(pos) = entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        entries.remove(pos);
        debug!(id, "deleted search history entry");
        self.flush_locked(&mut entries)?;
        Ok(true)
    }

    /// Empties the log and flushes.
    pub fn clear_all(&self, _identity: Option<&CallerId>) -> Result<()> {
        let mut entries = self.entries.write();
        let removed = entries.len();
        entries.clear();
        debug!(removed, "cleared search history");
        self.flush_locked(&mut entries)
    }

    /// Hands the full log to the backend. Caller holds the write lock.
    fn flush_locked(&self, entries: &mut VecDeque<HistoryEntry>) -> Result<()> {
        self.backend
            .flush(entries.make_contiguous())
            .inspect_err(|e| warn!(error = %e, "search history flush failed"))
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
