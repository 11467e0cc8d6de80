//! In-memory [`HistoryBackend`] for tests and ephemeral deployments.
//!
//! Keeps the last flushed log behind a shared `RwLock`. Clones share the
//! same storage, so a test can hand one clone to [`SearchHistory`] and keep
//! another to inspect what was flushed.
//!
//! [`SearchHistory`]: super::SearchHistory

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::models::HistoryEntry;

use super::HistoryBackend;

#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    stored: Arc<RwLock<Vec<HistoryEntry>>>,
    flushes: Arc<AtomicUsize>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded as if `entries` had been flushed earlier.
    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            stored: Arc::new(RwLock::new(entries)),
            flushes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The most recently flushed log.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.stored.read().clone()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl HistoryBackend for InMemoryBackend {
    fn load(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.stored.read().clone())
    }

    fn flush(&self, entries: &[HistoryEntry]) -> Result<()> {
        *self.stored.write() = entries.to_vec();
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
