//! # Space Search Core
//!
//! Shared logic for Space Search: the read-only media catalog, the
//! word-overlap ranking engine, and the paginated search history with its
//! persistence abstraction.
//!
//! This crate contains no tokio, HTTP, or filesystem I/O. Durable storage is
//! plugged in through [`history::HistoryBackend`]; the application crate
//! provides the JSON file implementation.

pub mod catalog;
pub mod error;
pub mod history;
pub mod models;
pub mod ranking;

pub use error::{Error, Result};
