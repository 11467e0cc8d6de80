//! # Space Search
//!
//! Keyword search over a fixed catalog of NASA media items, with a durable,
//! paginated search history.
//!
//! The ranking engine and the history store live in `space-search-core`
//! (no I/O beyond the [`HistoryBackend`](space_search_core::history::HistoryBackend)
//! seam). This crate adds the file-backed pieces and the two front ends.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌───────────────────┐
//! │  feed.json   │──▶│   Catalog    │──▶│  Ranking engine   │
//! └──────────────┘   └──────────────┘   └─────────┬─────────┘
//!                                                 │
//!                    ┌──────────────┐   ┌─────────▼─────────┐
//!                    │ history.json │◀──│  SearchHistory    │
//!                    └──────────────┘   └─────────┬─────────┘
//!                                                 │
//!                             ┌───────────────────┤
//!                             ▼                   ▼
//!                        ┌──────────┐       ┌──────────┐
//!                        │   CLI    │       │   HTTP   │
//!                        │ (space)  │       │  (axum)  │
//!                        └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! space sources --limit 5
//! space search "mars rover"
//! space history list
//! space serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`feed`] | Catalog feed loader |
//! | [`json_store`] | JSON-file history persistence |
//! | [`service`] | Operations shared by the CLI and HTTP server |
//! | [`server`] | HTTP API |
//! | [`search`], [`history`], [`sources`] | CLI commands |

pub mod config;
pub mod feed;
pub mod history;
pub mod json_store;
pub mod search;
pub mod server;
pub mod service;
pub mod sources;
