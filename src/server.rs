//! HTTP API server.
//!
//! A thin axum adapter over [`SpaceSearch`]. Handlers translate query
//! strings, bodies, and the `Authorization` header into service calls and
//! map [`space_search_core::Error`] onto HTTP status codes.
//!
//! # Endpoints
//!
//! | Method   | Path | Description |
//! |----------|------|-------------|
//! | `GET`    | `/api/sources?page=&limit=` | One page of the raw catalog |
//! | `POST`   | `/api/search` | Ranked search, recorded to history on page 1 |
//! | `GET`    | `/api/history?page=&page_size=` | Paginated history, newest first |
//! | `GET`    | `/api/history/{id}` | One history entry |
//! | `DELETE` | `/api/history/{id}` | Delete one history entry |
//! | `DELETE` | `/api/history` | Clear the history |
//! | `GET`    | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "invalid argument: query must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404),
//! `persistence_failed` (500), `internal` (500).
//!
//! # Field Names
//!
//! Each payload keeps one naming style:
//!
//! - query strings are snake_case (`page`, `limit`, `page_size`);
//! - the search request body is camelCase (`pageSize`, `skipHistory`).
//!
//! Either input also accepts the other spelling of its multi-word fields.
//! Response bodies keep the names the browser client already reads:
//! `resultCount` and `pageSize` are camelCase, everything else is snake_case.
//! [`SearchResponse`] and the history entry types pin those names.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser frontend
//! can be served from a different origin.

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use space_search_core::models::{CallerId, CatalogPage, HistoryEntry, HistoryPage};
use space_search_core::Error;

use crate::config::Config;
use crate::service::{SearchRequest, SearchResponse, SpaceSearch};

type AppState = Arc<SpaceSearch>;

/// Starts the HTTP server on `[server].bind`.
///
/// Loads the catalog and opens the history before binding, so a missing
/// feed fails fast. Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let service = Arc::new(SpaceSearch::from_config(config)?);
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(addr = %listener.local_addr()?, "space search listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router over a shared service.
pub fn router(service: Arc<SpaceSearch>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/sources", get(handle_sources))
        .route("/api/search", post(handle_search))
        .route(
            "/api/history",
            get(handle_history_list).delete(handle_history_clear),
        )
        .route(
            "/api/history/{id}",
            get(handle_history_get).delete(handle_history_delete),
        )
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(service)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: message.into(),
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err {
            Error::InvalidArgument(_) => AppError {
                status: StatusCode::BAD_REQUEST,
                code: "bad_request",
                message,
            },
            Error::NotFound(_) => not_found(message),
            Error::Persistence(_) | Error::Corrupt(_) => {
                error!(error = %message, "history persistence failed");
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "persistence_failed",
                    message,
                }
            }
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        error!(error = %err, "blocking task failed");
        internal("request task failed")
    }
}

fn caller_identity(headers: &HeaderMap) -> Option<CallerId> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(CallerId::new)
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ GET /api/sources ============

#[derive(Deserialize)]
struct SourcesQuery {
    page: Option<usize>,
    limit: Option<usize>,
}

async fn handle_sources(
    State(service): State<AppState>,
    Query(q): Query<SourcesQuery>,
) -> Result<Json<CatalogPage>, AppError> {
    Ok(Json(service.sources(q.page, q.limit)?))
}

// ============ POST /api/search ============

/// Ranks on the blocking pool: a first-page search flushes the history file.
async fn handle_search(
    State(service): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let identity = caller_identity(&headers);
    let resp =
        tokio::task::spawn_blocking(move || service.search(&req, identity.as_ref())).await??;
    Ok(Json(resp))
}

// ============ /api/history ============

#[derive(Deserialize)]
struct HistoryQuery {
    page: Option<usize>,
    #[serde(alias = "pageSize")]
    page_size: Option<usize>,
}

async fn handle_history_list(
    State(service): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<HistoryPage>, AppError> {
    let identity = caller_identity(&headers);
    Ok(Json(service.history(q.page, q.page_size, identity.as_ref())?))
}

async fn handle_history_get(
    State(service): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<HistoryEntry>, AppError> {
    let identity = caller_identity(&headers);
    Ok(Json(service.history_entry(&id, identity.as_ref())?))
}

async fn handle_history_delete(
    State(service): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let identity = caller_identity(&headers);
    let deleted =
        tokio::task::spawn_blocking(move || service.delete_history(&id, identity.as_ref()))
            .await??;
    if !deleted {
        return Err(not_found("search history item not found"));
    }
    Ok(Json(MessageResponse {
        message: "search history item deleted",
    }))
}

async fn handle_history_clear(
    State(service): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let identity = caller_identity(&headers);
    tokio::task::spawn_blocking(move || service.clear_history(identity.as_ref())).await??;
    Ok(Json(MessageResponse {
        message: "search history cleared",
    }))
}
