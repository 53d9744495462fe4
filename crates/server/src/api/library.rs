//! Library API handlers.
//!
//! Writes replace entries wholesale: a client must send the complete
//! record, since any field it omits is stored empty.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tagr_core::{CatalogData, Entry, LibraryError, ReconcileReport};
use tracing::{info, warn};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FileParams {
    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogItem {
    /// Catalog key (file basename).
    pub filename: String,
    pub entry: Entry,
}

#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    pub entries: Vec<CatalogItem>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TagVocabulary {
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn library_error(e: LibraryError) -> ApiError {
    match e {
        LibraryError::NotFound(filename) => error(
            StatusCode::NOT_FOUND,
            format!("Entry not found: {}", filename),
        ),
        LibraryError::InvalidKey => error(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/entries
///
/// All entries, sorted by filename.
pub async fn list_entries(State(state): State<Arc<AppState>>) -> Json<EntryListResponse> {
    let mut entries: Vec<CatalogItem> = state
        .catalog()
        .list_all()
        .into_iter()
        .map(|(filename, entry)| CatalogItem { filename, entry })
        .collect();
    entries.sort_by(|a, b| a.filename.cmp(&b.filename));

    let total = entries.len();
    Json(EntryListResponse { entries, total })
}

/// GET /api/v1/entries/{filename}
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<Entry>, ApiError> {
    state
        .catalog()
        .get(&filename)
        .map(Json)
        .map_err(library_error)
}

/// PUT /api/v1/entries/{filename}
///
/// Replace the entry with the request body.
pub async fn put_entry(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    Json(entry): Json<Entry>,
) -> Result<StatusCode, ApiError> {
    info!("Updating metadata for {}", filename);
    state
        .catalog()
        .put(&filename, entry)
        .map_err(library_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /info?file=
pub async fn info(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FileParams>,
) -> Result<Json<Entry>, ApiError> {
    let file = params.file.unwrap_or_default();
    state.catalog().get(&file).map(Json).map_err(library_error)
}

/// POST /update?file=
///
/// Form-era endpoint: the key comes from the query string and the body is
/// JSON regardless of content type.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FileParams>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let file = params.file.unwrap_or_default();
    if file.is_empty() {
        warn!("Malformed update request: no file given");
        return Err(library_error(LibraryError::InvalidKey));
    }

    let entry: Entry = serde_json::from_slice(&body).map_err(|e| {
        warn!("Update for {}: JSON decode fault: {}", file, e);
        error(StatusCode::BAD_REQUEST, format!("Invalid entry JSON: {}", e))
    })?;

    info!("Updating metadata for {}", file);
    state.catalog().put(&file, entry).map_err(library_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /db
///
/// Dump of the whole catalog in its persisted form.
pub async fn dump(State(state): State<Arc<AppState>>) -> Json<CatalogData> {
    Json(state.catalog().snapshot().data)
}

/// GET /api/v1/tags
pub async fn get_tags(State(state): State<Arc<AppState>>) -> Json<TagVocabulary> {
    Json(TagVocabulary {
        tags: state.catalog().tag_vocabulary(),
    })
}

/// PUT /api/v1/tags
pub async fn put_tags(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TagVocabulary>,
) -> StatusCode {
    state.catalog().set_tag_vocabulary(body.tags);
    StatusCode::NO_CONTENT
}

/// POST /api/v1/rescan
///
/// Re-run discovery. A failed scan is logged and reported as an empty result.
pub async fn rescan(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReconcileReport>, ApiError> {
    let library = state.library().clone();
    tokio::task::spawn_blocking(move || library.rescan())
        .await
        .map(Json)
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
