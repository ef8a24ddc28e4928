// Finance Tracker - REST API with Axum
//
// Thin transport over EntryStore. Every handler locks the shared store,
// runs one operation and maps StoreError onto a status code.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::entry::{EntryFields, EntryId, FinanceEntry};
use crate::error::{PersistenceError, StoreError};
use crate::store::{self, EntryRepository, EntryStore, EntrySummary, HealthStatus};

type DynStore = EntryStore<Box<dyn EntryRepository + Send>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<DynStore>>,
}

impl AppState {
    pub fn new<R>(repo: R) -> Self
    where
        R: EntryRepository + Send + 'static,
    {
        let repo: Box<dyn EntryRepository + Send> = Box::new(repo);
        AppState {
            store: Arc::new(Mutex::new(EntryStore::new(repo))),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, DynStore>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::Store(StoreError::Persistence(PersistenceError::Poisoned)))
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    /// Path segment that is not an entry id at all
    UnknownEntry(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Store(StoreError::Validation(err)) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "validation_error",
                    "field": err.field,
                    "message": err.message,
                })),
            )
                .into_response(),
            ApiError::Store(StoreError::NotFound(id)) => {
                json_error(StatusCode::NOT_FOUND, "not_found", format!("Entry {id} not found"))
            }
            ApiError::UnknownEntry(raw) => {
                json_error(StatusCode::NOT_FOUND, "not_found", format!("Entry {raw} not found"))
            }
            ApiError::Store(err @ StoreError::TotalOverflow { .. }) => {
                error!("summary failed: {}", err);
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "total_overflow",
                    err.to_string(),
                )
            }
            ApiError::Store(StoreError::Persistence(err)) => {
                error!("persistence failure: {}", err);
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "persistence_error",
                    err.to_string(),
                )
            }
        }
    }
}

fn parse_id(raw: &str) -> Result<EntryId, ApiError> {
    raw.parse().map_err(|_| ApiError::UnknownEntry(raw.to_string()))
}

fn parse_body(body: &Bytes) -> Result<EntryFields, ApiError> {
    EntryFields::from_json(body).map_err(|e| ApiError::Store(StoreError::Validation(e)))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Liveness only
async fn health_check() -> Json<HealthStatus> {
    Json(store::health())
}

/// GET /entries - All entries in insertion order
async fn list_entries(State(state): State<AppState>) -> Result<Json<Vec<FinanceEntry>>, ApiError> {
    let store = state.lock()?;
    Ok(Json(store.list()?))
}

/// POST /entries - Create an entry
async fn create_entry(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<FinanceEntry>), ApiError> {
    let fields = parse_body(&body)?;
    let mut store = state.lock()?;
    let entry = store.create(&fields)?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /entries/:id
async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FinanceEntry>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.lock()?;
    Ok(Json(store.get(id)?))
}

/// PUT /entries/:id - Update any subset of fields
async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<FinanceEntry>, ApiError> {
    let id = parse_id(&id)?;
    let changes = parse_body(&body)?;
    let mut store = state.lock()?;

    Ok(Json(store.update(id, &changes)?))
}

/// DELETE /entries/:id
async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id)?;
    let mut store = state.lock()?;
    store.delete(id)?;

    Ok(Json(json!({ "message": format!("Entry {id} deleted") })))
}

/// GET /entries/summary - Count and running total
async fn entry_summary(State(state): State<AppState>) -> Result<Json<EntrySummary>, ApiError> {
    let store = state.lock()?;
    Ok(Json(store.summary()?))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/entries", get(list_entries).post(create_entry))
        .route("/entries/summary", get(entry_summary))
        .route(
            "/entries/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
