//! Waste-entry logging API endpoints (`/api/waste-logging`)
//!
//! Suppliers and producers record incoming organic waste; producers mark
//! entries processed once digested.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::common::{default_page, default_page_size, paginate, Paginated, PaginationQuery};
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{CreateWasteEntryInput, UpdateWasteEntryInput, WasteEntry, WasteStatus};

/// Query parameters for the entry list
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    pub status: Option<WasteStatus>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Request body for a status change
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: WasteStatus,
}

/// Build the waste-logging router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route(
            "/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .route("/{id}/status", axum::routing::put(update_status))
}

/// POST /api/waste-logging - Record a waste entry
async fn create_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<CreateWasteEntryInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let entry = state.waste_service.create(&user.0, input).await?;
    state.stats_cache.invalidate_all();
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/waste-logging - List entries visible to the caller
async fn list_entries(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListEntriesQuery>,
) -> Result<Json<Paginated<WasteEntry>>, ApiError> {
    let mut entries = state.waste_service.list(&user.0).await?;
    if let Some(status) = query.status {
        entries.retain(|e| e.status == status);
    }

    let pagination = PaginationQuery {
        page: query.page,
        page_size: query.page_size,
    };
    Ok(Json(paginate(entries, &pagination)))
}

/// GET /api/waste-logging/{id} - Fetch one entry
async fn get_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<WasteEntry>, ApiError> {
    let entry = state.waste_service.get(&user.0, id).await?;
    Ok(Json(entry))
}

/// PUT /api/waste-logging/{id} - Edit an entry
async fn update_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateWasteEntryInput>,
) -> Result<Json<WasteEntry>, ApiError> {
    let entry = state.waste_service.update(&user.0, id, input).await?;
    state.stats_cache.invalidate_all();
    Ok(Json(entry))
}

/// PUT /api/waste-logging/{id}/status - Mark an entry processed
async fn update_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<WasteEntry>, ApiError> {
    let entry = state
        .waste_service
        .update_status(&user.0, id, body.status)
        .await?;
    state.stats_cache.invalidate_all();
    Ok(Json(entry))
}

/// DELETE /api/waste-logging/{id} - Delete an entry
async fn delete_entry(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.waste_service.delete(&user.0, id).await?;
    state.stats_cache.invalidate_all();
    Ok(StatusCode::NO_CONTENT)
}
