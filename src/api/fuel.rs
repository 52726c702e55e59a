//! Fuel request API endpoints (`/api/fuel-requests`)
//!
//! Schools order fuel; producers pick requests from the pending pool,
//! approve them and mark them delivered.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::common::{default_page, default_page_size, paginate, Paginated, PaginationQuery};
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{
    CreateFuelRequestInput, FuelRequest, FuelRequestStatus, UpdateFuelRequestInput,
};

/// Query parameters for the request list
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    pub status: Option<FuelRequestStatus>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Request body for a status change
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: FuelRequestStatus,
}

/// Build the fuel-requests router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests).post(create_request))
        .route(
            "/{id}",
            get(get_request).put(update_request).delete(delete_request),
        )
        .route("/{id}/status", axum::routing::put(update_status))
}

/// POST /api/fuel-requests - Create a fuel request
async fn create_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<CreateFuelRequestInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let request = state.fuel_service.create(&user.0, input).await?;
    state.stats_cache.invalidate_all();
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/fuel-requests - List requests visible to the caller
async fn list_requests(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Paginated<FuelRequest>>, ApiError> {
    let mut requests = state.fuel_service.list(&user.0).await?;
    if let Some(status) = query.status {
        requests.retain(|r| r.status == status);
    }

    let pagination = PaginationQuery {
        page: query.page,
        page_size: query.page_size,
    };
    Ok(Json(paginate(requests, &pagination)))
}

/// GET /api/fuel-requests/{id} - Fetch one request
async fn get_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<FuelRequest>, ApiError> {
    let request = state.fuel_service.get(&user.0, id).await?;
    Ok(Json(request))
}

/// PUT /api/fuel-requests/{id} - Edit a pending request
async fn update_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateFuelRequestInput>,
) -> Result<Json<FuelRequest>, ApiError> {
    let request = state.fuel_service.update(&user.0, id, input).await?;
    state.stats_cache.invalidate_all();
    Ok(Json(request))
}

/// PUT /api/fuel-requests/{id}/status - Approve, deliver or cancel
async fn update_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<FuelRequest>, ApiError> {
    let request = state
        .fuel_service
        .update_status(&user.0, id, body.status)
        .await?;
    state.stats_cache.invalidate_all();
    Ok(Json(request))
}

/// DELETE /api/fuel-requests/{id} - Withdraw a request
async fn delete_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.fuel_service.delete(&user.0, id).await?;
    state.stats_cache.invalidate_all();
    Ok(StatusCode::NO_CONTENT)
}
