//! Dashboard API endpoint (`/api/dashboard/stats`)

use axum::{extract::State, routing::get, Json, Router};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::DashboardStats;

/// Build the dashboard router
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

/// GET /api/dashboard/stats - Role-specific aggregates for the caller
async fn get_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<DashboardStats>, ApiError> {
    let stats = state.dashboard_service.stats(&user.0).await?;
    Ok(Json(stats))
}
