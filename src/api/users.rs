//! User management API endpoints (admin)
//!
//! - GET /api/users - list accounts, optional role filter
//! - PUT /api/users/{id} - change role or status
//! - DELETE /api/users/{id} - delete an account

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::common::{default_page, default_page_size, paginate, Paginated, PaginationQuery};
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{User, UserRole, UserStatus};

/// Query parameters for the user list
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<UserRole>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Request body for updating a user's role or status
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

/// Build the user management router (mounted behind the admin guard)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_users)).route(
        "/{id}",
        axum::routing::put(update_user).delete(delete_user),
    )
}

/// GET /api/users - List accounts
async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Paginated<User>>, ApiError> {
    let users = match query.role {
        Some(role) => state.user_service.list_by_role(role).await?,
        None => state.user_service.list_users().await?,
    };

    let pagination = PaginationQuery {
        page: query.page,
        page_size: query.page_size,
    };
    Ok(Json(paginate(users, &pagination)))
}

/// PUT /api/users/{id} - Change role or status
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    // Unspecified fields keep their current value
    let current = state.user_service.get_user(id).await?;
    let role = body.role.unwrap_or(current.role);
    let status = body.status.unwrap_or(current.status);

    let updated = state.user_service.admin_update_user(id, role, status).await?;
    Ok(Json(updated))
}

/// DELETE /api/users/{id} - Delete an account
async fn delete_user(
    State(state): State<AppState>,
    admin: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.user_service.admin_delete_user(admin.0.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
