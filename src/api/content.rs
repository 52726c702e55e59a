//! Content management API endpoints (`/api/content`)
//!
//! Educational posts written by administrators. Reading is open to every
//! authenticated user; drafts stay admin-only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::common::{default_page, default_page_size, paginate, Paginated, PaginationQuery};
use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{ContentPost, CreateContentInput, UpdateContentInput};

/// Query parameters for the post list
#[derive(Debug, Deserialize)]
pub struct ListContentQuery {
    /// Include drafts (admin only)
    #[serde(default)]
    pub all: bool,
    pub category: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Build the content router. Write operations stay admin-only; the service
/// enforces that from the caller's role.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route(
            "/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/{id}/view", axum::routing::post(record_view))
}

/// GET /api/content - List posts, featured first
async fn list_posts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ListContentQuery>,
) -> Result<Json<Paginated<ContentPost>>, ApiError> {
    let mut posts = state.content_service.list(&user.0, query.all).await?;
    if let Some(category) = &query.category {
        posts.retain(|p| &p.category == category);
    }

    let pagination = PaginationQuery {
        page: query.page,
        page_size: query.page_size,
    };
    Ok(Json(paginate(posts, &pagination)))
}

/// GET /api/content/{id} - Fetch one post
async fn get_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<ContentPost>, ApiError> {
    let post = state.content_service.get(&user.0, id).await?;
    Ok(Json(post))
}

/// POST /api/content/{id}/view - Count one view
async fn record_view(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.content_service.record_view(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/content - Create a post (admin)
async fn create_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<CreateContentInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let post = state.content_service.create(&user.0, input).await?;
    state.stats_cache.invalidate_all();
    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/content/{id} - Update a post (admin)
async fn update_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateContentInput>,
) -> Result<Json<ContentPost>, ApiError> {
    let post = state.content_service.update(&user.0, id, input).await?;
    state.stats_cache.invalidate_all();
    Ok(Json(post))
}

/// DELETE /api/content/{id} - Delete a post (admin)
async fn delete_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.content_service.delete(&user.0, id).await?;
    state.stats_cache.invalidate_all();
    Ok(StatusCode::NO_CONTENT)
}
