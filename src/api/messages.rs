//! Messaging API endpoints (`/api/messages`)
//!
//! Plain REST polling chat: the client fetches the conversation on an
//! interval; fetching marks the peer's messages as read.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{Contact, Message};

/// Request body for sending a message
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub receiver_id: i64,
    pub content: String,
}

/// Query parameter naming the conversation peer
#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub with: i64,
}

/// Response for the unread counter
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

/// Build the messaging router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_conversation).post(send_message))
        .route("/contacts", get(get_contacts))
        .route("/unread-count", get(get_unread_count))
}

/// POST /api/messages - Send a message
async fn send_message(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<SendMessageRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let message = state
        .message_service
        .send(&user.0, body.receiver_id, &body.content)
        .await?;
    // The receiver's unread badge comes from the cached dashboard
    state.stats_cache.invalidate(body.receiver_id).await;
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/messages?with={user_id} - Conversation with a peer
async fn get_conversation(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = state.message_service.conversation(&user.0, query.with).await?;
    // Fetching marked messages read
    state.stats_cache.invalidate(user.0.id).await;
    Ok(Json(messages))
}

/// GET /api/messages/contacts - Chat list with previews and unread counts
async fn get_contacts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = state.message_service.contacts(&user.0).await?;
    Ok(Json(contacts))
}

/// GET /api/messages/unread-count - Total unread for the caller
async fn get_unread_count(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let unread_count = state.message_service.unread_count(&user.0).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}
