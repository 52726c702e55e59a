//! API middleware
//!
//! Bearer-token authentication, admin authorization, shared application
//! state and the JSON error envelope returned by every endpoint.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cache::StatsCache;
use crate::models::User;
use crate::services::{
    ContentService, ContentServiceError, DashboardService, DashboardServiceError, FuelService,
    FuelServiceError, MessageService, MessageServiceError, UserService, UserServiceError,
    WasteService, WasteServiceError,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub user_service: Arc<UserService>,
    pub waste_service: Arc<WasteService>,
    pub fuel_service: Arc<FuelService>,
    pub message_service: Arc<MessageService>,
    pub content_service: Arc<ContentService>,
    pub dashboard_service: Arc<DashboardService>,
    pub stats_cache: StatsCache,
}

/// Authenticated user extracted from request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new("RATE_LIMITED", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" | "ACCOUNT_SUSPENDED" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            "RATE_LIMITED" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

fn internal(err: anyhow::Error) -> ApiError {
    tracing::error!(error = %err, "Request failed");
    ApiError::internal_error("Internal server error")
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::AuthenticationError(msg) => ApiError::unauthorized(msg),
            UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            UserServiceError::UserExists(msg) => ApiError::conflict(msg),
            UserServiceError::RateLimited => {
                ApiError::rate_limited("Too many attempts, try again later")
            }
            UserServiceError::AccountSuspended => {
                ApiError::new("ACCOUNT_SUSPENDED", "Account is suspended")
            }
            UserServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            UserServiceError::NotFound => ApiError::not_found("User not found"),
            UserServiceError::SessionExpired => ApiError::unauthorized("Session expired"),
            UserServiceError::SessionNotFound => {
                ApiError::unauthorized("Invalid or expired session")
            }
            UserServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<WasteServiceError> for ApiError {
    fn from(err: WasteServiceError) -> Self {
        match err {
            WasteServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            WasteServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            WasteServiceError::NotFound => ApiError::not_found("Waste entry not found"),
            WasteServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<FuelServiceError> for ApiError {
    fn from(err: FuelServiceError) -> Self {
        match err {
            FuelServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            FuelServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            FuelServiceError::NotFound => ApiError::not_found("Fuel request not found"),
            FuelServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<MessageServiceError> for ApiError {
    fn from(err: MessageServiceError) -> Self {
        match err {
            MessageServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            MessageServiceError::RecipientNotFound => ApiError::not_found("Recipient not found"),
            MessageServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<ContentServiceError> for ApiError {
    fn from(err: ContentServiceError) -> Self {
        match err {
            ContentServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            ContentServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            ContentServiceError::NotFound => ApiError::not_found("Content post not found"),
            ContentServiceError::InternalError(e) => internal(e),
        }
    }
}

impl From<DashboardServiceError> for ApiError {
    fn from(err: DashboardServiceError) -> Self {
        match err {
            DashboardServiceError::InternalError(e) => internal(e),
        }
    }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(request: &Request) -> Option<String> {
    let auth_header = request.headers().get(header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    auth_str.strip_prefix("Bearer ").map(|t| t.to_string())
}

/// Authentication middleware
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let user = state.user_service.authenticate(&token).await?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

/// Admin authorization middleware
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !user.0.is_admin() {
        return Err(ApiError::forbidden("Admin privileges required"));
    }

    Ok(next.run(request).await)
}
