//! Authentication API endpoints
//!
//! - POST /api/register - registration (role chosen at sign-up)
//! - POST /api/auth/login - email/password login
//! - POST /api/auth/google - Google ID-token sign-in
//! - POST /api/auth/logout - revoke the current session
//! - GET /api/auth/me - current user
//! - PUT /api/auth/profile - profile update
//! - PUT /api/auth/password - password change

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::api::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::{UpdateProfileInput, User, UserRole};
use crate::services::{LoginInput, RegisterInput};

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub organization: Option<String>,
    pub phone: Option<String>,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for Google sign-in
#[derive(Debug, Deserialize)]
pub struct GoogleSignInRequest {
    pub id_token: String,
    pub role: Option<UserRole>,
}

/// Request body for profile update
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub profile_photo: Option<String>,
    pub cover_photo: Option<String>,
}

/// Request body for password change
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Response for successful authentication
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Build public auth routes (no auth required)
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/google", post(google_sign_in))
}

/// Build protected auth routes (requires auth middleware)
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
        .route("/profile", put(update_profile))
        .route("/password", put(change_password))
}

/// Client IP as reported by the reverse proxy, if any
fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim);
    let raw = forwarded.or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))?;
    raw.parse().ok()
}

/// Bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.to_string())
}

/// POST /api/register - User registration
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let password = body.password.clone();
    let input = RegisterInput {
        name: body.name,
        email: body.email,
        password: body.password,
        role: body.role,
        organization: body.organization,
        phone: body.phone,
    };
    let user = state.user_service.register(input).await?;

    // Issue a session so the client is signed in right after registering
    let (session, user) = state
        .user_service
        .login(
            LoginInput {
                email: user.email,
                password,
            },
            None,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user,
            token: session.id,
        }),
    ))
}

/// POST /api/auth/login - User login
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let ip = client_ip(&headers);
    let (session, user) = state
        .user_service
        .login(
            LoginInput {
                email: body.email,
                password: body.password,
            },
            ip,
        )
        .await?;

    Ok(Json(AuthResponse {
        user,
        token: session.id,
    }))
}

/// POST /api/auth/google - Google ID-token sign-in
async fn google_sign_in(
    State(state): State<AppState>,
    Json(body): Json<GoogleSignInRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (session, user) = state
        .user_service
        .google_sign_in(&body.id_token, body.role)
        .await?;

    Ok(Json(AuthResponse {
        user,
        token: session.id,
    }))
}

/// POST /api/auth/logout - Revoke the current session
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    _user: AuthenticatedUser,
) -> Result<StatusCode, ApiError> {
    if let Some(token) = bearer_token(&headers) {
        state.user_service.logout(&token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me - Current user
async fn get_current_user(user: AuthenticatedUser) -> Json<User> {
    Json(user.0)
}

/// PUT /api/auth/profile - Update own profile
async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    let input = UpdateProfileInput {
        name: body.name,
        organization: body.organization,
        phone: body.phone,
        profile_photo: body.profile_photo,
        cover_photo: body.cover_photo,
    };
    let updated = state.user_service.update_profile(user.0.id, input).await?;
    Ok(Json(updated))
}

/// PUT /api/auth/password - Change own password
async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    user: AuthenticatedUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;
    state
        .user_service
        .change_password(user.0.id, &body.current_password, &body.new_password, &token)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
