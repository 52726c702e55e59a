//! User service
//!
//! Business logic for accounts and authentication:
//! - Registration with role selection; the first account becomes admin
//! - Credential login with per-email and per-IP rate limiting
//! - Google sign-in (verified ID token, account created on first use)
//! - Session issue/validate/revoke
//! - Profile and password updates
//! - Admin account management

use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{Session, UpdateProfileInput, User, UserRole, UserStatus};
use crate::services::google::{GoogleTokenVerifier, GoogleVerifyError};
use crate::services::password::{hash_password, is_acceptable, verify_password};
use crate::services::rate_limiter::LoginRateLimiter;
use crate::services::validation::{is_valid_email, is_valid_phone};
use anyhow::Context;
use chrono::{Duration, Utc};
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

/// Default session expiration time in days
const DEFAULT_SESSION_DAYS: i64 = 7;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Too many attempts
    #[error("Too many attempts, try again later")]
    RateLimited,

    /// Account is suspended
    #[error("Account is suspended")]
    AccountSuspended,

    /// Operation not permitted
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// User not found
    #[error("User not found")]
    NotFound,

    /// Session expired
    #[error("Session expired")]
    SessionExpired,

    /// Session not found
    #[error("Session not found")]
    SessionNotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub organization: Option<String>,
    pub phone: Option<String>,
}

/// Login input
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// User service for accounts and authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    rate_limiter: Arc<LoginRateLimiter>,
    google_verifier: Arc<dyn GoogleTokenVerifier>,
    session_days: i64,
}

impl UserService {
    /// Create a new user service
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        rate_limiter: Arc<LoginRateLimiter>,
        google_verifier: Arc<dyn GoogleTokenVerifier>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            rate_limiter,
            google_verifier,
            session_days: DEFAULT_SESSION_DAYS,
        }
    }

    /// Override the session lifetime
    pub fn with_session_days(mut self, session_days: i64) -> Self {
        self.session_days = session_days;
        self
    }

    /// Register a new user.
    ///
    /// The very first account in the system becomes an administrator
    /// regardless of the requested role; everyone after that gets the role
    /// they asked for, except that admin cannot be self-assigned.
    pub async fn register(&self, input: RegisterInput) -> Result<User, UserServiceError> {
        self.validate_register_input(&input)?;

        if self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Email '{}' is already registered",
                input.email
            )));
        }

        let is_first = self.user_repo.count().await.context("Failed to count users")? == 0;
        let role = if is_first { UserRole::Admin } else { input.role };

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let mut user = User::new(input.name, input.email, password_hash, role);
        user.organization = input.organization;
        user.phone = input.phone;

        let created = self
            .user_repo
            .create(&user)
            .await
            .context("Failed to create user")?;

        tracing::info!(user_id = created.id, role = %created.role, "User registered");
        Ok(created)
    }

    fn validate_register_input(&self, input: &RegisterInput) -> Result<(), UserServiceError> {
        if input.name.trim().is_empty() {
            return Err(UserServiceError::ValidationError(
                "Name cannot be empty".to_string(),
            ));
        }
        if !is_valid_email(&input.email) {
            return Err(UserServiceError::ValidationError(
                "Invalid email address".to_string(),
            ));
        }
        if !is_acceptable(&input.password) {
            return Err(UserServiceError::ValidationError(
                "Password is too weak: use at least 8 characters mixing case, digits or symbols"
                    .to_string(),
            ));
        }
        if input.role == UserRole::Admin {
            return Err(UserServiceError::ValidationError(
                "Cannot register as administrator".to_string(),
            ));
        }
        if let Some(phone) = &input.phone {
            if !is_valid_phone(phone) {
                return Err(UserServiceError::ValidationError(
                    "Invalid phone number".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Login with email and password, returning the session and user.
    pub async fn login(
        &self,
        input: LoginInput,
        ip: Option<IpAddr>,
    ) -> Result<(Session, User), UserServiceError> {
        if let Some(ip) = ip {
            if self.rate_limiter.is_ip_limited(ip).await {
                return Err(UserServiceError::RateLimited);
            }
            self.rate_limiter.record_ip_request(ip).await;
        }
        if self.rate_limiter.is_email_limited(&input.email).await {
            return Err(UserServiceError::RateLimited);
        }

        let user = match self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to look up user")?
        {
            Some(user) => user,
            None => {
                self.rate_limiter.record_failed_attempt(&input.email).await;
                return Err(UserServiceError::AuthenticationError(
                    "Invalid email or password".to_string(),
                ));
            }
        };

        // Google-only accounts have no password
        let password_ok = !user.password_hash.is_empty()
            && verify_password(&input.password, &user.password_hash)
                .context("Failed to verify password")?;
        if !password_ok {
            self.rate_limiter.record_failed_attempt(&input.email).await;
            return Err(UserServiceError::AuthenticationError(
                "Invalid email or password".to_string(),
            ));
        }

        if user.is_suspended() {
            return Err(UserServiceError::AccountSuspended);
        }

        self.rate_limiter.clear_email_attempts(&input.email).await;

        let session = self.create_session(user.id).await?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok((session, user))
    }

    /// Sign in with a Google ID token.
    ///
    /// Creates an account on first use; returning users are matched by the
    /// Google email. `requested_role` only applies to that first sign-in;
    /// without it new Google accounts default to the school role.
    pub async fn google_sign_in(
        &self,
        id_token: &str,
        requested_role: Option<UserRole>,
    ) -> Result<(Session, User), UserServiceError> {
        if requested_role == Some(UserRole::Admin) {
            return Err(UserServiceError::ValidationError(
                "Cannot register as administrator".to_string(),
            ));
        }
        let claims = self.google_verifier.verify(id_token).await.map_err(|e| match e {
            GoogleVerifyError::NotConfigured => {
                UserServiceError::ValidationError("Google sign-in is not configured".to_string())
            }
            GoogleVerifyError::InvalidToken(msg) => UserServiceError::AuthenticationError(msg),
            GoogleVerifyError::InternalError(e) => UserServiceError::InternalError(e),
        })?;

        let user = match self
            .user_repo
            .get_by_email(&claims.email)
            .await
            .context("Failed to look up user")?
        {
            Some(user) => user,
            None => {
                let is_first =
                    self.user_repo.count().await.context("Failed to count users")? == 0;
                let role = if is_first {
                    UserRole::Admin
                } else {
                    requested_role.unwrap_or(UserRole::School)
                };
                let mut user = User::new(claims.name, claims.email, String::new(), role);
                user.profile_photo = claims.picture;
                let created = self
                    .user_repo
                    .create(&user)
                    .await
                    .context("Failed to create user")?;
                tracing::info!(user_id = created.id, "Google account created");
                created
            }
        };

        if user.is_suspended() {
            return Err(UserServiceError::AccountSuspended);
        }

        let session = self.create_session(user.id).await?;
        Ok((session, user))
    }

    async fn create_session(&self, user_id: i64) -> Result<Session, UserServiceError> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + Duration::days(self.session_days),
            created_at: now,
        };
        let session = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;
        Ok(session)
    }

    /// Resolve a bearer token to its user.
    ///
    /// Expired sessions are deleted on sight; suspended accounts are
    /// rejected even when their session is still valid.
    pub async fn authenticate(&self, token: &str) -> Result<User, UserServiceError> {
        let session = self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to look up session")?
            .ok_or(UserServiceError::SessionNotFound)?;

        if session.is_expired() {
            self.session_repo
                .delete(&session.id)
                .await
                .context("Failed to delete expired session")?;
            return Err(UserServiceError::SessionExpired);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to look up user")?
            .ok_or(UserServiceError::SessionNotFound)?;

        if user.is_suspended() {
            return Err(UserServiceError::AccountSuspended);
        }

        Ok(user)
    }

    /// Logout: revoke the session token
    pub async fn logout(&self, token: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(token)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// Update the caller's own profile
    pub async fn update_profile(
        &self,
        user_id: i64,
        input: UpdateProfileInput,
    ) -> Result<User, UserServiceError> {
        if let Some(name) = &input.name {
            if name.trim().is_empty() {
                return Err(UserServiceError::ValidationError(
                    "Name cannot be empty".to_string(),
                ));
            }
        }
        if let Some(phone) = &input.phone {
            if !is_valid_phone(phone) {
                return Err(UserServiceError::ValidationError(
                    "Invalid phone number".to_string(),
                ));
            }
        }

        self.user_repo
            .update_profile(user_id, &input)
            .await
            .context("Failed to update profile")?
            .ok_or(UserServiceError::NotFound)
    }

    /// Change the caller's password, verifying the current one first.
    ///
    /// All other sessions are revoked; the caller keeps the session named
    /// by `keep_token`.
    pub async fn change_password(
        &self,
        user_id: i64,
        current: &str,
        new: &str,
        keep_token: &str,
    ) -> Result<(), UserServiceError> {
        let user = self
            .user_repo
            .get_by_id(user_id)
            .await
            .context("Failed to look up user")?
            .ok_or(UserServiceError::NotFound)?;

        let current_ok = !user.password_hash.is_empty()
            && verify_password(current, &user.password_hash)
                .context("Failed to verify password")?;
        if !current_ok {
            return Err(UserServiceError::AuthenticationError(
                "Current password is incorrect".to_string(),
            ));
        }
        if !is_acceptable(new) {
            return Err(UserServiceError::ValidationError(
                "Password is too weak: use at least 8 characters mixing case, digits or symbols"
                    .to_string(),
            ));
        }

        let hash = hash_password(new).context("Failed to hash password")?;
        self.user_repo
            .update_password_hash(user_id, &hash)
            .await
            .context("Failed to store password")?;

        // Revoke every session, then restore the caller's
        let keep = self
            .session_repo
            .get_by_id(keep_token)
            .await
            .context("Failed to look up session")?;
        self.session_repo
            .delete_by_user(user_id)
            .await
            .context("Failed to revoke sessions")?;
        if let Some(keep) = keep {
            self.session_repo
                .create(&keep)
                .await
                .context("Failed to restore session")?;
        }

        Ok(())
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i64) -> Result<User, UserServiceError> {
        self.user_repo
            .get_by_id(id)
            .await
            .context("Failed to look up user")?
            .ok_or(UserServiceError::NotFound)
    }

    /// List all users (admin)
    pub async fn list_users(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self.user_repo.list().await.context("Failed to list users")?)
    }

    /// List users with a given role
    pub async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, UserServiceError> {
        Ok(self
            .user_repo
            .list_by_role(role)
            .await
            .context("Failed to list users by role")?)
    }

    /// Update a user's role and status (admin)
    pub async fn admin_update_user(
        &self,
        id: i64,
        role: UserRole,
        status: UserStatus,
    ) -> Result<User, UserServiceError> {
        let updated = self
            .user_repo
            .update_role_status(id, role, status)
            .await
            .context("Failed to update user")?
            .ok_or(UserServiceError::NotFound)?;

        // Suspension takes effect immediately
        if updated.is_suspended() {
            self.session_repo
                .delete_by_user(id)
                .await
                .context("Failed to revoke sessions")?;
        }

        Ok(updated)
    }

    /// Delete a user account (admin). Admins cannot delete themselves.
    pub async fn admin_delete_user(
        &self,
        admin_id: i64,
        target_id: i64,
    ) -> Result<(), UserServiceError> {
        if admin_id == target_id {
            return Err(UserServiceError::Forbidden(
                "Administrators cannot delete their own account".to_string(),
            ));
        }
        let deleted = self
            .user_repo
            .delete(target_id)
            .await
            .context("Failed to delete user")?;
        if !deleted {
            return Err(UserServiceError::NotFound);
        }
        tracing::info!(user_id = target_id, "User deleted by admin");
        Ok(())
    }

    /// Remove expired sessions; called periodically from a background task
    pub async fn cleanup_expired_sessions(&self) -> Result<i64, UserServiceError> {
        let removed = self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to delete expired sessions")?;
        if removed > 0 {
            tracing::debug!(removed, "Expired sessions removed");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_util::setup_pool;
    use crate::db::repositories::{SqlxSessionRepository, SqlxUserRepository};
    use crate::services::google::GoogleClaims;
    use async_trait::async_trait;

    struct StubVerifier {
        claims: Option<GoogleClaims>,
    }

    #[async_trait]
    impl GoogleTokenVerifier for StubVerifier {
        async fn verify(&self, _id_token: &str) -> Result<GoogleClaims, GoogleVerifyError> {
            self.claims
                .clone()
                .ok_or_else(|| GoogleVerifyError::InvalidToken("stub rejection".to_string()))
        }
    }

    fn stub_verifier(claims: Option<GoogleClaims>) -> Arc<dyn GoogleTokenVerifier> {
        Arc::new(StubVerifier { claims })
    }

    async fn make_service(verifier: Arc<dyn GoogleTokenVerifier>) -> UserService {
        let pool = setup_pool().await;
        UserService::new(
            SqlxUserRepository::boxed(pool.clone()),
            SqlxSessionRepository::boxed(pool),
            Arc::new(LoginRateLimiter::new()),
            verifier,
        )
    }

    fn register_input(email: &str, role: UserRole) -> RegisterInput {
        RegisterInput {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "Passw0rd!".to_string(),
            role,
            organization: None,
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_first_user_becomes_admin() {
        let service = make_service(stub_verifier(None)).await;

        let first = service
            .register(register_input("first@example.com", UserRole::School))
            .await
            .unwrap();
        assert_eq!(first.role, UserRole::Admin);

        let second = service
            .register(register_input("second@example.com", UserRole::Producer))
            .await
            .unwrap();
        assert_eq!(second.role, UserRole::Producer);
    }

    #[tokio::test]
    async fn test_register_rejects_admin_role() {
        let service = make_service(stub_verifier(None)).await;
        service
            .register(register_input("first@example.com", UserRole::School))
            .await
            .unwrap();

        let result = service
            .register(register_input("sneaky@example.com", UserRole::Admin))
            .await;
        assert!(matches!(result, Err(UserServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let service = make_service(stub_verifier(None)).await;
        let mut input = register_input("weak@example.com", UserRole::School);
        input.password = "abc".to_string();
        let result = service.register(input).await;
        assert!(matches!(result, Err(UserServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let service = make_service(stub_verifier(None)).await;
        service
            .register(register_input("dup@example.com", UserRole::School))
            .await
            .unwrap();
        let result = service
            .register(register_input("dup@example.com", UserRole::Supplier))
            .await;
        assert!(matches!(result, Err(UserServiceError::UserExists(_))));
    }

    #[tokio::test]
    async fn test_login_and_authenticate() {
        let service = make_service(stub_verifier(None)).await;
        let user = service
            .register(register_input("alice@example.com", UserRole::Supplier))
            .await
            .unwrap();

        let (session, logged_in) = service
            .login(
                LoginInput {
                    email: "alice@example.com".to_string(),
                    password: "Passw0rd!".to_string(),
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);

        let authed = service.authenticate(&session.id).await.unwrap();
        assert_eq!(authed.id, user.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = make_service(stub_verifier(None)).await;
        service
            .register(register_input("alice@example.com", UserRole::Supplier))
            .await
            .unwrap();

        let result = service
            .login(
                LoginInput {
                    email: "alice@example.com".to_string(),
                    password: "WrongPass1!".to_string(),
                },
                None,
            )
            .await;
        assert!(matches!(
            result,
            Err(UserServiceError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_login_rate_limited_after_failures() {
        let service = make_service(stub_verifier(None)).await;
        service
            .register(register_input("alice@example.com", UserRole::Supplier))
            .await
            .unwrap();

        let bad = LoginInput {
            email: "alice@example.com".to_string(),
            password: "WrongPass1!".to_string(),
        };
        for _ in 0..5 {
            let _ = service.login(bad.clone(), None).await;
        }
        let result = service.login(bad, None).await;
        assert!(matches!(result, Err(UserServiceError::RateLimited)));
    }

    #[tokio::test]
    async fn test_suspended_user_cannot_login() {
        let service = make_service(stub_verifier(None)).await;
        let admin = service
            .register(register_input("admin@example.com", UserRole::School))
            .await
            .unwrap();
        let user = service
            .register(register_input("alice@example.com", UserRole::Supplier))
            .await
            .unwrap();
        assert!(admin.is_admin());

        service
            .admin_update_user(user.id, UserRole::Supplier, UserStatus::Suspended)
            .await
            .unwrap();

        let result = service
            .login(
                LoginInput {
                    email: "alice@example.com".to_string(),
                    password: "Passw0rd!".to_string(),
                },
                None,
            )
            .await;
        assert!(matches!(result, Err(UserServiceError::AccountSuspended)));
    }

    #[tokio::test]
    async fn test_suspension_revokes_sessions() {
        let service = make_service(stub_verifier(None)).await;
        service
            .register(register_input("admin@example.com", UserRole::School))
            .await
            .unwrap();
        let user = service
            .register(register_input("alice@example.com", UserRole::Supplier))
            .await
            .unwrap();
        let (session, _) = service
            .login(
                LoginInput {
                    email: "alice@example.com".to_string(),
                    password: "Passw0rd!".to_string(),
                },
                None,
            )
            .await
            .unwrap();

        service
            .admin_update_user(user.id, UserRole::Supplier, UserStatus::Suspended)
            .await
            .unwrap();

        let result = service.authenticate(&session.id).await;
        assert!(matches!(result, Err(UserServiceError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_google_sign_in_creates_account() {
        let claims = GoogleClaims {
            email: "google@example.com".to_string(),
            name: "Google User".to_string(),
            picture: Some("https://example.com/photo.jpg".to_string()),
        };
        let service = make_service(stub_verifier(Some(claims))).await;
        // Seed an admin so the Google user is not first
        service
            .register(register_input("admin@example.com", UserRole::School))
            .await
            .unwrap();

        let (_, user) = service.google_sign_in("token", None).await.unwrap();
        assert_eq!(user.email, "google@example.com");
        assert_eq!(user.role, UserRole::School);
        assert!(user.password_hash.is_empty());
        assert_eq!(
            user.profile_photo.as_deref(),
            Some("https://example.com/photo.jpg")
        );

        // Second sign-in reuses the account; the role request is ignored
        let (_, again) = service
            .google_sign_in("token", Some(UserRole::Producer))
            .await
            .unwrap();
        assert_eq!(again.id, user.id);
        assert_eq!(again.role, UserRole::School);
    }

    #[tokio::test]
    async fn test_google_only_account_cannot_password_login() {
        let claims = GoogleClaims {
            email: "google@example.com".to_string(),
            name: "Google User".to_string(),
            picture: None,
        };
        let service = make_service(stub_verifier(Some(claims))).await;
        service
            .register(register_input("admin@example.com", UserRole::School))
            .await
            .unwrap();
        service.google_sign_in("token", None).await.unwrap();

        let result = service
            .login(
                LoginInput {
                    email: "google@example.com".to_string(),
                    password: "".to_string(),
                },
                None,
            )
            .await;
        assert!(matches!(
            result,
            Err(UserServiceError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let service = make_service(stub_verifier(None)).await;
        service
            .register(register_input("alice@example.com", UserRole::School))
            .await
            .unwrap();
        let (session, _) = service
            .login(
                LoginInput {
                    email: "alice@example.com".to_string(),
                    password: "Passw0rd!".to_string(),
                },
                None,
            )
            .await
            .unwrap();

        service.logout(&session.id).await.unwrap();
        let result = service.authenticate(&session.id).await;
        assert!(matches!(result, Err(UserServiceError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_change_password_keeps_current_session() {
        let service = make_service(stub_verifier(None)).await;
        let user = service
            .register(register_input("alice@example.com", UserRole::School))
            .await
            .unwrap();
        let login = LoginInput {
            email: "alice@example.com".to_string(),
            password: "Passw0rd!".to_string(),
        };
        let (keep, _) = service.login(login.clone(), None).await.unwrap();
        let (other, _) = service.login(login, None).await.unwrap();

        service
            .change_password(user.id, "Passw0rd!", "NewPassw0rd!", &keep.id)
            .await
            .unwrap();

        assert!(service.authenticate(&keep.id).await.is_ok());
        assert!(service.authenticate(&other.id).await.is_err());

        let (_, logged_in) = service
            .login(
                LoginInput {
                    email: "alice@example.com".to_string(),
                    password: "NewPassw0rd!".to_string(),
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_change_password_wrong_current() {
        let service = make_service(stub_verifier(None)).await;
        let user = service
            .register(register_input("alice@example.com", UserRole::School))
            .await
            .unwrap();

        let result = service
            .change_password(user.id, "WrongPass1!", "NewPassw0rd!", "token")
            .await;
        assert!(matches!(
            result,
            Err(UserServiceError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_self() {
        let service = make_service(stub_verifier(None)).await;
        let admin = service
            .register(register_input("admin@example.com", UserRole::School))
            .await
            .unwrap();

        let result = service.admin_delete_user(admin.id, admin.id).await;
        assert!(matches!(result, Err(UserServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_admin_delete_user() {
        let service = make_service(stub_verifier(None)).await;
        let admin = service
            .register(register_input("admin@example.com", UserRole::School))
            .await
            .unwrap();
        let user = service
            .register(register_input("alice@example.com", UserRole::Supplier))
            .await
            .unwrap();

        service.admin_delete_user(admin.id, user.id).await.unwrap();
        assert!(matches!(
            service.get_user(user.id).await,
            Err(UserServiceError::NotFound)
        ));
        assert!(matches!(
            service.admin_delete_user(admin.id, user.id).await,
            Err(UserServiceError::NotFound)
        ));
    }
}
