//! Google sign-in token verification
//!
//! Verifies Google ID tokens against the tokeninfo endpoint. The token's
//! audience must match the configured OAuth client ID and the Google account
//! email must be verified.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Claims extracted from a verified Google ID token
#[derive(Debug, Clone)]
pub struct GoogleClaims {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

/// Error types for Google token verification
#[derive(Debug, thiserror::Error)]
pub enum GoogleVerifyError {
    /// Sign-in with Google is not configured
    #[error("Google sign-in is not configured")]
    NotConfigured,

    /// The token was rejected
    #[error("Invalid Google token: {0}")]
    InvalidToken(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Verifier seam so the auth flow can be tested without network access
#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleClaims, GoogleVerifyError>;
}

/// Tokeninfo response fields we care about
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    email: String,
    #[serde(default)]
    email_verified: String,
    #[serde(default)]
    name: String,
    picture: Option<String>,
}

/// Verifier backed by Google's tokeninfo endpoint
pub struct HttpGoogleVerifier {
    client: reqwest::Client,
    client_id: Option<String>,
}

impl HttpGoogleVerifier {
    /// Create a verifier for the given OAuth client ID. `None` disables
    /// Google sign-in.
    pub fn new(client_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
        }
    }
}

#[async_trait]
impl GoogleTokenVerifier for HttpGoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleClaims, GoogleVerifyError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or(GoogleVerifyError::NotConfigured)?;

        let response = self
            .client
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .context("Failed to reach Google tokeninfo endpoint")?;

        if !response.status().is_success() {
            return Err(GoogleVerifyError::InvalidToken(
                "Token rejected by Google".to_string(),
            ));
        }

        let info: TokenInfo = response
            .json()
            .await
            .context("Failed to parse tokeninfo response")?;

        if info.aud != client_id {
            return Err(GoogleVerifyError::InvalidToken(
                "Token issued for a different application".to_string(),
            ));
        }
        if info.email_verified != "true" {
            return Err(GoogleVerifyError::InvalidToken(
                "Google account email is not verified".to_string(),
            ));
        }

        let name = if info.name.is_empty() {
            info.email.clone()
        } else {
            info.name
        };

        Ok(GoogleClaims {
            email: info.email,
            name,
            picture: info.picture,
        })
    }
}
