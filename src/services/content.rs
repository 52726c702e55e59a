//! Content service
//!
//! Educational posts managed by administrators. Everyone sees published
//! posts; drafts are admin-only.

use crate::db::repositories::ContentRepository;
use crate::models::{ContentPost, CreateContentInput, UpdateContentInput, User};
use anyhow::Context;
use std::sync::Arc;

/// Error types for content operations
#[derive(Debug, thiserror::Error)]
pub enum ContentServiceError {
    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Operation not permitted for this user
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Post not found
    #[error("Content post not found")]
    NotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Content service
pub struct ContentService {
    content_repo: Arc<dyn ContentRepository>,
}

impl ContentService {
    /// Create a new content service
    pub fn new(content_repo: Arc<dyn ContentRepository>) -> Self {
        Self { content_repo }
    }

    /// List posts. Non-admins always get published posts only; admins may
    /// request everything with `include_drafts`.
    pub async fn list(
        &self,
        caller: &User,
        include_drafts: bool,
    ) -> Result<Vec<ContentPost>, ContentServiceError> {
        let published_only = !(caller.is_admin() && include_drafts);
        Ok(self
            .content_repo
            .list(published_only)
            .await
            .context("Failed to list content posts")?)
    }

    /// Get a single post. Drafts are visible to admins only.
    pub async fn get(&self, caller: &User, id: i64) -> Result<ContentPost, ContentServiceError> {
        let post = self
            .content_repo
            .get_by_id(id)
            .await
            .context("Failed to get content post")?
            .ok_or(ContentServiceError::NotFound)?;

        if !post.published && !caller.is_admin() {
            return Err(ContentServiceError::NotFound);
        }
        Ok(post)
    }

    /// Record one view of a published post
    pub async fn record_view(&self, caller: &User, id: i64) -> Result<(), ContentServiceError> {
        // Visibility check doubles as existence check
        self.get(caller, id).await?;
        self.content_repo
            .increment_view(id)
            .await
            .context("Failed to record view")?;
        Ok(())
    }

    /// Create a post (admin only)
    pub async fn create(
        &self,
        caller: &User,
        input: CreateContentInput,
    ) -> Result<ContentPost, ContentServiceError> {
        self.require_admin(caller)?;
        if input.title.trim().is_empty() {
            return Err(ContentServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if input.body.trim().is_empty() {
            return Err(ContentServiceError::ValidationError(
                "Body cannot be empty".to_string(),
            ));
        }

        let post = self
            .content_repo
            .create(caller.id, &input)
            .await
            .context("Failed to create content post")?;
        tracing::info!(post_id = post.id, "Content post created");
        Ok(post)
    }

    /// Update a post (admin only)
    pub async fn update(
        &self,
        caller: &User,
        id: i64,
        input: UpdateContentInput,
    ) -> Result<ContentPost, ContentServiceError> {
        self.require_admin(caller)?;
        if let Some(title) = &input.title {
            if title.trim().is_empty() {
                return Err(ContentServiceError::ValidationError(
                    "Title cannot be empty".to_string(),
                ));
            }
        }
        if let Some(body) = &input.body {
            if body.trim().is_empty() {
                return Err(ContentServiceError::ValidationError(
                    "Body cannot be empty".to_string(),
                ));
            }
        }

        self.content_repo
            .update(id, &input)
            .await
            .context("Failed to update content post")?
            .ok_or(ContentServiceError::NotFound)
    }

    /// Delete a post (admin only)
    pub async fn delete(&self, caller: &User, id: i64) -> Result<(), ContentServiceError> {
        self.require_admin(caller)?;
        let deleted = self
            .content_repo
            .delete(id)
            .await
            .context("Failed to delete content post")?;
        if !deleted {
            return Err(ContentServiceError::NotFound);
        }
        Ok(())
    }

    fn require_admin(&self, caller: &User) -> Result<(), ContentServiceError> {
        if !caller.is_admin() {
            return Err(ContentServiceError::Forbidden(
                "Only administrators can manage content".to_string(),
            ));
        }
        Ok(())
    }
}
