//! Messaging service
//!
//! Direct messages between users. Fetching a conversation marks the peer's
//! messages as read, which is what clears the unread badge under polling.

use crate::db::repositories::{MessageRepository, UserRepository};
use crate::models::{Contact, Message, User, MAX_MESSAGE_LENGTH};
use anyhow::Context;
use std::sync::Arc;

/// Error types for messaging operations
#[derive(Debug, thiserror::Error)]
pub enum MessageServiceError {
    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Receiver not found
    #[error("Recipient not found")]
    RecipientNotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Messaging service
pub struct MessageService {
    message_repo: Arc<dyn MessageRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl MessageService {
    /// Create a new message service
    pub fn new(
        message_repo: Arc<dyn MessageRepository>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            message_repo,
            user_repo,
        }
    }

    /// Send a message from the caller to another user
    pub async fn send(
        &self,
        caller: &User,
        receiver_id: i64,
        content: &str,
    ) -> Result<Message, MessageServiceError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(MessageServiceError::ValidationError(
                "Message cannot be empty".to_string(),
            ));
        }
        if content.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(MessageServiceError::ValidationError(format!(
                "Message exceeds {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }
        if receiver_id == caller.id {
            return Err(MessageServiceError::ValidationError(
                "Cannot message yourself".to_string(),
            ));
        }
        if self
            .user_repo
            .get_by_id(receiver_id)
            .await
            .context("Failed to look up recipient")?
            .is_none()
        {
            return Err(MessageServiceError::RecipientNotFound);
        }

        let message = self
            .message_repo
            .create(caller.id, receiver_id, content)
            .await
            .context("Failed to send message")?;
        Ok(message)
    }

    /// Fetch the conversation with a peer, marking their messages read.
    pub async fn conversation(
        &self,
        caller: &User,
        peer_id: i64,
    ) -> Result<Vec<Message>, MessageServiceError> {
        self.message_repo
            .mark_read(caller.id, peer_id)
            .await
            .context("Failed to mark messages read")?;

        let messages = self
            .message_repo
            .conversation(caller.id, peer_id)
            .await
            .context("Failed to load conversation")?;
        Ok(messages)
    }

    /// Conversation peers with preview and unread counts
    pub async fn contacts(&self, caller: &User) -> Result<Vec<Contact>, MessageServiceError> {
        Ok(self
            .message_repo
            .contacts(caller.id)
            .await
            .context("Failed to load contacts")?)
    }

    /// Total unread messages for the caller
    pub async fn unread_count(&self, caller: &User) -> Result<i64, MessageServiceError> {
        Ok(self
            .message_repo
            .unread_count(caller.id)
            .await
            .context("Failed to count unread messages")?)
    }
}
