//! Message model
//!
//! Direct messages between two users. The chat is plain REST polling;
//! ordering comes from the `sent_at` database timestamp and read state is a
//! single boolean flipped when the receiver opens the conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum message length in characters
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Message entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier
    pub id: i64,
    /// Sending user
    pub sender_id: i64,
    /// Receiving user
    pub receiver_id: i64,
    /// Message body
    pub content: String,
    /// Whether the receiver has read the message
    pub is_read: bool,
    /// Send timestamp
    pub sent_at: DateTime<Utc>,
}

/// A chat-list row: one conversation peer with preview data
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    /// Peer user id
    pub user_id: i64,
    /// Peer display name
    pub name: String,
    /// Peer role (school/supplier/producer/admin)
    pub role: String,
    /// Peer organization, if set
    pub organization: Option<String>,
    /// Peer profile photo URL, if set
    pub profile_photo: Option<String>,
    /// Body of the most recent message in either direction
    pub last_message: String,
    /// Timestamp of the most recent message
    pub last_message_at: DateTime<Utc>,
    /// Messages from the peer not yet read by the caller
    pub unread_count: i64,
}
