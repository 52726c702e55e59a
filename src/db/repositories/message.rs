//! Message repository
//!
//! Storage for direct messages and the aggregate queries backing the
//! contact list and unread badge.

use crate::models::{Contact, Message};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Message repository trait
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Store a new message
    async fn create(&self, sender_id: i64, receiver_id: i64, content: &str) -> Result<Message>;

    /// Messages between two users, oldest first
    async fn conversation(&self, user_a: i64, user_b: i64) -> Result<Vec<Message>>;

    /// Mark all messages from `peer_id` to `user_id` as read, returning
    /// how many were flipped
    async fn mark_read(&self, user_id: i64, peer_id: i64) -> Result<i64>;

    /// Conversation peers for a user with preview data, most recent first
    async fn contacts(&self, user_id: i64) -> Result<Vec<Contact>>;

    /// Total unread messages for a user
    async fn unread_count(&self, user_id: i64) -> Result<i64>;
}

/// SQLx-based message repository implementation
pub struct SqlxMessageRepository {
    pool: SqlitePool,
}

impl SqlxMessageRepository {
    /// Create a new SQLx message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn MessageRepository> {
        Arc::new(Self::new(pool))
    }
}

fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Message {
    Message {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        receiver_id: row.get("receiver_id"),
        content: row.get("content"),
        is_read: row.get("is_read"),
        sent_at: row.get("sent_at"),
    }
}

#[async_trait]
impl MessageRepository for SqlxMessageRepository {
    async fn create(&self, sender_id: i64, receiver_id: i64, content: &str) -> Result<Message> {
        let sent_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO messages (sender_id, receiver_id, content, is_read, sent_at)
            VALUES (?, ?, ?, 0, ?)
            "#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .bind(sent_at)
        .execute(&self.pool)
        .await
        .context("Failed to create message")?;

        Ok(Message {
            id: result.last_insert_rowid(),
            sender_id,
            receiver_id,
            content: content.to_string(),
            is_read: false,
            sent_at,
        })
    }

    async fn conversation(&self, user_a: i64, user_b: i64) -> Result<Vec<Message>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, receiver_id, content, is_read, sent_at
            FROM messages
            WHERE (sender_id = ? AND receiver_id = ?) OR (sender_id = ? AND receiver_id = ?)
            ORDER BY sent_at ASC, id ASC
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .bind(user_b)
        .bind(user_a)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load conversation")?;

        Ok(rows.iter().map(row_to_message).collect())
    }

    async fn mark_read(&self, user_id: i64, peer_id: i64) -> Result<i64> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = 1 WHERE receiver_id = ? AND sender_id = ? AND is_read = 0",
        )
        .bind(user_id)
        .bind(peer_id)
        .execute(&self.pool)
        .await
        .context("Failed to mark messages read")?;

        Ok(result.rows_affected() as i64)
    }

    async fn contacts(&self, user_id: i64) -> Result<Vec<Contact>> {
        // One row per peer: the latest message in either direction plus the
        // caller's unread count from that peer.
        let rows = sqlx::query(
            r#"
            SELECT u.id AS user_id,
                   u.name,
                   u.role,
                   u.organization,
                   u.profile_photo,
                   m.content AS last_message,
                   m.sent_at AS last_message_at,
                   (SELECT COUNT(*) FROM messages
                    WHERE sender_id = u.id AND receiver_id = ? AND is_read = 0) AS unread_count
            FROM users u
            JOIN messages m ON m.id = (
                SELECT id FROM messages
                WHERE (sender_id = u.id AND receiver_id = ?)
                   OR (sender_id = ? AND receiver_id = u.id)
                ORDER BY sent_at DESC, id DESC
                LIMIT 1
            )
            WHERE u.id != ?
            ORDER BY m.sent_at DESC, m.id DESC
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load contacts")?;

        Ok(rows
            .iter()
            .map(|row| Contact {
                user_id: row.get("user_id"),
                name: row.get("name"),
                role: row.get("role"),
                organization: row.get("organization"),
                profile_photo: row.get("profile_photo"),
                last_message: row.get("last_message"),
                last_message_at: row.get("last_message_at"),
                unread_count: row.get("unread_count"),
            })
            .collect())
    }

    async fn unread_count(&self, user_id: i64) -> Result<i64> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM messages WHERE receiver_id = ? AND is_read = 0")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .context("Failed to count unread messages")?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_util::{insert_test_user, setup_pool};

    #[tokio::test]
    async fn test_create_and_conversation_order() {
        let pool = setup_pool().await;
        let alice = insert_test_user(&pool, "alice@example.com", "school").await;
        let bob = insert_test_user(&pool, "bob@example.com", "producer").await;
        let repo = SqlxMessageRepository::new(pool);

        repo.create(alice, bob, "Hello").await.unwrap();
        repo.create(bob, alice, "Hi there").await.unwrap();
        repo.create(alice, bob, "Can you deliver Friday?").await.unwrap();

        let convo = repo.conversation(alice, bob).await.unwrap();
        assert_eq!(convo.len(), 3);
        assert_eq!(convo[0].content, "Hello");
        assert_eq!(convo[2].content, "Can you deliver Friday?");
        // Same conversation regardless of argument order
        assert_eq!(repo.conversation(bob, alice).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_conversation_excludes_third_parties() {
        let pool = setup_pool().await;
        let alice = insert_test_user(&pool, "alice@example.com", "school").await;
        let bob = insert_test_user(&pool, "bob@example.com", "producer").await;
        let carol = insert_test_user(&pool, "carol@example.com", "supplier").await;
        let repo = SqlxMessageRepository::new(pool);

        repo.create(alice, bob, "To bob").await.unwrap();
        repo.create(alice, carol, "To carol").await.unwrap();

        let convo = repo.conversation(alice, bob).await.unwrap();
        assert_eq!(convo.len(), 1);
        assert_eq!(convo[0].content, "To bob");
    }

    #[tokio::test]
    async fn test_mark_read_and_unread_count() {
        let pool = setup_pool().await;
        let alice = insert_test_user(&pool, "alice@example.com", "school").await;
        let bob = insert_test_user(&pool, "bob@example.com", "producer").await;
        let repo = SqlxMessageRepository::new(pool);

        repo.create(bob, alice, "One").await.unwrap();
        repo.create(bob, alice, "Two").await.unwrap();
        repo.create(alice, bob, "Reply").await.unwrap();

        assert_eq!(repo.unread_count(alice).await.unwrap(), 2);
        assert_eq!(repo.unread_count(bob).await.unwrap(), 1);

        let flipped = repo.mark_read(alice, bob).await.unwrap();
        assert_eq!(flipped, 2);
        assert_eq!(repo.unread_count(alice).await.unwrap(), 0);
        // Bob's unread message from alice is untouched
        assert_eq!(repo.unread_count(bob).await.unwrap(), 1);
        // Second pass flips nothing
        assert_eq!(repo.mark_read(alice, bob).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_contacts_preview_and_ordering() {
        let pool = setup_pool().await;
        let alice = insert_test_user(&pool, "alice@example.com", "school").await;
        let bob = insert_test_user(&pool, "bob@example.com", "producer").await;
        let carol = insert_test_user(&pool, "carol@example.com", "supplier").await;
        let repo = SqlxMessageRepository::new(pool);

        repo.create(bob, alice, "From bob").await.unwrap();
        repo.create(alice, carol, "To carol").await.unwrap();
        repo.create(carol, alice, "From carol").await.unwrap();

        let contacts = repo.contacts(alice).await.unwrap();
        assert_eq!(contacts.len(), 2);
        // Carol messaged last, so she is first
        assert_eq!(contacts[0].user_id, carol);
        assert_eq!(contacts[0].last_message, "From carol");
        assert_eq!(contacts[0].unread_count, 1);
        assert_eq!(contacts[1].user_id, bob);
        assert_eq!(contacts[1].unread_count, 1);
    }

    #[tokio::test]
    async fn test_contacts_empty_without_messages() {
        let pool = setup_pool().await;
        let alice = insert_test_user(&pool, "alice@example.com", "school").await;
        insert_test_user(&pool, "bob@example.com", "producer").await;
        let repo = SqlxMessageRepository::new(pool);

        assert!(repo.contacts(alice).await.unwrap().is_empty());
        assert_eq!(repo.unread_count(alice).await.unwrap(), 0);
    }
}
