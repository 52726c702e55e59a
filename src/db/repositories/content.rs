//! Content post repository

use crate::models::{ContentPost, CreateContentInput, UpdateContentInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Content post repository trait
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Create a new post
    async fn create(&self, author_id: i64, input: &CreateContentInput) -> Result<ContentPost>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<ContentPost>>;

    /// List posts, featured first then newest. When `published_only` is set,
    /// drafts are excluded.
    async fn list(&self, published_only: bool) -> Result<Vec<ContentPost>>;

    /// Record one view of a post
    async fn increment_view(&self, id: i64) -> Result<bool>;

    /// Update post fields
    async fn update(&self, id: i64, input: &UpdateContentInput) -> Result<Option<ContentPost>>;

    /// Delete a post
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based content repository implementation
pub struct SqlxContentRepository {
    pool: SqlitePool,
}

impl SqlxContentRepository {
    /// Create a new SQLx content repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn ContentRepository> {
        Arc::new(Self::new(pool))
    }
}

const POST_COLUMNS: &str = "id, author_id, title, body, category, tags, published, featured, \
     view_count, created_at, updated_at";

fn row_to_post(row: &sqlx::sqlite::SqliteRow) -> ContentPost {
    let tags: String = row.get("tags");
    ContentPost {
        id: row.get("id"),
        author_id: row.get("author_id"),
        title: row.get("title"),
        body: row.get("body"),
        category: row.get("category"),
        tags: ContentPost::tags_from_column(&tags),
        published: row.get("published"),
        featured: row.get("featured"),
        view_count: row.get("view_count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl ContentRepository for SqlxContentRepository {
    async fn create(&self, author_id: i64, input: &CreateContentInput) -> Result<ContentPost> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO content_posts (author_id, title, body, category, tags, published,
                                       featured, view_count, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(author_id)
        .bind(&input.title)
        .bind(&input.body)
        .bind(&input.category)
        .bind(ContentPost::tags_to_column(&input.tags))
        .bind(input.published)
        .bind(input.featured)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create content post")?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .context("Created content post not found")
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ContentPost>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM content_posts WHERE id = ?",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get content post by ID")?;

        Ok(row.map(|r| row_to_post(&r)))
    }

    async fn list(&self, published_only: bool) -> Result<Vec<ContentPost>> {
        let sql = if published_only {
            format!(
                "SELECT {} FROM content_posts WHERE published = 1 \
                 ORDER BY featured DESC, created_at DESC, id DESC",
                POST_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM content_posts ORDER BY featured DESC, created_at DESC, id DESC",
                POST_COLUMNS
            )
        };

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list content posts")?;

        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn increment_view(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE content_posts SET view_count = view_count + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to increment view count")?;
        Ok(result.rows_affected() > 0)
    }

    async fn update(&self, id: i64, input: &UpdateContentInput) -> Result<Option<ContentPost>> {
        let result = sqlx::query(
            r#"
            UPDATE content_posts
            SET title = COALESCE(?, title),
                body = COALESCE(?, body),
                category = COALESCE(?, category),
                tags = COALESCE(?, tags),
                published = COALESCE(?, published),
                featured = COALESCE(?, featured),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(&input.body)
        .bind(&input.category)
        .bind(input.tags.as_ref().map(|t| ContentPost::tags_to_column(t)))
        .bind(input.published)
        .bind(input.featured)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update content post")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM content_posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete content post")?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_util::{insert_test_user, setup_pool};

    fn make_input(title: &str, published: bool, featured: bool) -> CreateContentInput {
        CreateContentInput {
            title: title.to_string(),
            body: "Body text".to_string(),
            category: "training".to_string(),
            tags: vec!["biogas".to_string()],
            published,
            featured,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = setup_pool().await;
        let admin = insert_test_user(&pool, "admin@example.com", "admin").await;
        let repo = SqlxContentRepository::new(pool);

        let post = repo
            .create(admin, &make_input("Digester basics", true, false))
            .await
            .unwrap();
        assert!(post.id > 0);
        assert_eq!(post.view_count, 0);
        assert_eq!(post.tags, vec!["biogas".to_string()]);

        let found = repo.get_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Digester basics");
    }

    #[tokio::test]
    async fn test_list_published_only_hides_drafts() {
        let pool = setup_pool().await;
        let admin = insert_test_user(&pool, "admin@example.com", "admin").await;
        let repo = SqlxContentRepository::new(pool);

        repo.create(admin, &make_input("Published", true, false))
            .await
            .unwrap();
        repo.create(admin, &make_input("Draft", false, false))
            .await
            .unwrap();

        assert_eq!(repo.list(true).await.unwrap().len(), 1);
        assert_eq!(repo.list(false).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_featured_first() {
        let pool = setup_pool().await;
        let admin = insert_test_user(&pool, "admin@example.com", "admin").await;
        let repo = SqlxContentRepository::new(pool);

        repo.create(admin, &make_input("Ordinary", true, false))
            .await
            .unwrap();
        repo.create(admin, &make_input("Pinned", true, true))
            .await
            .unwrap();

        let posts = repo.list(true).await.unwrap();
        assert_eq!(posts[0].title, "Pinned");
    }

    #[tokio::test]
    async fn test_increment_view() {
        let pool = setup_pool().await;
        let admin = insert_test_user(&pool, "admin@example.com", "admin").await;
        let repo = SqlxContentRepository::new(pool);

        let post = repo
            .create(admin, &make_input("Views", true, false))
            .await
            .unwrap();
        assert!(repo.increment_view(post.id).await.unwrap());
        assert!(repo.increment_view(post.id).await.unwrap());
        assert!(!repo.increment_view(999).await.unwrap());

        let found = repo.get_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(found.view_count, 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = setup_pool().await;
        let admin = insert_test_user(&pool, "admin@example.com", "admin").await;
        let repo = SqlxContentRepository::new(pool);

        let post = repo
            .create(admin, &make_input("Original", false, false))
            .await
            .unwrap();
        let input = UpdateContentInput {
            title: Some("Revised".to_string()),
            published: Some(true),
            ..Default::default()
        };
        let updated = repo.update(post.id, &input).await.unwrap().unwrap();
        assert_eq!(updated.title, "Revised");
        assert!(updated.published);
        assert_eq!(updated.category, "training");

        assert!(repo.delete(post.id).await.unwrap());
        assert!(repo.get_by_id(post.id).await.unwrap().is_none());
    }
}
