//! User repository
//!
//! Database operations for platform accounts.

use crate::models::{UpdateProfileInput, User, UserRole, UserStatus};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user, returning it with the assigned ID
    async fn create(&self, user: &User) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get user by email (case-insensitive)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// List all users, newest first
    async fn list(&self) -> Result<Vec<User>>;

    /// List users with a given role
    async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>>;

    /// Count all users
    async fn count(&self) -> Result<i64>;

    /// Update profile fields
    async fn update_profile(&self, id: i64, input: &UpdateProfileInput) -> Result<Option<User>>;

    /// Update the stored password hash
    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<()>;

    /// Update role and status (admin operation)
    async fn update_role_status(
        &self,
        id: i64,
        role: UserRole,
        status: UserStatus,
    ) -> Result<Option<User>>;

    /// Delete a user
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, status, organization, \
     phone, profile_photo, cover_photo, created_at, updated_at";

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    let role: String = row.get("role");
    let status: String = row.get("status");
    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: UserRole::from_str(&role)?,
        status: UserStatus::from_str(&status)?,
        organization: row.get("organization"),
        phone: row.get("phone"),
        profile_photo: row.get("profile_photo"),
        cover_photo: row.get("cover_photo"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role, status, organization,
                               phone, profile_photo, cover_photo, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.to_string())
        .bind(user.status.to_string())
        .bind(&user.organization)
        .bind(&user.phone)
        .bind(&user.profile_photo)
        .bind(&user.cover_photo)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        let mut created = user.clone();
        created.id = result.last_insert_rowid();
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get user by ID")?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = ? COLLATE NOCASE",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by email")?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users")?;

        rows.iter().map(row_to_user).collect()
    }

    async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users WHERE role = ? ORDER BY name",
            USER_COLUMNS
        ))
        .bind(role.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list users by role")?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count users")?;
        Ok(row.0)
    }

    async fn update_profile(&self, id: i64, input: &UpdateProfileInput) -> Result<Option<User>> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?, name),
                organization = COALESCE(?, organization),
                phone = COALESCE(?, phone),
                profile_photo = COALESCE(?, profile_photo),
                cover_photo = COALESCE(?, cover_photo),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(&input.organization)
        .bind(&input.phone)
        .bind(&input.profile_photo)
        .bind(&input.cover_photo)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update profile")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update password hash")?;
        Ok(())
    }

    async fn update_role_status(
        &self,
        id: i64,
        role: UserRole,
        status: UserStatus,
    ) -> Result<Option<User>> {
        let result = sqlx::query("UPDATE users SET role = ?, status = ?, updated_at = ? WHERE id = ?")
            .bind(role.to_string())
            .bind(status.to_string())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update role and status")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete user")?;
        Ok(result.rows_affected() > 0)
    }
}
