//! Data access repositories
//!
//! Each entity gets a trait defining its storage interface plus a
//! SQLx-backed implementation. Services depend on the traits so tests can
//! swap in in-memory databases.

pub mod content;
pub mod fuel_request;
pub mod message;
pub mod session;
pub mod stats;
pub mod user;
pub mod waste_entry;

pub use content::{ContentRepository, SqlxContentRepository};
pub use fuel_request::{FuelRequestRepository, SqlxFuelRequestRepository};
pub use message::{MessageRepository, SqlxMessageRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use stats::{SqlxStatsRepository, StatsRepository};
pub use user::{SqlxUserRepository, UserRepository};
pub use waste_entry::{SqlxWasteEntryRepository, WasteEntryRepository};

#[cfg(test)]
pub(crate) mod test_util {
    use crate::db::{create_test_pool, migrations};
    use chrono::Utc;
    use sqlx::SqlitePool;

    /// In-memory pool with the full schema applied
    pub async fn setup_pool() -> SqlitePool {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    /// Insert a user row directly, returning its ID
    pub async fn insert_test_user(pool: &SqlitePool, email: &str, role: &str) -> i64 {
        let now = Utc::now();
        let name = email.split('@').next().unwrap_or("user");
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'active', ?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind("hash")
        .bind(role)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .expect("Failed to insert test user");
        result.last_insert_rowid()
    }
}
