//! Dashboard statistics repository
//!
//! Aggregate queries over the other tables. Quantities are normalized to
//! kilograms inside the SQL so mixed kg/tons entries sum correctly.

use crate::models::{AdminStats, ProducerStats, SchoolStats, SupplierStats};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use std::sync::Arc;

const KG_EXPR: &str = "CASE WHEN unit = 'tons' THEN quantity * 1000.0 ELSE quantity END";

/// Stats repository trait
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Aggregates over entries recorded by a supplier
    async fn supplier_stats(&self, user_id: i64) -> Result<SupplierStats>;

    /// Aggregates over a producer's incoming waste and fuel requests
    async fn producer_stats(&self, user_id: i64) -> Result<ProducerStats>;

    /// Aggregates over a school's fuel requests
    async fn school_stats(&self, user_id: i64) -> Result<SchoolStats>;

    /// Platform-wide aggregates for administrators
    async fn admin_stats(&self) -> Result<AdminStats>;
}

/// SQLx-based stats repository implementation
pub struct SqlxStatsRepository {
    pool: SqlitePool,
}

impl SqlxStatsRepository {
    /// Create a new SQLx stats repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn StatsRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl StatsRepository for SqlxStatsRepository {
    async fn supplier_stats(&self, user_id: i64) -> Result<SupplierStats> {
        let row = sqlx::query(&format!(
            r#"
            SELECT COUNT(*) AS total_entries,
                   COALESCE(SUM({kg}), 0.0) AS total_waste_kg,
                   COALESCE(SUM(status = 'pending'), 0) AS pending_entries,
                   COALESCE(SUM(status = 'processed'), 0) AS processed_entries
            FROM waste_entries
            WHERE recorded_by = ?
            "#,
            kg = KG_EXPR
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to load supplier stats")?;

        Ok(SupplierStats {
            total_entries: row.get("total_entries"),
            total_waste_kg: row.get("total_waste_kg"),
            pending_entries: row.get("pending_entries"),
            processed_entries: row.get("processed_entries"),
        })
    }

    async fn producer_stats(&self, user_id: i64) -> Result<ProducerStats> {
        let waste = sqlx::query(&format!(
            r#"
            SELECT COALESCE(SUM({kg}), 0.0) AS total_waste_kg,
                   COALESCE(SUM(status = 'pending'), 0) AS pending_waste_entries
            FROM waste_entries
            WHERE producer_id = ?
            "#,
            kg = KG_EXPR
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to load producer waste stats")?;

        let requests = sqlx::query(
            r#"
            SELECT COALESCE(SUM(producer_id IS NULL AND status = 'pending'), 0) AS open_requests,
                   COALESCE(SUM(producer_id = ? AND status = 'approved'), 0) AS approved_requests,
                   COALESCE(SUM(producer_id = ? AND status = 'delivered'), 0) AS delivered_requests
            FROM fuel_requests
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to load producer request stats")?;

        Ok(ProducerStats {
            total_waste_kg: waste.get("total_waste_kg"),
            pending_waste_entries: waste.get("pending_waste_entries"),
            open_requests: requests.get("open_requests"),
            approved_requests: requests.get("approved_requests"),
            delivered_requests: requests.get("delivered_requests"),
        })
    }

    async fn school_stats(&self, user_id: i64) -> Result<SchoolStats> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total_requests,
                   COALESCE(SUM(status = 'pending'), 0) AS pending_requests,
                   COALESCE(SUM(status = 'approved'), 0) AS approved_requests,
                   COALESCE(SUM(status = 'delivered'), 0) AS delivered_requests
            FROM fuel_requests
            WHERE school_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to load school stats")?;

        Ok(SchoolStats {
            total_requests: row.get("total_requests"),
            pending_requests: row.get("pending_requests"),
            approved_requests: row.get("approved_requests"),
            delivered_requests: row.get("delivered_requests"),
        })
    }

    async fn admin_stats(&self) -> Result<AdminStats> {
        let roles = sqlx::query("SELECT role, COUNT(*) AS n FROM users GROUP BY role")
            .fetch_all(&self.pool)
            .await
            .context("Failed to count users by role")?;
        let mut users_by_role = BTreeMap::new();
        for row in &roles {
            users_by_role.insert(row.get::<String, _>("role"), row.get::<i64, _>("n"));
        }
        let total_users = users_by_role.values().sum();

        let waste = sqlx::query(&format!(
            "SELECT COUNT(*) AS total, COALESCE(SUM({kg}), 0.0) AS kg FROM waste_entries",
            kg = KG_EXPR
        ))
        .fetch_one(&self.pool)
        .await
        .context("Failed to load waste totals")?;

        let requests = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COALESCE(SUM(status = 'pending'), 0) AS pending
            FROM fuel_requests
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to load request totals")?;

        let posts: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM content_posts WHERE published = 1")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count published posts")?;

        Ok(AdminStats {
            total_users,
            users_by_role,
            total_waste_kg: waste.get("kg"),
            total_waste_entries: waste.get("total"),
            total_fuel_requests: requests.get("total"),
            pending_fuel_requests: requests.get("pending"),
            published_posts: posts.0,
        })
    }
}
