//! Waste entry repository

use crate::models::{
    CreateWasteEntryInput, QuantityUnit, UpdateWasteEntryInput, WasteEntry, WasteStatus, WasteType,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Waste entry repository trait
#[async_trait]
pub trait WasteEntryRepository: Send + Sync {
    /// Create a new waste entry
    async fn create(&self, recorded_by: i64, input: &CreateWasteEntryInput) -> Result<WasteEntry>;

    /// Get entry by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<WasteEntry>>;

    /// List all entries, newest first
    async fn list_all(&self) -> Result<Vec<WasteEntry>>;

    /// List entries recorded by a user, newest first
    async fn list_by_recorder(&self, recorded_by: i64) -> Result<Vec<WasteEntry>>;

    /// List entries destined for a producer, newest first
    async fn list_by_producer(&self, producer_id: i64) -> Result<Vec<WasteEntry>>;

    /// Update entry fields
    async fn update(&self, id: i64, input: &UpdateWasteEntryInput) -> Result<Option<WasteEntry>>;

    /// Update entry status
    async fn update_status(&self, id: i64, status: WasteStatus) -> Result<Option<WasteEntry>>;

    /// Delete an entry
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based waste entry repository implementation
pub struct SqlxWasteEntryRepository {
    pool: SqlitePool,
}

impl SqlxWasteEntryRepository {
    /// Create a new SQLx waste entry repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn WasteEntryRepository> {
        Arc::new(Self::new(pool))
    }
}

const ENTRY_COLUMNS: &str = "id, producer_id, recorded_by, waste_type, quantity, unit, \
     source_location, status, notes, created_at, updated_at";

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<WasteEntry> {
    let waste_type: String = row.get("waste_type");
    let unit: String = row.get("unit");
    let status: String = row.get("status");
    Ok(WasteEntry {
        id: row.get("id"),
        producer_id: row.get("producer_id"),
        recorded_by: row.get("recorded_by"),
        waste_type: WasteType::from_str(&waste_type)?,
        quantity: row.get("quantity"),
        unit: QuantityUnit::from_str(&unit)?,
        source_location: row.get("source_location"),
        status: WasteStatus::from_str(&status)?,
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl WasteEntryRepository for SqlxWasteEntryRepository {
    async fn create(&self, recorded_by: i64, input: &CreateWasteEntryInput) -> Result<WasteEntry> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO waste_entries (producer_id, recorded_by, waste_type, quantity, unit,
                                       source_location, status, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(input.producer_id)
        .bind(recorded_by)
        .bind(input.waste_type.to_string())
        .bind(input.quantity)
        .bind(input.unit.to_string())
        .bind(&input.source_location)
        .bind(WasteStatus::Pending.to_string())
        .bind(&input.notes)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create waste entry")?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .context("Created waste entry not found")
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<WasteEntry>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM waste_entries WHERE id = ?",
            ENTRY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get waste entry by ID")?;

        row.map(|r| row_to_entry(&r)).transpose()
    }

    async fn list_all(&self) -> Result<Vec<WasteEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM waste_entries ORDER BY created_at DESC, id DESC",
            ENTRY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list waste entries")?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn list_by_recorder(&self, recorded_by: i64) -> Result<Vec<WasteEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM waste_entries WHERE recorded_by = ? ORDER BY created_at DESC, id DESC",
            ENTRY_COLUMNS
        ))
        .bind(recorded_by)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list waste entries by recorder")?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn list_by_producer(&self, producer_id: i64) -> Result<Vec<WasteEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM waste_entries WHERE producer_id = ? ORDER BY created_at DESC, id DESC",
            ENTRY_COLUMNS
        ))
        .bind(producer_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list waste entries by producer")?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn update(&self, id: i64, input: &UpdateWasteEntryInput) -> Result<Option<WasteEntry>> {
        let result = sqlx::query(
            r#"
            UPDATE waste_entries
            SET waste_type = COALESCE(?, waste_type),
                quantity = COALESCE(?, quantity),
                unit = COALESCE(?, unit),
                source_location = COALESCE(?, source_location),
                notes = COALESCE(?, notes),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(input.waste_type.map(|t| t.to_string()))
        .bind(input.quantity)
        .bind(input.unit.map(|u| u.to_string()))
        .bind(&input.source_location)
        .bind(&input.notes)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update waste entry")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn update_status(&self, id: i64, status: WasteStatus) -> Result<Option<WasteEntry>> {
        let result = sqlx::query("UPDATE waste_entries SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update waste entry status")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM waste_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete waste entry")?;
        Ok(result.rows_affected() > 0)
    }
}
