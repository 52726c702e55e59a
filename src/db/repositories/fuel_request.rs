//! Fuel request repository

use crate::models::{
    CreateFuelRequestInput, FuelRequest, FuelRequestStatus, FuelType, QuantityUnit,
    RequestPriority, UpdateFuelRequestInput,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

/// Fuel request repository trait
#[async_trait]
pub trait FuelRequestRepository: Send + Sync {
    /// Create a new fuel request for a school
    async fn create(&self, school_id: i64, input: &CreateFuelRequestInput) -> Result<FuelRequest>;

    /// Get request by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<FuelRequest>>;

    /// List all requests, newest first
    async fn list_all(&self) -> Result<Vec<FuelRequest>>;

    /// List requests placed by a school, newest first
    async fn list_by_school(&self, school_id: i64) -> Result<Vec<FuelRequest>>;

    /// List requests visible to a producer: unassigned pending plus their own
    async fn list_for_producer(&self, producer_id: i64) -> Result<Vec<FuelRequest>>;

    /// Update request fields
    async fn update(&self, id: i64, input: &UpdateFuelRequestInput) -> Result<Option<FuelRequest>>;

    /// Update status, optionally assigning a producer
    async fn update_status(
        &self,
        id: i64,
        status: FuelRequestStatus,
        producer_id: Option<i64>,
    ) -> Result<Option<FuelRequest>>;

    /// Delete a request
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based fuel request repository implementation
pub struct SqlxFuelRequestRepository {
    pool: SqlitePool,
}

impl SqlxFuelRequestRepository {
    /// Create a new SQLx fuel request repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn FuelRequestRepository> {
        Arc::new(Self::new(pool))
    }
}

const REQUEST_COLUMNS: &str = "id, school_id, producer_id, fuel_type, quantity, unit, \
     delivery_address, preferred_date, priority, status, notes, created_at, updated_at";

fn row_to_request(row: &sqlx::sqlite::SqliteRow) -> Result<FuelRequest> {
    let fuel_type: String = row.get("fuel_type");
    let unit: String = row.get("unit");
    let priority: String = row.get("priority");
    let status: String = row.get("status");
    Ok(FuelRequest {
        id: row.get("id"),
        school_id: row.get("school_id"),
        producer_id: row.get("producer_id"),
        fuel_type: FuelType::from_str(&fuel_type)?,
        quantity: row.get("quantity"),
        unit: QuantityUnit::from_str(&unit)?,
        delivery_address: row.get("delivery_address"),
        preferred_date: row.get("preferred_date"),
        priority: RequestPriority::from_str(&priority)?,
        status: FuelRequestStatus::from_str(&status)?,
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl FuelRequestRepository for SqlxFuelRequestRepository {
    async fn create(&self, school_id: i64, input: &CreateFuelRequestInput) -> Result<FuelRequest> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO fuel_requests (school_id, fuel_type, quantity, unit, delivery_address,
                                       preferred_date, priority, status, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(school_id)
        .bind(input.fuel_type.to_string())
        .bind(input.quantity)
        .bind(input.unit.to_string())
        .bind(&input.delivery_address)
        .bind(input.preferred_date)
        .bind(input.priority.to_string())
        .bind(FuelRequestStatus::Pending.to_string())
        .bind(&input.notes)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create fuel request")?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .context("Created fuel request not found")
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<FuelRequest>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM fuel_requests WHERE id = ?",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get fuel request by ID")?;

        row.map(|r| row_to_request(&r)).transpose()
    }

    async fn list_all(&self) -> Result<Vec<FuelRequest>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM fuel_requests ORDER BY created_at DESC, id DESC",
            REQUEST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list fuel requests")?;

        rows.iter().map(row_to_request).collect()
    }

    async fn list_by_school(&self, school_id: i64) -> Result<Vec<FuelRequest>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM fuel_requests WHERE school_id = ? ORDER BY created_at DESC, id DESC",
            REQUEST_COLUMNS
        ))
        .bind(school_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list fuel requests by school")?;

        rows.iter().map(row_to_request).collect()
    }

    async fn list_for_producer(&self, producer_id: i64) -> Result<Vec<FuelRequest>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM fuel_requests
            WHERE producer_id = ? OR (producer_id IS NULL AND status = 'pending')
            ORDER BY created_at DESC, id DESC
            "#,
            REQUEST_COLUMNS
        ))
        .bind(producer_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list fuel requests for producer")?;

        rows.iter().map(row_to_request).collect()
    }

    async fn update(&self, id: i64, input: &UpdateFuelRequestInput) -> Result<Option<FuelRequest>> {
        let result = sqlx::query(
            r#"
            UPDATE fuel_requests
            SET fuel_type = COALESCE(?, fuel_type),
                quantity = COALESCE(?, quantity),
                unit = COALESCE(?, unit),
                delivery_address = COALESCE(?, delivery_address),
                preferred_date = COALESCE(?, preferred_date),
                priority = COALESCE(?, priority),
                notes = COALESCE(?, notes),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(input.fuel_type.map(|t| t.to_string()))
        .bind(input.quantity)
        .bind(input.unit.map(|u| u.to_string()))
        .bind(&input.delivery_address)
        .bind(input.preferred_date)
        .bind(input.priority.map(|p| p.to_string()))
        .bind(&input.notes)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update fuel request")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn update_status(
        &self,
        id: i64,
        status: FuelRequestStatus,
        producer_id: Option<i64>,
    ) -> Result<Option<FuelRequest>> {
        let result = sqlx::query(
            r#"
            UPDATE fuel_requests
            SET status = ?,
                producer_id = COALESCE(?, producer_id),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status.to_string())
        .bind(producer_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update fuel request status")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM fuel_requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete fuel request")?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_util::{insert_test_user, setup_pool};
    use chrono::NaiveDate;

    fn make_input() -> CreateFuelRequestInput {
        CreateFuelRequestInput {
            fuel_type: FuelType::Biogas,
            quantity: 50.0,
            unit: QuantityUnit::Kg,
            delivery_address: "Plot 14, Kampala Road".to_string(),
            preferred_date: NaiveDate::from_ymd_opt(2030, 6, 15).unwrap(),
            priority: RequestPriority::Normal,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_starts_pending_unassigned() {
        let pool = setup_pool().await;
        let school = insert_test_user(&pool, "school@example.com", "school").await;
        let repo = SqlxFuelRequestRepository::new(pool);

        let request = repo.create(school, &make_input()).await.unwrap();
        assert!(request.id > 0);
        assert_eq!(request.status, FuelRequestStatus::Pending);
        assert!(request.producer_id.is_none());
        assert_eq!(request.school_id, school);
    }

    #[tokio::test]
    async fn test_approve_assigns_producer() {
        let pool = setup_pool().await;
        let school = insert_test_user(&pool, "school@example.com", "school").await;
        let producer = insert_test_user(&pool, "producer@example.com", "producer").await;
        let repo = SqlxFuelRequestRepository::new(pool);

        let request = repo.create(school, &make_input()).await.unwrap();
        let updated = repo
            .update_status(request.id, FuelRequestStatus::Approved, Some(producer))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, FuelRequestStatus::Approved);
        assert_eq!(updated.producer_id, Some(producer));
    }

    #[tokio::test]
    async fn test_status_update_keeps_existing_producer() {
        let pool = setup_pool().await;
        let school = insert_test_user(&pool, "school@example.com", "school").await;
        let producer = insert_test_user(&pool, "producer@example.com", "producer").await;
        let repo = SqlxFuelRequestRepository::new(pool);

        let request = repo.create(school, &make_input()).await.unwrap();
        repo.update_status(request.id, FuelRequestStatus::Approved, Some(producer))
            .await
            .unwrap();
        let delivered = repo
            .update_status(request.id, FuelRequestStatus::Delivered, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(delivered.producer_id, Some(producer));
    }

    #[tokio::test]
    async fn test_list_for_producer_includes_unassigned_pending() {
        let pool = setup_pool().await;
        let school = insert_test_user(&pool, "school@example.com", "school").await;
        let p1 = insert_test_user(&pool, "p1@example.com", "producer").await;
        let p2 = insert_test_user(&pool, "p2@example.com", "producer").await;
        let repo = SqlxFuelRequestRepository::new(pool);

        let open = repo.create(school, &make_input()).await.unwrap();
        let mine = repo.create(school, &make_input()).await.unwrap();
        let theirs = repo.create(school, &make_input()).await.unwrap();
        repo.update_status(mine.id, FuelRequestStatus::Approved, Some(p1))
            .await
            .unwrap();
        repo.update_status(theirs.id, FuelRequestStatus::Approved, Some(p2))
            .await
            .unwrap();

        let visible = repo.list_for_producer(p1).await.unwrap();
        let ids: Vec<i64> = visible.iter().map(|r| r.id).collect();
        assert!(ids.contains(&open.id));
        assert!(ids.contains(&mine.id));
        assert!(!ids.contains(&theirs.id));
    }

    #[tokio::test]
    async fn test_list_by_school() {
        let pool = setup_pool().await;
        let s1 = insert_test_user(&pool, "s1@example.com", "school").await;
        let s2 = insert_test_user(&pool, "s2@example.com", "school").await;
        let repo = SqlxFuelRequestRepository::new(pool);

        repo.create(s1, &make_input()).await.unwrap();
        repo.create(s1, &make_input()).await.unwrap();
        repo.create(s2, &make_input()).await.unwrap();

        assert_eq!(repo.list_by_school(s1).await.unwrap().len(), 2);
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_fields() {
        let pool = setup_pool().await;
        let school = insert_test_user(&pool, "school@example.com", "school").await;
        let repo = SqlxFuelRequestRepository::new(pool);

        let request = repo.create(school, &make_input()).await.unwrap();
        let input = UpdateFuelRequestInput {
            quantity: Some(75.0),
            priority: Some(RequestPriority::High),
            ..Default::default()
        };
        let updated = repo.update(request.id, &input).await.unwrap().unwrap();
        assert_eq!(updated.quantity, 75.0);
        assert_eq!(updated.priority, RequestPriority::High);
        assert_eq!(updated.delivery_address, "Plot 14, Kampala Road");
    }

    #[tokio::test]
    async fn test_delete_request() {
        let pool = setup_pool().await;
        let school = insert_test_user(&pool, "school@example.com", "school").await;
        let repo = SqlxFuelRequestRepository::new(pool);

        let request = repo.create(school, &make_input()).await.unwrap();
        assert!(repo.delete(request.id).await.unwrap());
        assert!(repo.get_by_id(request.id).await.unwrap().is_none());
    }
}
