//! Waste logging service
//!
//! Business rules for waste entries:
//! - Suppliers log waste for a chosen producer; producers log their own
//!   intake; schools have no access
//! - Entries are editable by their recorder only while pending
//! - Only the destination producer (or an admin) marks an entry processed

use crate::db::repositories::{UserRepository, WasteEntryRepository};
use crate::models::{
    CreateWasteEntryInput, UpdateWasteEntryInput, User, WasteEntry, WasteStatus,
};
use crate::services::validation::parse_gps;
use anyhow::Context;
use std::sync::Arc;

/// Error types for waste service operations
#[derive(Debug, thiserror::Error)]
pub enum WasteServiceError {
    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Operation not permitted for this user
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Entry not found
    #[error("Waste entry not found")]
    NotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Waste logging service
pub struct WasteService {
    entry_repo: Arc<dyn WasteEntryRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl WasteService {
    /// Create a new waste service
    pub fn new(
        entry_repo: Arc<dyn WasteEntryRepository>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            entry_repo,
            user_repo,
        }
    }

    /// Log a new waste entry.
    ///
    /// Producers may only log intake for themselves; suppliers and admins
    /// choose the destination producer.
    pub async fn create(
        &self,
        caller: &User,
        input: CreateWasteEntryInput,
    ) -> Result<WasteEntry, WasteServiceError> {
        if caller.is_school() {
            return Err(WasteServiceError::Forbidden(
                "Schools cannot log waste entries".to_string(),
            ));
        }
        if caller.is_producer() && input.producer_id != caller.id {
            return Err(WasteServiceError::Forbidden(
                "Producers can only log their own intake".to_string(),
            ));
        }
        self.validate_input(input.quantity, input.source_location.as_deref())?;

        let producer = self
            .user_repo
            .get_by_id(input.producer_id)
            .await
            .context("Failed to look up producer")?
            .ok_or_else(|| {
                WasteServiceError::ValidationError("Producer does not exist".to_string())
            })?;
        if !producer.is_producer() {
            return Err(WasteServiceError::ValidationError(
                "Destination user is not a producer".to_string(),
            ));
        }

        let entry = self
            .entry_repo
            .create(caller.id, &input)
            .await
            .context("Failed to create waste entry")?;
        tracing::info!(entry_id = entry.id, recorded_by = caller.id, "Waste entry logged");
        Ok(entry)
    }

    fn validate_input(
        &self,
        quantity: f64,
        source_location: Option<&str>,
    ) -> Result<(), WasteServiceError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(WasteServiceError::ValidationError(
                "Quantity must be positive".to_string(),
            ));
        }
        if let Some(location) = source_location {
            if parse_gps(location).is_none() {
                return Err(WasteServiceError::ValidationError(
                    "Source location must be 'latitude, longitude'".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// List entries visible to the caller
    pub async fn list(&self, caller: &User) -> Result<Vec<WasteEntry>, WasteServiceError> {
        let entries = if caller.is_admin() {
            self.entry_repo.list_all().await
        } else if caller.is_producer() {
            self.entry_repo.list_by_producer(caller.id).await
        } else if caller.is_supplier() {
            self.entry_repo.list_by_recorder(caller.id).await
        } else {
            return Err(WasteServiceError::Forbidden(
                "Schools cannot view waste entries".to_string(),
            ));
        };
        Ok(entries.context("Failed to list waste entries")?)
    }

    /// Get a single entry, enforcing visibility
    pub async fn get(&self, caller: &User, id: i64) -> Result<WasteEntry, WasteServiceError> {
        let entry = self
            .entry_repo
            .get_by_id(id)
            .await
            .context("Failed to get waste entry")?
            .ok_or(WasteServiceError::NotFound)?;

        if !self.can_view(caller, &entry) {
            return Err(WasteServiceError::NotFound);
        }
        Ok(entry)
    }

    fn can_view(&self, caller: &User, entry: &WasteEntry) -> bool {
        caller.is_admin() || entry.recorded_by == caller.id || entry.producer_id == caller.id
    }

    /// Update an entry. The recorder may edit while it is pending; admins
    /// may edit any entry.
    pub async fn update(
        &self,
        caller: &User,
        id: i64,
        input: UpdateWasteEntryInput,
    ) -> Result<WasteEntry, WasteServiceError> {
        let entry = self.get(caller, id).await?;

        if !caller.is_admin() {
            if entry.recorded_by != caller.id {
                return Err(WasteServiceError::Forbidden(
                    "Only the recorder can edit this entry".to_string(),
                ));
            }
            if !entry.is_pending() {
                return Err(WasteServiceError::Forbidden(
                    "Processed entries cannot be edited".to_string(),
                ));
            }
        }

        if let Some(quantity) = input.quantity {
            self.validate_input(quantity, input.source_location.as_deref())?;
        } else {
            self.validate_input(1.0, input.source_location.as_deref())?;
        }

        self.entry_repo
            .update(id, &input)
            .await
            .context("Failed to update waste entry")?
            .ok_or(WasteServiceError::NotFound)
    }

    /// Mark an entry processed. Only the destination producer or an admin
    /// may do this, and only from the pending state.
    pub async fn update_status(
        &self,
        caller: &User,
        id: i64,
        status: WasteStatus,
    ) -> Result<WasteEntry, WasteServiceError> {
        let entry = self.get(caller, id).await?;

        if !caller.is_admin() && entry.producer_id != caller.id {
            return Err(WasteServiceError::Forbidden(
                "Only the destination producer can change entry status".to_string(),
            ));
        }
        if status == entry.status {
            return Ok(entry);
        }
        if entry.status == WasteStatus::Processed {
            return Err(WasteServiceError::ValidationError(
                "Processed entries cannot change status".to_string(),
            ));
        }

        self.entry_repo
            .update_status(id, status)
            .await
            .context("Failed to update waste entry status")?
            .ok_or(WasteServiceError::NotFound)
    }

    /// Delete an entry. Same rules as editing.
    pub async fn delete(&self, caller: &User, id: i64) -> Result<(), WasteServiceError> {
        let entry = self.get(caller, id).await?;

        if !caller.is_admin() {
            if entry.recorded_by != caller.id {
                return Err(WasteServiceError::Forbidden(
                    "Only the recorder can delete this entry".to_string(),
                ));
            }
            if !entry.is_pending() {
                return Err(WasteServiceError::Forbidden(
                    "Processed entries cannot be deleted".to_string(),
                ));
            }
        }

        self.entry_repo
            .delete(id)
            .await
            .context("Failed to delete waste entry")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_util::setup_pool;
    use crate::db::repositories::{SqlxUserRepository, SqlxWasteEntryRepository, UserRepository};
    use crate::models::{QuantityUnit, UserRole, WasteType};

    async fn setup() -> (WasteService, User, User, User, User) {
        let pool = setup_pool().await;
        let user_repo = SqlxUserRepository::boxed(pool.clone());

        let admin = seed_user(&user_repo, "admin@example.com", UserRole::Admin).await;
        let producer = seed_user(&user_repo, "producer@example.com", UserRole::Producer).await;
        let supplier = seed_user(&user_repo, "supplier@example.com", UserRole::Supplier).await;
        let school = seed_user(&user_repo, "school@example.com", UserRole::School).await;

        let service = WasteService::new(SqlxWasteEntryRepository::boxed(pool), user_repo);
        (service, admin, producer, supplier, school)
    }

    async fn seed_user(repo: &Arc<dyn UserRepository>, email: &str, role: UserRole) -> User {
        repo.create(&User::new(
            email.split('@').next().unwrap().to_string(),
            email.to_string(),
            "hash".to_string(),
            role,
        ))
        .await
        .unwrap()
    }

    fn make_input(producer_id: i64) -> CreateWasteEntryInput {
        CreateWasteEntryInput {
            producer_id,
            waste_type: WasteType::MarketWaste,
            quantity: 80.0,
            unit: QuantityUnit::Kg,
            source_location: Some("0.3476, 32.5825".to_string()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_supplier_logs_for_producer() {
        let (service, _, producer, supplier, _) = setup().await;
        let entry = service
            .create(&supplier, make_input(producer.id))
            .await
            .unwrap();
        assert_eq!(entry.recorded_by, supplier.id);
        assert_eq!(entry.producer_id, producer.id);
    }

    #[tokio::test]
    async fn test_school_cannot_log() {
        let (service, _, producer, _, school) = setup().await;
        let result = service.create(&school, make_input(producer.id)).await;
        assert!(matches!(result, Err(WasteServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_producer_logs_only_own_intake() {
        let (service, _, producer, supplier, _) = setup().await;
        // Producer logging for themselves works
        service
            .create(&producer, make_input(producer.id))
            .await
            .unwrap();
        // Producer logging for someone else does not
        let result = service.create(&producer, make_input(supplier.id)).await;
        assert!(matches!(result, Err(WasteServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_destination_must_be_producer() {
        let (service, _, _, supplier, school) = setup().await;
        let result = service.create(&supplier, make_input(school.id)).await;
        assert!(matches!(result, Err(WasteServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_rejects_bad_quantity_and_location() {
        let (service, _, producer, supplier, _) = setup().await;

        let mut input = make_input(producer.id);
        input.quantity = 0.0;
        assert!(matches!(
            service.create(&supplier, input).await,
            Err(WasteServiceError::ValidationError(_))
        ));

        let mut input = make_input(producer.id);
        input.source_location = Some("somewhere in town".to_string());
        assert!(matches!(
            service.create(&supplier, input).await,
            Err(WasteServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_list_scoped_by_role() {
        let (service, admin, producer, supplier, _) = setup().await;
        service
            .create(&supplier, make_input(producer.id))
            .await
            .unwrap();
        service
            .create(&producer, make_input(producer.id))
            .await
            .unwrap();

        assert_eq!(service.list(&admin).await.unwrap().len(), 2);
        assert_eq!(service.list(&producer).await.unwrap().len(), 2);
        assert_eq!(service.list(&supplier).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_only_producer_marks_processed() {
        let (service, _, producer, supplier, _) = setup().await;
        let entry = service
            .create(&supplier, make_input(producer.id))
            .await
            .unwrap();

        // Supplier cannot change status
        let result = service
            .update_status(&supplier, entry.id, WasteStatus::Processed)
            .await;
        assert!(matches!(result, Err(WasteServiceError::Forbidden(_))));

        // Producer can
        let processed = service
            .update_status(&producer, entry.id, WasteStatus::Processed)
            .await
            .unwrap();
        assert_eq!(processed.status, WasteStatus::Processed);

        // And the transition is one-way
        let result = service
            .update_status(&producer, entry.id, WasteStatus::Pending)
            .await;
        assert!(matches!(result, Err(WasteServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_processed_entry_frozen_for_recorder() {
        let (service, admin, producer, supplier, _) = setup().await;
        let entry = service
            .create(&supplier, make_input(producer.id))
            .await
            .unwrap();
        service
            .update_status(&producer, entry.id, WasteStatus::Processed)
            .await
            .unwrap();

        let update = UpdateWasteEntryInput {
            quantity: Some(90.0),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&supplier, entry.id, update.clone()).await,
            Err(WasteServiceError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(&supplier, entry.id).await,
            Err(WasteServiceError::Forbidden(_))
        ));

        // Admin can still edit
        let updated = service.update(&admin, entry.id, update).await.unwrap();
        assert_eq!(updated.quantity, 90.0);
    }

    #[tokio::test]
    async fn test_entry_hidden_from_unrelated_supplier() {
        let (service, _, producer, supplier, _) = setup().await;
        let entry = service
            .create(&producer, make_input(producer.id))
            .await
            .unwrap();

        let result = service.get(&supplier, entry.id).await;
        assert!(matches!(result, Err(WasteServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_recorder_deletes_pending_entry() {
        let (service, _, producer, supplier, _) = setup().await;
        let entry = service
            .create(&supplier, make_input(producer.id))
            .await
            .unwrap();
        service.delete(&supplier, entry.id).await.unwrap();
        assert!(matches!(
            service.get(&supplier, entry.id).await,
            Err(WasteServiceError::NotFound)
        ));
    }
}
