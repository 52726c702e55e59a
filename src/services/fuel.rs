//! Fuel request service
//!
//! Business rules for fuel requests:
//! - Schools place requests; producers pick up pending ones by approving
//!   them, which assigns the producer to the request
//! - Schools edit or withdraw their own requests only while pending, and
//!   can cancel up until delivery
//! - Producers mark their own approved requests delivered
//! - Status changes follow the pending/approved/delivered/cancelled
//!   lifecycle; terminal states are frozen

use crate::db::repositories::FuelRequestRepository;
use crate::models::{
    CreateFuelRequestInput, FuelRequest, FuelRequestStatus, UpdateFuelRequestInput, User,
};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for fuel service operations
#[derive(Debug, thiserror::Error)]
pub enum FuelServiceError {
    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Operation not permitted for this user
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request not found
    #[error("Fuel request not found")]
    NotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Fuel request service
pub struct FuelService {
    request_repo: Arc<dyn FuelRequestRepository>,
}

impl FuelService {
    /// Create a new fuel service
    pub fn new(request_repo: Arc<dyn FuelRequestRepository>) -> Self {
        Self { request_repo }
    }

    /// Place a new fuel request. Schools only.
    pub async fn create(
        &self,
        caller: &User,
        input: CreateFuelRequestInput,
    ) -> Result<FuelRequest, FuelServiceError> {
        if !caller.is_school() {
            return Err(FuelServiceError::Forbidden(
                "Only schools can place fuel requests".to_string(),
            ));
        }
        self.validate_input(
            input.quantity,
            &input.delivery_address,
            Some(input.preferred_date),
        )?;

        let request = self
            .request_repo
            .create(caller.id, &input)
            .await
            .context("Failed to create fuel request")?;
        tracing::info!(request_id = request.id, school_id = caller.id, "Fuel request placed");
        Ok(request)
    }

    fn validate_input(
        &self,
        quantity: f64,
        delivery_address: &str,
        preferred_date: Option<chrono::NaiveDate>,
    ) -> Result<(), FuelServiceError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(FuelServiceError::ValidationError(
                "Quantity must be positive".to_string(),
            ));
        }
        if delivery_address.trim().is_empty() {
            return Err(FuelServiceError::ValidationError(
                "Delivery address cannot be empty".to_string(),
            ));
        }
        if let Some(date) = preferred_date {
            if date < Utc::now().date_naive() {
                return Err(FuelServiceError::ValidationError(
                    "Preferred date cannot be in the past".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// List requests visible to the caller
    pub async fn list(&self, caller: &User) -> Result<Vec<FuelRequest>, FuelServiceError> {
        let requests = if caller.is_admin() {
            self.request_repo.list_all().await
        } else if caller.is_school() {
            self.request_repo.list_by_school(caller.id).await
        } else if caller.is_producer() {
            self.request_repo.list_for_producer(caller.id).await
        } else {
            return Err(FuelServiceError::Forbidden(
                "Suppliers cannot view fuel requests".to_string(),
            ));
        };
        Ok(requests.context("Failed to list fuel requests")?)
    }

    /// Get a single request, enforcing visibility
    pub async fn get(&self, caller: &User, id: i64) -> Result<FuelRequest, FuelServiceError> {
        let request = self
            .request_repo
            .get_by_id(id)
            .await
            .context("Failed to get fuel request")?
            .ok_or(FuelServiceError::NotFound)?;

        if !self.can_view(caller, &request) {
            return Err(FuelServiceError::NotFound);
        }
        Ok(request)
    }

    fn can_view(&self, caller: &User, request: &FuelRequest) -> bool {
        if caller.is_admin() || request.school_id == caller.id {
            return true;
        }
        if caller.is_producer() {
            // Producers see their assignments and the open pool
            return request.producer_id == Some(caller.id)
                || (request.producer_id.is_none() && request.is_pending());
        }
        false
    }

    /// Update a request. The school may edit while it is pending; admins
    /// may edit any request.
    pub async fn update(
        &self,
        caller: &User,
        id: i64,
        input: UpdateFuelRequestInput,
    ) -> Result<FuelRequest, FuelServiceError> {
        let request = self.get(caller, id).await?;

        if !caller.is_admin() {
            if request.school_id != caller.id {
                return Err(FuelServiceError::Forbidden(
                    "Only the requesting school can edit this request".to_string(),
                ));
            }
            if !request.is_pending() {
                return Err(FuelServiceError::Forbidden(
                    "Only pending requests can be edited".to_string(),
                ));
            }
        }

        self.validate_input(
            input.quantity.unwrap_or(request.quantity),
            input
                .delivery_address
                .as_deref()
                .unwrap_or(&request.delivery_address),
            input.preferred_date,
        )?;

        self.request_repo
            .update(id, &input)
            .await
            .context("Failed to update fuel request")?
            .ok_or(FuelServiceError::NotFound)
    }

    /// Change a request's status.
    ///
    /// Producers approve pending requests (assigning themselves) and mark
    /// their approved ones delivered. Schools cancel their own requests.
    /// Admins may perform any valid transition.
    pub async fn update_status(
        &self,
        caller: &User,
        id: i64,
        status: FuelRequestStatus,
    ) -> Result<FuelRequest, FuelServiceError> {
        let request = self.get(caller, id).await?;

        if !request.status.can_transition_to(status) {
            return Err(FuelServiceError::ValidationError(format!(
                "Cannot change status from {} to {}",
                request.status, status
            )));
        }

        let assign_producer = if caller.is_admin() {
            None
        } else {
            match status {
                FuelRequestStatus::Approved => {
                    if !caller.is_producer() {
                        return Err(FuelServiceError::Forbidden(
                            "Only producers can approve fuel requests".to_string(),
                        ));
                    }
                    Some(caller.id)
                }
                FuelRequestStatus::Delivered => {
                    if request.producer_id != Some(caller.id) {
                        return Err(FuelServiceError::Forbidden(
                            "Only the assigned producer can mark delivery".to_string(),
                        ));
                    }
                    None
                }
                FuelRequestStatus::Cancelled => {
                    let is_owner = request.school_id == caller.id;
                    let is_assigned = request.producer_id == Some(caller.id);
                    if !is_owner && !is_assigned {
                        return Err(FuelServiceError::Forbidden(
                            "Only the school or assigned producer can cancel".to_string(),
                        ));
                    }
                    None
                }
                FuelRequestStatus::Pending => {
                    // Unreachable: no transition leads back to pending
                    return Err(FuelServiceError::ValidationError(
                        "Requests cannot return to pending".to_string(),
                    ));
                }
            }
        };

        let updated = self
            .request_repo
            .update_status(id, status, assign_producer)
            .await
            .context("Failed to update fuel request status")?
            .ok_or(FuelServiceError::NotFound)?;
        tracing::info!(request_id = id, status = %status, "Fuel request status changed");
        Ok(updated)
    }

    /// Delete a request. Schools may withdraw pending requests; admins may
    /// delete any request.
    pub async fn delete(&self, caller: &User, id: i64) -> Result<(), FuelServiceError> {
        let request = self.get(caller, id).await?;

        if !caller.is_admin() {
            if request.school_id != caller.id {
                return Err(FuelServiceError::Forbidden(
                    "Only the requesting school can delete this request".to_string(),
                ));
            }
            if !request.is_pending() {
                return Err(FuelServiceError::Forbidden(
                    "Only pending requests can be deleted".to_string(),
                ));
            }
        }

        self.request_repo
            .delete(id)
            .await
            .context("Failed to delete fuel request")?;
        Ok(())
    }
}
