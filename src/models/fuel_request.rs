//! Fuel request model
//!
//! A fuel request is a school's order for delivered biogas or bio-slurry.
//! Requests move through a small lifecycle: pending until a producer
//! approves (which assigns the producer), approved until delivery, and
//! cancellable from either non-terminal state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::QuantityUnit;

/// Fuel request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelRequest {
    /// Unique identifier
    pub id: i64,
    /// Requesting school
    pub school_id: i64,
    /// Producer fulfilling the request; set on approval
    pub producer_id: Option<i64>,
    /// Requested fuel product
    pub fuel_type: FuelType,
    /// Quantity in `unit`
    pub quantity: f64,
    /// Unit of measure
    pub unit: QuantityUnit,
    /// Where to deliver
    pub delivery_address: String,
    /// Preferred delivery date
    pub preferred_date: NaiveDate,
    /// Request priority
    pub priority: RequestPriority,
    /// Lifecycle status
    pub status: FuelRequestStatus,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl FuelRequest {
    /// Check whether the request can still be edited or deleted by the
    /// requesting school.
    pub fn is_pending(&self) -> bool {
        self.status == FuelRequestStatus::Pending
    }
}

/// Fuel product offered by producers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Biogas,
    BioSlurry,
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelType::Biogas => write!(f, "biogas"),
            FuelType::BioSlurry => write!(f, "bio_slurry"),
        }
    }
}

impl FromStr for FuelType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "biogas" => Ok(FuelType::Biogas),
            "bio_slurry" => Ok(FuelType::BioSlurry),
            _ => Err(anyhow::anyhow!("Invalid fuel type: {}", s)),
        }
    }
}

/// Request priority chosen by the school
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPriority {
    Low,
    Normal,
    High,
}

impl Default for RequestPriority {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for RequestPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestPriority::Low => write!(f, "low"),
            RequestPriority::Normal => write!(f, "normal"),
            RequestPriority::High => write!(f, "high"),
        }
    }
}

impl FromStr for RequestPriority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RequestPriority::Low),
            "normal" => Ok(RequestPriority::Normal),
            "high" => Ok(RequestPriority::High),
            _ => Err(anyhow::anyhow!("Invalid priority: {}", s)),
        }
    }
}

/// Fuel request lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelRequestStatus {
    /// Waiting for a producer to pick it up
    Pending,
    /// A producer has committed to deliver
    Approved,
    /// Delivered; terminal
    Delivered,
    /// Cancelled; terminal
    Cancelled,
}

impl FuelRequestStatus {
    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// pending -> approved | cancelled
    /// approved -> delivered | cancelled
    /// delivered, cancelled -> (terminal)
    pub fn can_transition_to(&self, next: FuelRequestStatus) -> bool {
        use FuelRequestStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Cancelled) | (Approved, Delivered) | (Approved, Cancelled)
        )
    }

    /// Whether this status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, FuelRequestStatus::Delivered | FuelRequestStatus::Cancelled)
    }
}

impl Default for FuelRequestStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for FuelRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelRequestStatus::Pending => write!(f, "pending"),
            FuelRequestStatus::Approved => write!(f, "approved"),
            FuelRequestStatus::Delivered => write!(f, "delivered"),
            FuelRequestStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for FuelRequestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(FuelRequestStatus::Pending),
            "approved" => Ok(FuelRequestStatus::Approved),
            "delivered" => Ok(FuelRequestStatus::Delivered),
            "cancelled" => Ok(FuelRequestStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid fuel request status: {}", s)),
        }
    }
}

/// Input for creating a fuel request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFuelRequestInput {
    pub fuel_type: FuelType,
    pub quantity: f64,
    #[serde(default)]
    pub unit: QuantityUnit,
    pub delivery_address: String,
    pub preferred_date: NaiveDate,
    #[serde(default)]
    pub priority: RequestPriority,
    pub notes: Option<String>,
}

/// Input for updating a fuel request while pending
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFuelRequestInput {
    pub fuel_type: Option<FuelType>,
    pub quantity: Option<f64>,
    pub unit: Option<QuantityUnit>,
    pub delivery_address: Option<String>,
    pub preferred_date: Option<NaiveDate>,
    pub priority: Option<RequestPriority>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use FuelRequestStatus::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Approved.can_transition_to(Delivered));
        assert!(Approved.can_transition_to(Cancelled));
    }

    #[test]
    fn test_forbidden_transitions() {
        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        for s in [Pending, Approved, Delivered, Cancelled] {
            assert!(!s.can_transition_to(s), "self-transition must be rejected");
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(!Pending.is_terminal());
        assert!(!Approved.is_terminal());
        assert!(Delivered.is_terminal());
        assert!(Cancelled.is_terminal());
    }

    #[test]
    fn test_status_roundtrip() {
        for s in [Pending, Approved, Delivered, Cancelled] {
            let parsed: FuelRequestStatus = s.to_string().parse().unwrap();
            assert_eq!(parsed, s);
        }
        assert!(FuelRequestStatus::from_str("shipped").is_err());
    }

    #[test]
    fn test_fuel_type_roundtrip() {
        assert_eq!(FuelType::from_str("biogas").unwrap(), FuelType::Biogas);
        assert_eq!(FuelType::from_str("bio_slurry").unwrap(), FuelType::BioSlurry);
        assert!(FuelType::from_str("diesel").is_err());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn status_strategy() -> impl Strategy<Value = FuelRequestStatus> {
        prop_oneof![
            Just(FuelRequestStatus::Pending),
            Just(FuelRequestStatus::Approved),
            Just(FuelRequestStatus::Delivered),
            Just(FuelRequestStatus::Cancelled),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn terminal_states_admit_no_transition(
            from in status_strategy(),
            to in status_strategy(),
        ) {
            if from.is_terminal() {
                prop_assert!(!from.can_transition_to(to));
            }
        }

        #[test]
        fn transitions_never_loop_back_to_pending(
            from in status_strategy(),
        ) {
            prop_assert!(!from.can_transition_to(FuelRequestStatus::Pending));
        }
    }
}
