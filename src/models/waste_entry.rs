//! Waste entry model
//!
//! A waste entry is a logged record of organic waste collected from a
//! supplier and destined for a biogas producer. Entries start out pending
//! and are marked processed once the producer has digested the load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Waste entry entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteEntry {
    /// Unique identifier
    pub id: i64,
    /// Producer the waste is destined for
    pub producer_id: i64,
    /// User who logged the entry (supplier or the producer themselves)
    pub recorded_by: i64,
    /// Kind of organic waste
    pub waste_type: WasteType,
    /// Quantity in `unit`
    pub quantity: f64,
    /// Unit of measure
    pub unit: QuantityUnit,
    /// GPS capture of the pickup point, formatted "lat, lng"
    pub source_location: Option<String>,
    /// Processing status
    pub status: WasteStatus,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl WasteEntry {
    /// Quantity normalized to kilograms
    pub fn quantity_kg(&self) -> f64 {
        self.unit.to_kg(self.quantity)
    }

    /// Check whether the entry can still be edited or deleted by its
    /// recorder. Processed entries are frozen for non-admins.
    pub fn is_pending(&self) -> bool {
        self.status == WasteStatus::Pending
    }
}

/// Kind of organic waste accepted by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteType {
    FoodScraps,
    Agricultural,
    MarketWaste,
    GardenWaste,
    Other,
}

impl fmt::Display for WasteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WasteType::FoodScraps => write!(f, "food_scraps"),
            WasteType::Agricultural => write!(f, "agricultural"),
            WasteType::MarketWaste => write!(f, "market_waste"),
            WasteType::GardenWaste => write!(f, "garden_waste"),
            WasteType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for WasteType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food_scraps" => Ok(WasteType::FoodScraps),
            "agricultural" => Ok(WasteType::Agricultural),
            "market_waste" => Ok(WasteType::MarketWaste),
            "garden_waste" => Ok(WasteType::GardenWaste),
            "other" => Ok(WasteType::Other),
            _ => Err(anyhow::anyhow!("Invalid waste type: {}", s)),
        }
    }
}

/// Unit of measure for waste and fuel quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityUnit {
    Kg,
    Tons,
}

impl QuantityUnit {
    /// Convert a quantity in this unit to kilograms
    pub fn to_kg(&self, quantity: f64) -> f64 {
        match self {
            QuantityUnit::Kg => quantity,
            QuantityUnit::Tons => quantity * 1000.0,
        }
    }
}

impl Default for QuantityUnit {
    fn default() -> Self {
        Self::Kg
    }
}

impl fmt::Display for QuantityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityUnit::Kg => write!(f, "kg"),
            QuantityUnit::Tons => write!(f, "tons"),
        }
    }
}

impl FromStr for QuantityUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" => Ok(QuantityUnit::Kg),
            "tons" => Ok(QuantityUnit::Tons),
            _ => Err(anyhow::anyhow!("Invalid quantity unit: {}", s)),
        }
    }
}

/// Waste entry processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WasteStatus {
    /// Logged, waiting to be digested
    Pending,
    /// Digested by the producer; terminal
    Processed,
}

impl Default for WasteStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for WasteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WasteStatus::Pending => write!(f, "pending"),
            WasteStatus::Processed => write!(f, "processed"),
        }
    }
}

impl FromStr for WasteStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(WasteStatus::Pending),
            "processed" => Ok(WasteStatus::Processed),
            _ => Err(anyhow::anyhow!("Invalid waste status: {}", s)),
        }
    }
}

/// Input for creating a waste entry
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWasteEntryInput {
    pub producer_id: i64,
    pub waste_type: WasteType,
    pub quantity: f64,
    #[serde(default)]
    pub unit: QuantityUnit,
    pub source_location: Option<String>,
    pub notes: Option<String>,
}

/// Input for updating a waste entry (all fields optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWasteEntryInput {
    pub waste_type: Option<WasteType>,
    pub quantity: Option<f64>,
    pub unit: Option<QuantityUnit>,
    pub source_location: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_to_kg() {
        assert_eq!(QuantityUnit::Kg.to_kg(250.0), 250.0);
        assert_eq!(QuantityUnit::Tons.to_kg(1.5), 1500.0);
    }

    #[test]
    fn test_waste_type_roundtrip() {
        for t in [
            WasteType::FoodScraps,
            WasteType::Agricultural,
            WasteType::MarketWaste,
            WasteType::GardenWaste,
            WasteType::Other,
        ] {
            let parsed: WasteType = t.to_string().parse().unwrap();
            assert_eq!(parsed, t);
        }
        assert!(WasteType::from_str("plastic").is_err());
    }

    #[test]
    fn test_status_roundtrip() {
        assert_eq!(
            WasteStatus::from_str("pending").unwrap(),
            WasteStatus::Pending
        );
        assert_eq!(
            WasteStatus::from_str("Processed").unwrap(),
            WasteStatus::Processed
        );
        assert!(WasteStatus::from_str("done").is_err());
    }

    #[test]
    fn test_entry_quantity_kg() {
        let now = chrono::Utc::now();
        let entry = WasteEntry {
            id: 1,
            producer_id: 2,
            recorded_by: 3,
            waste_type: WasteType::FoodScraps,
            quantity: 2.0,
            unit: QuantityUnit::Tons,
            source_location: None,
            status: WasteStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(entry.quantity_kg(), 2000.0);
        assert!(entry.is_pending());
    }
}
