//! Dashboard statistics
//!
//! Aggregate figures shown on the role-specific dashboard. Only the section
//! matching the caller's role is populated; admins get the platform totals.

use serde::Serialize;
use std::collections::BTreeMap;

/// Role-specific dashboard statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<ProducerStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<SchoolStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminStats>,
    /// Unread messages for the calling user
    pub unread_messages: i64,
}

/// Figures for a waste supplier: their own logged entries
#[derive(Debug, Clone, Default, Serialize)]
pub struct SupplierStats {
    pub total_entries: i64,
    pub total_waste_kg: f64,
    pub pending_entries: i64,
    pub processed_entries: i64,
}

/// Figures for a biogas producer: incoming waste and outgoing fuel
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProducerStats {
    pub total_waste_kg: f64,
    pub pending_waste_entries: i64,
    pub open_requests: i64,
    pub approved_requests: i64,
    pub delivered_requests: i64,
}

/// Figures for a school: their fuel requests by status
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchoolStats {
    pub total_requests: i64,
    pub pending_requests: i64,
    pub approved_requests: i64,
    pub delivered_requests: i64,
}

/// Platform-wide figures for administrators
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminStats {
    pub total_users: i64,
    /// Account counts keyed by role name
    pub users_by_role: BTreeMap<String, i64>,
    pub total_waste_kg: f64,
    pub total_waste_entries: i64,
    pub total_fuel_requests: i64,
    pub pending_fuel_requests: i64,
    pub published_posts: i64,
}
