//! EcoFuelConnect - a waste-to-fuel coordination backend
//!
//! REST API connecting biogas producers, organic waste suppliers, and
//! schools ordering fuel deliveries.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
