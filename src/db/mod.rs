//! Database layer
//!
//! SQLite-backed storage for single-binary deployment. Schema changes are
//! applied through code-embedded migrations at startup.
//!
//! # Usage
//!
//! ```ignore
//! use ecofuelconnect::config::DatabaseConfig;
//! use ecofuelconnect::db::{create_pool, migrations};
//!
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
