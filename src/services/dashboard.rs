//! Dashboard service
//!
//! Assembles the role-specific dashboard payload. Results are cached per
//! user with a short TTL sized to the frontend polling interval, so a page
//! full of widgets costs one set of aggregate queries per TTL.

use crate::cache::StatsCache;
use crate::db::repositories::{MessageRepository, StatsRepository};
use crate::models::{DashboardStats, User, UserRole};
use anyhow::Context;
use std::sync::Arc;

/// Error types for dashboard operations
#[derive(Debug, thiserror::Error)]
pub enum DashboardServiceError {
    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Dashboard service
pub struct DashboardService {
    stats_repo: Arc<dyn StatsRepository>,
    message_repo: Arc<dyn MessageRepository>,
    cache: StatsCache,
}

impl DashboardService {
    /// Create a new dashboard service
    pub fn new(
        stats_repo: Arc<dyn StatsRepository>,
        message_repo: Arc<dyn MessageRepository>,
        cache: StatsCache,
    ) -> Self {
        Self {
            stats_repo,
            message_repo,
            cache,
        }
    }

    /// Dashboard statistics for the caller, served from cache when fresh
    pub async fn stats(&self, caller: &User) -> Result<DashboardStats, DashboardServiceError> {
        if let Some(cached) = self.cache.get(caller.id).await {
            return Ok(cached);
        }

        let stats = self.compute(caller).await?;
        self.cache.insert(caller.id, stats.clone()).await;
        Ok(stats)
    }

    async fn compute(&self, caller: &User) -> Result<DashboardStats, DashboardServiceError> {
        let mut stats = DashboardStats::default();

        match caller.role {
            UserRole::Supplier => {
                stats.supplier = Some(
                    self.stats_repo
                        .supplier_stats(caller.id)
                        .await
                        .context("Failed to compute supplier stats")?,
                );
            }
            UserRole::Producer => {
                stats.producer = Some(
                    self.stats_repo
                        .producer_stats(caller.id)
                        .await
                        .context("Failed to compute producer stats")?,
                );
            }
            UserRole::School => {
                stats.school = Some(
                    self.stats_repo
                        .school_stats(caller.id)
                        .await
                        .context("Failed to compute school stats")?,
                );
            }
            UserRole::Admin => {
                stats.admin = Some(
                    self.stats_repo
                        .admin_stats()
                        .await
                        .context("Failed to compute admin stats")?,
                );
            }
        }

        stats.unread_messages = self
            .message_repo
            .unread_count(caller.id)
            .await
            .context("Failed to count unread messages")?;

        Ok(stats)
    }
}
