//! Cache layer
//!
//! In-memory caching (moka) for dashboard statistics. Stats are recomputed
//! at most once per TTL per user; writes that change the underlying numbers
//! invalidate eagerly so the dashboard never lags more than one poll.

use crate::models::DashboardStats;
use moka::future::Cache;
use std::time::Duration;

/// Default maximum number of cached dashboards
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Per-user dashboard statistics cache with TTL expiration
#[derive(Clone)]
pub struct StatsCache {
    cache: Cache<i64, DashboardStats>,
}

impl StatsCache {
    /// Create a cache whose entries expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(DEFAULT_MAX_CAPACITY)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Get the cached stats for a user, if fresh
    pub async fn get(&self, user_id: i64) -> Option<DashboardStats> {
        self.cache.get(&user_id).await
    }

    /// Store freshly computed stats for a user
    pub async fn insert(&self, user_id: i64, stats: DashboardStats) {
        self.cache.insert(user_id, stats).await;
    }

    /// Drop one user's cached stats
    pub async fn invalidate(&self, user_id: i64) {
        self.cache.invalidate(&user_id).await;
    }

    /// Drop everything, e.g. after writes that affect platform totals
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SchoolStats;

    fn sample_stats() -> DashboardStats {
        DashboardStats {
            school: Some(SchoolStats {
                total_requests: 1,
                ..Default::default()
            }),
            unread_messages: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = StatsCache::new(Duration::from_secs(60));
        assert!(cache.get(1).await.is_none());

        cache.insert(1, sample_stats()).await;
        let cached = cache.get(1).await.unwrap();
        assert_eq!(cached.unread_messages, 2);
        assert!(cache.get(2).await.is_none());
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = StatsCache::new(Duration::from_millis(10));
        cache.insert(1, sample_stats()).await;
        assert!(cache.get(1).await.is_some());

        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.cache.run_pending_tasks().await;
        assert!(cache.get(1).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = StatsCache::new(Duration::from_secs(60));
        cache.insert(1, sample_stats()).await;
        cache.invalidate(1).await;
        assert!(cache.get(1).await.is_none());
    }
}
