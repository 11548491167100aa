use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub last_cycle: Option<DateTime<Utc>>,
    pub seen_count: usize,
    pub components: ComponentHealth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub listing_feed: bool,
    pub seen_store: bool,
}

#[derive(Clone)]
pub struct HealthChecker {
    start_time: std::time::Instant,
    inner: Arc<RwLock<HealthInner>>,
}

struct HealthInner {
    components: ComponentHealth,
    last_cycle: Option<DateTime<Utc>>,
    seen_count: usize,
}

impl HealthChecker {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
            inner: Arc::new(RwLock::new(HealthInner {
                components: ComponentHealth {
                    listing_feed: false,
                    seen_store: false,
                },
                last_cycle: None,
                seen_count: 0,
            })),
        }
    }

    pub async fn get_status(&self) -> HealthStatus {
        let inner = self.inner.read().await;

        HealthStatus {
            status: if inner.components.listing_feed {
                "healthy".to_string()
            } else {
                "degraded".to_string()
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            last_cycle: inner.last_cycle,
            seen_count: inner.seen_count,
            components: inner.components.clone(),
        }
    }

    /// Record the outcome of a poll cycle.
    pub async fn record_cycle(&self, feed_ok: bool, store_ok: bool, seen_count: usize) {
        let mut inner = self.inner.write().await;
        inner.components.listing_feed = feed_ok;
        inner.components.seen_store = store_ok;
        inner.last_cycle = Some(Utc::now());
        inner.seen_count = seen_count;
    }
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn status_reflects_most_recent_cycle() {
        let checker = HealthChecker::new();
        assert_eq!(checker.get_status().await.status, "degraded");

        checker.record_cycle(true, true, 7).await;
        let status = checker.get_status().await;
        assert_eq!(status.status, "healthy");
        assert_eq!(status.seen_count, 7);
        assert!(status.last_cycle.is_some());

        checker.record_cycle(false, true, 7).await;
        assert_eq!(checker.get_status().await.status, "degraded");
    }
}
