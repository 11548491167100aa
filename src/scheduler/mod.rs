use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use crate::api::ListingSource;
use crate::core::{HealthChecker, MonitorConfig};
use crate::detector;
use crate::notify::Dispatcher;
use crate::store::SeenStore;

/// What happened in one poll cycle. Returned for logging and so tests can
/// drive cycles directly without real time.
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
    pub feed_ok: bool,
    pub bootstrapped: usize,
    pub new_listings: usize,
    pub skipped_markers: usize,
    pub channel_failures: usize,
    pub persisted: bool,
}

/// Drives fetch → detect → dispatch → persist sequentially, one cycle at a
/// time. The seen store has a single writer: this scheduler.
pub struct Scheduler {
    source: Arc<dyn ListingSource>,
    store: SeenStore,
    dispatcher: Dispatcher,
    health: HealthChecker,
    poll_interval: Duration,
    cycle_timeout: Duration,
    needs_bootstrap: bool,
}

impl Scheduler {
    pub fn new(
        source: Arc<dyn ListingSource>,
        store: SeenStore,
        dispatcher: Dispatcher,
        health: HealthChecker,
        monitor: &MonitorConfig,
    ) -> Self {
        let needs_bootstrap = store.is_empty();
        Self {
            source,
            store,
            dispatcher,
            health,
            poll_interval: Duration::from_secs(monitor.poll_interval_secs),
            cycle_timeout: Duration::from_secs(monitor.cycle_timeout_secs),
            needs_bootstrap,
        }
    }

    pub fn seen(&self) -> &SeenStore {
        &self.store
    }

    /// Run one cycle immediately, then keep cycling with a fixed wait
    /// between the end of one cycle and the start of the next. Shutdown is
    /// only observed between cycles, so the current cycle always finishes.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        loop {
            let cycle_timeout = self.cycle_timeout;
            if tokio::time::timeout(cycle_timeout, self.run_cycle())
                .await
                .is_err()
            {
                error!(
                    "cycle exceeded {}s and was abandoned; next cycle runs after the usual interval",
                    cycle_timeout.as_secs()
                );
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = shutdown.changed() => {
                    info!("shutdown requested, poll loop stopping");
                    break;
                }
            }
        }
    }

    /// One fetch → detect → dispatch → persist pass. Every failure mode has
    /// its own recovery policy; none of them escape the cycle.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        info!("📡 polling listing feed...");
        let mut outcome = CycleOutcome::default();

        // A dead feed aborts only this cycle: nothing is marked seen,
        // nothing is dispatched, and the next interval retries.
        let markers = match self.source.fetch_snapshot().await {
            Ok(markers) => markers,
            Err(e) => {
                error!("listing feed unavailable, skipping this cycle: {}", e);
                self.health.record_cycle(false, true, self.store.len()).await;
                return outcome;
            }
        };
        outcome.feed_ok = true;

        if self.needs_bootstrap {
            outcome.bootstrapped = detector::bootstrap(&markers, &mut self.store);
            outcome.persisted = self.persist_store();
            self.needs_bootstrap = false;
            info!(
                "💾 bootstrap: marked {} pre-existing listings as seen, no alerts sent",
                outcome.bootstrapped
            );
            self.health
                .record_cycle(true, outcome.persisted, self.store.len())
                .await;
            return outcome;
        }

        let detection = detector::detect(&markers, &self.store);
        outcome.skipped_markers = detection.skipped;
        outcome.new_listings = detection.new.len();

        for listing in &detection.new {
            info!("🆕 new listing {}: {}", listing.id, listing.url());
            let failures = self.dispatcher.notify(listing).await;
            outcome.channel_failures += failures.len();
            // Seen as soon as the attempt was made, whatever the delivery
            // outcome; a crash before persist re-alerts at most once.
            self.store.insert(listing.id.clone());
        }

        outcome.persisted = if detection.new.is_empty() {
            true
        } else {
            self.persist_store()
        };

        self.health
            .record_cycle(true, outcome.persisted, self.store.len())
            .await;
        info!(
            "✅ cycle complete: {} new, {} seen in total",
            outcome.new_listings,
            self.store.len()
        );
        outcome
    }

    fn persist_store(&self) -> bool {
        match self.store.persist() {
            Ok(()) => true,
            Err(e) => {
                error!(
                    "⚠️ failed to persist seen store, dedup is weakened until this recovers: {}",
                    e
                );
                false
            }
        }
    }
}
