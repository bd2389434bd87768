use relay_dns_application::ports::CacheMaintenancePort;
use relay_dns_domain::config::DEFAULT_CACHE_SWEEP_INTERVAL;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Background job that periodically evicts expired cache entries.
pub struct CacheSweepJob {
    maintenance: Arc<dyn CacheMaintenancePort>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl CacheSweepJob {
    pub fn new(maintenance: Arc<dyn CacheMaintenancePort>) -> Self {
        Self {
            maintenance,
            interval: DEFAULT_CACHE_SWEEP_INTERVAL,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Sweeps once per interval, the first sweep one full interval after
    /// start, until cancelled.
    pub async fn run(self) {
        info!(interval_secs = self.interval.as_secs(), "Starting cache sweep job");

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("CacheSweepJob: shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let outcome = self.maintenance.run_sweep_cycle();
                    if outcome.entries_removed > 0 {
                        info!(
                            entries_removed = outcome.entries_removed,
                            cache_size = outcome.cache_size,
                            "Cache sweep cycle completed"
                        );
                    } else {
                        debug!(cache_size = outcome.cache_size, "Cache sweep found nothing to evict");
                    }
                }
            }
        }
    }
}
