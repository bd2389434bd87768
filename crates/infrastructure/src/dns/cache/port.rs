use super::storage::ResponseCache;
use hickory_proto::op::Message;
use relay_dns_application::ports::{CacheMaintenancePort, CacheSweepOutcome, ResponseCachePort};
use relay_dns_domain::CacheKey;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

impl ResponseCachePort for ResponseCache {
    fn get(&self, key: &CacheKey) -> Option<Arc<Message>> {
        ResponseCache::get(self, key)
    }

    fn put(&self, key: CacheKey, response: &Message, ttl: Duration) {
        self.insert(key, response, ttl);
    }
}

impl CacheMaintenancePort for ResponseCache {
    fn run_sweep_cycle(&self) -> CacheSweepOutcome {
        let entries_removed = self.sweep(Instant::now());
        CacheSweepOutcome {
            entries_removed,
            cache_size: self.len(),
        }
    }
}
