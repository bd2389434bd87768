/// Outcome of a cache sweep cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheSweepOutcome {
    pub entries_removed: usize,
    pub cache_size: usize,
}

/// Port for periodic removal of expired cache entries.
pub trait CacheMaintenancePort: Send + Sync {
    /// Evict every entry whose expiry instant has passed.
    fn run_sweep_cycle(&self) -> CacheSweepOutcome;
}
