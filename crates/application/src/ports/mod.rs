mod cache_maintenance_port;
mod response_cache_port;
mod upstream_forwarder;

pub use cache_maintenance_port::{CacheMaintenancePort, CacheSweepOutcome};
pub use response_cache_port::ResponseCachePort;
pub use upstream_forwarder::{ForwardOutcome, UpstreamForwarder};
