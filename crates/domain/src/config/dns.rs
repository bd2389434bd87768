use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Resolvers used when the configuration names none.
pub const DEFAULT_UPSTREAMS: [&str; 2] = ["8.8.8.8:53", "1.1.1.1:53"];

pub const DEFAULT_TTL_SECS: u32 = 60;

pub const DEFAULT_CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// TTL of locally synthesized answers and lifetime of cached upstream replies.
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Upstream resolvers, tried strictly in this order.
    #[serde(default)]
    pub upstream: Vec<String>,

    /// Timeout of a single upstream exchange.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    #[serde(default = "default_cache_sweep_interval_secs")]
    pub cache_sweep_interval_secs: u64,

    /// Local zone: domain name (with or without the trailing dot) to IP literal.
    #[serde(default)]
    pub records: BTreeMap<String, String>,
}

impl DnsConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_interval_secs)
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            ttl: default_ttl(),
            upstream: DEFAULT_UPSTREAMS.iter().map(|s| s.to_string()).collect(),
            query_timeout_ms: default_query_timeout_ms(),
            cache_sweep_interval_secs: default_cache_sweep_interval_secs(),
            records: BTreeMap::new(),
        }
    }
}

fn default_ttl() -> u32 {
    DEFAULT_TTL_SECS
}

fn default_query_timeout_ms() -> u64 {
    3000
}

fn default_cache_sweep_interval_secs() -> u64 {
    DEFAULT_CACHE_SWEEP_INTERVAL.as_secs()
}
