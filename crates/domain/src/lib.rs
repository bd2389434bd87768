//! Relay DNS Domain Layer
pub mod cache_key;
pub mod config;
pub mod dns_name;
pub mod errors;
pub mod record_store;
pub mod upstream;

pub use cache_key::CacheKey;
pub use config::{CliOverrides, Config, ConfigError, DnsConfig, LoggingConfig, ServerConfig};
pub use dns_name::normalize_fqdn;
pub use errors::DomainError;
pub use record_store::LocalRecordStore;
pub use upstream::{
    partition_upstreams, sanitize_upstreams, split_host_port, LoopGuard, RejectedUpstream,
    SanitizedUpstreams, UpstreamAddr,
};
