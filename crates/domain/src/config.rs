pub mod dns;
pub mod errors;
pub mod logging;
pub mod root;
pub mod server;

pub use dns::{DnsConfig, DEFAULT_CACHE_SWEEP_INTERVAL, DEFAULT_UPSTREAMS};
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
