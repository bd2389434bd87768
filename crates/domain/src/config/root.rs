use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::Path;

use super::dns::{DnsConfig, DEFAULT_TTL_SECS, DEFAULT_UPSTREAMS};
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::{ServerConfig, DEFAULT_LISTEN_ADDRESS};
use crate::upstream::{split_host_port, UpstreamAddr};

const LOCAL_CONFIG_PATH: &str = "relay-dns.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/relay-dns/config.toml";

/// Main configuration structure for Relay DNS
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Forwarding, caching and local zone configuration
    #[serde(default)]
    pub dns: DnsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. relay-dns.toml in current directory
    /// 3. /etc/relay-dns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.apply_defaults();
        Ok(config)
    }

    /// Parse a TOML document and fill in defaults for zero or empty values.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.apply_defaults();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::parse(&contents)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(listen) = overrides.listen {
            self.server.listen = listen;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// An empty listen address, a zero TTL and an empty upstream list all
    /// mean "use the default".
    fn apply_defaults(&mut self) {
        if self.server.listen.trim().is_empty() {
            self.server.listen = DEFAULT_LISTEN_ADDRESS.to_string();
        }
        if self.dns.ttl == 0 {
            self.dns.ttl = DEFAULT_TTL_SECS;
        }
        if self.dns.upstream.is_empty() {
            self.dns.upstream = DEFAULT_UPSTREAMS.iter().map(|s| s.to_string()).collect();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let listen_port = split_host_port(&self.server.listen)
            .and_then(|(_, port)| port.parse::<u16>().ok());
        if listen_port.is_none() {
            return Err(ConfigError::Validation(format!(
                "invalid listen address '{}', expected host:port",
                self.server.listen
            )));
        }

        if self.dns.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "query_timeout_ms cannot be 0".to_string(),
            ));
        }

        if self.dns.cache_sweep_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "cache_sweep_interval_secs cannot be 0".to_string(),
            ));
        }

        for upstream in &self.dns.upstream {
            UpstreamAddr::parse(upstream)
                .map_err(|e| ConfigError::Validation(e.to_string()))?;
        }

        for (name, ip) in &self.dns.records {
            if name.trim_end_matches('.').is_empty() {
                return Err(ConfigError::Validation(format!(
                    "empty record name for {}",
                    ip
                )));
            }
            if ip.parse::<IpAddr>().is_err() {
                return Err(ConfigError::Validation(format!(
                    "invalid IP for {}: {}",
                    name, ip
                )));
            }
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub listen: Option<String>,
    pub log_level: Option<String>,
}
