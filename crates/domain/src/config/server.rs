use serde::{Deserialize, Serialize};

pub const DEFAULT_LISTEN_ADDRESS: &str = ":53";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// `host:port` shared by the UDP and TCP listeners. An empty host binds
    /// every IPv4 interface.
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    DEFAULT_LISTEN_ADDRESS.to_string()
}
