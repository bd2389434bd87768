use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid listen address: {0}")]
    InvalidListenAddress(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid upstream address: {0}")]
    InvalidUpstreamAddress(String),

    #[error("Failed to bind {transport} listener on {addr}: {reason}")]
    ListenerBind {
        transport: &'static str,
        addr: String,
        reason: String,
    },

    #[error("{transport} listener failed: {reason}")]
    ListenerFailed {
        transport: &'static str,
        reason: String,
    },

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Response id {received} does not match query id {expected}")]
    ResponseIdMismatch { expected: u16, received: u16 },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,
}
