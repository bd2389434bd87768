pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use relay_dns_domain::{DomainError, UpstreamAddr};
use std::net::SocketAddr;
use std::time::Duration;

pub use tcp::TcpTransport;
pub use udp::UdpTransport;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;
}

/// Turns an upstream into a dialable socket address, resolving host names
/// through the system resolver.
pub async fn resolve_upstream(upstream: &UpstreamAddr) -> Result<SocketAddr, DomainError> {
    if let Some(ip) = upstream.ip() {
        return Ok(SocketAddr::new(ip, upstream.port()));
    }

    tokio::net::lookup_host((upstream.host(), upstream.port()))
        .await
        .map_err(|e| DomainError::IoError(format!("Failed to resolve {}: {}", upstream, e)))?
        .next()
        .ok_or_else(|| DomainError::IoError(format!("No address found for {}", upstream)))
}
