//! UDP transport for upstream queries (RFC 1035 §4.2.1).
//!
//! The socket is connected to the upstream so datagrams from any other
//! source are discarded by the kernel. A response with TC set is returned
//! as-is; retrying over TCP is up to the caller.

use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use relay_dns_domain::DomainError;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

/// Largest datagram payload. The forwarded query keeps the client's EDNS
/// size, so the reply may exceed any smaller buffer.
const MAX_UDP_RESPONSE_SIZE: usize = 65_535;

pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn map_io_error(&self, e: io::Error) -> DomainError {
        match e.kind() {
            io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => {
                DomainError::TransportConnectionRefused {
                    server: self.server_addr.to_string(),
                }
            }
            _ => DomainError::IoError(format!("UDP exchange with {}: {}", self.server_addr, e)),
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let bind_addr = if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;
        socket
            .connect(self.server_addr)
            .await
            .map_err(|e| self.map_io_error(e))?;

        let timed_out = || DomainError::TransportTimeout {
            server: self.server_addr.to_string(),
        };

        let bytes_sent = tokio::time::timeout(timeout, socket.send(message_bytes))
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| self.map_io_error(e))?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let bytes_received = tokio::time::timeout(timeout, socket.recv(&mut recv_buf))
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| self.map_io_error(e))?;

        recv_buf.truncate(bytes_received);

        debug!(server = %self.server_addr, bytes_received, "UDP response received");

        Ok(TransportResponse { bytes: recv_buf })
    }
}
