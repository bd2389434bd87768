use super::handler::DnsServerHandler;
use relay_dns_domain::DomainError;
use std::io;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

const MAX_UDP_MESSAGE_SIZE: usize = 65_535;

/// Receives datagrams until `shutdown` fires. Each query is handled on its
/// own task so a slow upstream never blocks the receive loop.
pub(crate) async fn serve_udp(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
) -> Result<(), DomainError> {
    let mut recv_buf = vec![0u8; MAX_UDP_MESSAGE_SIZE];

    loop {
        let (len, client) = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("UDP listener shutting down");
                return Ok(());
            }
            received = socket.recv_from(&mut recv_buf) => match received {
                Ok(received) => received,
                Err(e) if is_transient(&e) => {
                    debug!(error = %e, "Transient UDP receive error");
                    continue;
                }
                Err(e) => {
                    return Err(DomainError::ListenerFailed {
                        transport: "udp",
                        reason: e.to_string(),
                    });
                }
            },
        };

        let query = recv_buf[..len].to_vec();
        let handler = Arc::clone(&handler);
        let socket = Arc::clone(&socket);
        tracker.spawn(async move {
            if let Some(response) = handler.handle_raw(&query, client).await {
                if let Err(e) = socket.send_to(&response, client).await {
                    debug!(client = %client, error = %e, "Failed to send UDP response");
                }
            }
        });
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}
