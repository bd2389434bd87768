use super::handler::DnsServerHandler;
use crate::dns::transport::tcp::{read_with_length_prefix, send_with_length_prefix};
use relay_dns_domain::DomainError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accepts connections until `shutdown` fires. A connection may carry
/// several length-prefixed queries; it is closed after it stays idle for
/// [`TCP_IDLE_TIMEOUT`].
pub(crate) async fn serve_tcp(
    listener: TcpListener,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
) -> Result<(), DomainError> {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("TCP listener shutting down");
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "TCP accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            },
        };

        tracker.spawn(handle_connection(
            stream,
            peer,
            Arc::clone(&handler),
            shutdown.clone(),
        ));
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<DnsServerHandler>,
    shutdown: CancellationToken,
) {
    loop {
        let frame = tokio::select! {
            _ = shutdown.cancelled() => break,
            frame = tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut stream)) => frame,
        };

        let query = match frame {
            Ok(Ok(query)) => query,
            Ok(Err(e)) => {
                debug!(client = %peer, error = %e, "Closing TCP connection");
                break;
            }
            Err(_) => {
                debug!(client = %peer, "TCP connection idle, closing");
                break;
            }
        };

        if let Some(response) = handler.handle_raw(&query, peer).await {
            if let Err(e) = send_with_length_prefix(&mut stream, &response).await {
                debug!(client = %peer, error = %e, "Failed to send TCP response");
                break;
            }
        }
    }
}
