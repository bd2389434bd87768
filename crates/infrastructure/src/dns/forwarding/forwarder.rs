use crate::dns::forwarding::{decode_message, encode_message};
use crate::dns::transport::{resolve_upstream, DnsTransport, TcpTransport, UdpTransport};
use async_trait::async_trait;
use hickory_proto::op::Message;
use relay_dns_application::ports::{ForwardOutcome, UpstreamForwarder};
use relay_dns_application::services::ReplyBuilder;
use relay_dns_domain::{DomainError, UpstreamAddr};
use std::time::Duration;
use tracing::{debug, warn};

/// Forwards queries to an ordered list of upstreams, one at a time.
///
/// The first upstream that produces a decodable reply with the right id wins;
/// every failure moves on to the next. When all of them fail the client gets
/// a SERVFAIL built from its own query.
pub struct DnsForwarder {
    upstreams: Vec<UpstreamAddr>,
    timeout: Duration,
}

impl DnsForwarder {
    /// `upstreams` are used as given; loop protection is applied by the
    /// caller when building the list from configuration.
    pub fn new(upstreams: Vec<UpstreamAddr>, timeout: Duration) -> Self {
        Self { upstreams, timeout }
    }

    async fn exchange(
        &self,
        upstream: &UpstreamAddr,
        query_bytes: &[u8],
        id: u16,
    ) -> Result<Message, DomainError> {
        let server_addr = resolve_upstream(upstream).await?;

        let udp = UdpTransport::new(server_addr);
        let response = decode_reply(&udp.send(query_bytes, self.timeout).await?.bytes, id)?;
        if !response.truncated() {
            return Ok(response);
        }

        debug!(server = %upstream, "Truncated UDP response, retrying over TCP");
        let tcp = TcpTransport::new(server_addr);
        let retried = tcp
            .send(query_bytes, self.timeout)
            .await
            .and_then(|full| decode_reply(&full.bytes, id));
        match retried {
            Ok(full) => Ok(full),
            Err(e) => {
                debug!(server = %upstream, error = %e, "TCP retry failed, keeping truncated response");
                Ok(response)
            }
        }
    }
}

fn decode_reply(bytes: &[u8], expected: u16) -> Result<Message, DomainError> {
    let response = decode_message(bytes)?;
    if response.id() != expected {
        return Err(DomainError::ResponseIdMismatch {
            expected,
            received: response.id(),
        });
    }
    Ok(response)
}

#[async_trait]
impl UpstreamForwarder for DnsForwarder {
    async fn forward(&self, query: &Message) -> ForwardOutcome {
        let query_bytes = match encode_message(query) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Cannot re-encode query for forwarding");
                return ForwardOutcome::exhausted(ReplyBuilder::server_failure(query));
            }
        };

        for (index, upstream) in self.upstreams.iter().enumerate() {
            let attempt = tokio::time::timeout(
                self.timeout,
                self.exchange(upstream, &query_bytes, query.id()),
            )
            .await
            .unwrap_or_else(|_| {
                Err(DomainError::TransportTimeout {
                    server: upstream.to_string(),
                })
            });

            match attempt {
                Ok(response) => {
                    debug!(server = %upstream, position = index, rcode = %response.response_code(), "Upstream responded");
                    return ForwardOutcome::answered(response, upstream.to_string());
                }
                Err(e) => {
                    warn!(server = %upstream, error = %e, position = index, "Failing over");
                }
            }
        }

        warn!(
            error = %DomainError::TransportAllServersUnreachable,
            upstreams = self.upstreams.len(),
            "Answering SERVFAIL"
        );
        ForwardOutcome::exhausted(ReplyBuilder::server_failure(query))
    }
}
