use crate::dns::forwarding::{decode_message, encode_message};
use hickory_proto::op::{Message, MessageType};
use relay_dns_application::services::ReplyBuilder;
use relay_dns_application::use_cases::HandleDnsQueryUseCase;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error};

/// Fixed size of the DNS header; anything shorter has no id to answer to.
const DNS_HEADER_LEN: usize = 12;

/// Wire-level entry point shared by the UDP and TCP listeners.
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Handles one raw query and returns the encoded response, or `None` when
    /// the input deserves no reply.
    pub async fn handle_raw(&self, query_bytes: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        let query = match decode_message(query_bytes) {
            Ok(query) => query,
            Err(e) if query_bytes.len() >= DNS_HEADER_LEN => {
                debug!(client = %client, error = %e, "Malformed query, answering FORMERR");
                let id = u16::from_be_bytes([query_bytes[0], query_bytes[1]]);
                return encode_reply(&ReplyBuilder::format_error(id));
            }
            Err(_) => {
                debug!(client = %client, len = query_bytes.len(), "Dropping runt packet");
                return None;
            }
        };

        if query.message_type() != MessageType::Query {
            debug!(client = %client, id = query.id(), "Ignoring non-query message");
            return None;
        }

        if let Some(question) = query.queries().first() {
            debug!(
                client = %client,
                domain = %question.name(),
                record_type = %question.query_type(),
                "DNS query received"
            );
        }

        let response = self.use_case.execute(&query).await;
        encode_reply(&response)
    }
}

fn encode_reply(response: &Message) -> Option<Vec<u8>> {
    match encode_message(response) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!(error = %e, id = response.id(), "Failed to encode response");
            None
        }
    }
}
