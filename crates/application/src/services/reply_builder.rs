use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::IpAddr;

/// Builds response messages that mirror the header and question of a query.
pub struct ReplyBuilder;

impl ReplyBuilder {
    /// Empty NOERROR response carrying the query's id, opcode, RD/CD flags
    /// and question section.
    pub fn reply_to(query: &Message) -> Message {
        let mut reply = Message::new();
        reply.set_id(query.id());
        reply.set_message_type(MessageType::Response);
        reply.set_op_code(query.op_code());
        reply.set_recursion_desired(query.recursion_desired());
        reply.set_checking_disabled(query.checking_disabled());
        reply.set_recursion_available(true);
        reply.set_response_code(ResponseCode::NoError);
        reply.add_queries(query.queries().iter().cloned());
        reply
    }

    pub fn server_failure(query: &Message) -> Message {
        let mut reply = Self::reply_to(query);
        reply.set_response_code(ResponseCode::ServFail);
        reply
    }

    /// Bare FORMERR for input whose question could not be decoded.
    pub fn format_error(id: u16) -> Message {
        let mut reply = Message::new();
        reply.set_id(id);
        reply.set_message_type(MessageType::Response);
        reply.set_response_code(ResponseCode::FormErr);
        reply
    }

    /// Authoritative answer for a locally configured address.
    ///
    /// Returns `None` when the address family does not fit the question type.
    pub fn local_answer(query: &Message, name: &Name, addr: IpAddr, ttl: u32) -> Option<Message> {
        let record_type = query.queries().first()?.query_type();
        let rdata = match (record_type, addr) {
            (RecordType::A, IpAddr::V4(v4)) => RData::A(A(v4)),
            (RecordType::AAAA, IpAddr::V6(v6)) => RData::AAAA(AAAA(v6)),
            _ => return None,
        };

        let mut owner = name.to_lowercase();
        owner.set_fqdn(true);

        let mut reply = Self::reply_to(query);
        reply.set_authoritative(true);
        reply.add_answer(Record::from_rdata(owner, ttl, rdata));
        Some(reply)
    }

    /// Copy of a cached response re-addressed to `query`. Response code and
    /// record sections come from the cache, everything that identifies the
    /// exchange comes from the query.
    pub fn restamp(cached: &Message, query: &Message) -> Message {
        let mut reply = cached.clone();
        reply.set_id(query.id());
        reply.set_message_type(MessageType::Response);
        reply.set_op_code(query.op_code());
        reply.set_recursion_desired(query.recursion_desired());
        reply.set_checking_disabled(query.checking_disabled());
        let _ = reply.take_queries();
        reply.add_queries(query.queries().iter().cloned());
        reply
    }
}
