#![allow(dead_code)]

use async_trait::async_trait;
use hickory_proto::op::{Message, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use relay_dns_application::ports::{ForwardOutcome, ResponseCachePort, UpstreamForwarder};
use relay_dns_application::services::ReplyBuilder;
use relay_dns_domain::CacheKey;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

pub fn query(id: u16, name: &str, record_type: RecordType) -> Message {
    let mut message = Message::new();
    message.set_id(id);
    message.set_recursion_desired(true);
    message.add_query(Query::query(Name::from_str(name).unwrap(), record_type));
    message
}

pub fn a_record(name: &str, ip: Ipv4Addr, ttl: u32) -> Record {
    Record::from_rdata(Name::from_str(name).unwrap(), ttl, RData::A(A(ip)))
}

enum ForwardMode {
    Answer {
        rcode: ResponseCode,
        answers: Vec<Record>,
    },
    Exhausted,
}

/// Forwarder that answers every query itself and counts the calls.
pub struct MockForwarder {
    mode: ForwardMode,
    calls: AtomicUsize,
    seen: Mutex<Vec<Message>>,
}

impl MockForwarder {
    pub fn answering(answers: Vec<Record>) -> Self {
        Self::with_mode(ForwardMode::Answer {
            rcode: ResponseCode::NoError,
            answers,
        })
    }

    pub fn with_rcode(rcode: ResponseCode) -> Self {
        Self::with_mode(ForwardMode::Answer {
            rcode,
            answers: Vec::new(),
        })
    }

    pub fn exhausted() -> Self {
        Self::with_mode(ForwardMode::Exhausted)
    }

    fn with_mode(mode: ForwardMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<Message> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamForwarder for MockForwarder {
    async fn forward(&self, query: &Message) -> ForwardOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(query.clone());

        match &self.mode {
            ForwardMode::Answer { rcode, answers } => {
                let mut response = ReplyBuilder::reply_to(query);
                response.set_response_code(*rcode);
                response.add_answers(answers.iter().cloned());
                ForwardOutcome::answered(response, "203.0.113.1:53")
            }
            ForwardMode::Exhausted => {
                ForwardOutcome::exhausted(ReplyBuilder::server_failure(query))
            }
        }
    }
}

/// In-memory cache honouring TTLs against the tokio clock, so paused-time
/// tests can step over expiry.
#[derive(Default)]
pub struct MockResponseCache {
    entries: Mutex<HashMap<CacheKey, (Arc<Message>, Instant)>>,
    puts: AtomicUsize,
}

impl MockResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl ResponseCachePort for MockResponseCache {
    fn get(&self, key: &CacheKey) -> Option<Arc<Message>> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(key)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(message, _)| Arc::clone(message))
    }

    fn put(&self, key: CacheKey, response: &Message, ttl: Duration) {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(key, (Arc::new(response.clone()), Instant::now() + ttl));
    }
}
