use crate::ports::{ResponseCachePort, UpstreamForwarder};
use crate::services::ReplyBuilder;
use hickory_proto::op::Message;
use hickory_proto::rr::RecordType;
use relay_dns_domain::{normalize_fqdn, CacheKey, LocalRecordStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Resolves one decoded query: local zone first, then the response cache,
/// then the upstream forwarder.
pub struct HandleDnsQueryUseCase {
    records: Arc<LocalRecordStore>,
    cache: Arc<dyn ResponseCachePort>,
    forwarder: Arc<dyn UpstreamForwarder>,
    ttl: u32,
}

impl HandleDnsQueryUseCase {
    pub fn new(
        records: Arc<LocalRecordStore>,
        cache: Arc<dyn ResponseCachePort>,
        forwarder: Arc<dyn UpstreamForwarder>,
        ttl: u32,
    ) -> Self {
        Self {
            records,
            cache,
            forwarder,
            ttl,
        }
    }

    pub async fn execute(&self, query: &Message) -> Message {
        // Only single-question messages are answered locally or cached.
        let question = match query.queries() {
            [question] => question,
            questions => {
                debug!(
                    questions = questions.len(),
                    "Forwarding query without a single question"
                );
                return self.forwarder.forward(query).await.response;
            }
        };

        let name = normalize_fqdn(&question.name().to_ascii());
        let record_type = question.query_type();

        if matches!(record_type, RecordType::A | RecordType::AAAA) {
            if let Some(addr) = self.records.lookup(&name) {
                if let Some(reply) =
                    ReplyBuilder::local_answer(query, question.name(), addr, self.ttl)
                {
                    debug!(domain = %name, record_type = %record_type, ip = %addr, "Local record hit");
                    return reply;
                }
            }
        }

        let key = CacheKey::new(&name, &record_type.to_string());
        if let Some(cached) = self.cache.get(&key) {
            debug!(key = %key, "Cache hit");
            return ReplyBuilder::restamp(&cached, query);
        }

        let outcome = self.forwarder.forward(query).await;
        if let Some(upstream) = &outcome.upstream {
            debug!(key = %key, upstream = %upstream, rcode = %outcome.response.response_code(), "Caching upstream response");
            self.cache.put(
                key,
                &outcome.response,
                Duration::from_secs(u64::from(self.ttl)),
            );
        }

        outcome.response
    }
}
