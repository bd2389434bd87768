use hickory_proto::op::Message;
use relay_dns_domain::CacheKey;
use std::sync::Arc;
use std::time::Duration;

pub trait ResponseCachePort: Send + Sync {
    /// Returns the stored response if it has not expired yet. An expired
    /// entry is treated as absent even before a sweep removes it.
    fn get(&self, key: &CacheKey) -> Option<Arc<Message>>;

    /// Stores a private copy of `response` for `ttl`, replacing any previous
    /// entry under the same key.
    fn put(&self, key: CacheKey, response: &Message, ttl: Duration);
}
