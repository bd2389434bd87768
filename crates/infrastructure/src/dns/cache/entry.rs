use hickory_proto::op::Message;
use std::sync::Arc;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub message: Arc<Message>,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn new(message: Arc<Message>, expires_at: Instant) -> Self {
        Self {
            message,
            expires_at,
        }
    }

    /// An entry is live strictly before its expiry instant.
    #[inline]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
