use async_trait::async_trait;
use hickory_proto::op::Message;

/// Result of forwarding a query upstream.
///
/// `upstream` is set only when one of the configured servers produced the
/// response; a synthesized SERVFAIL after every server failed carries `None`.
#[derive(Debug, Clone)]
pub struct ForwardOutcome {
    pub response: Message,
    pub upstream: Option<String>,
}

impl ForwardOutcome {
    pub fn answered(response: Message, upstream: impl Into<String>) -> Self {
        Self {
            response,
            upstream: Some(upstream.into()),
        }
    }

    pub fn exhausted(response: Message) -> Self {
        Self {
            response,
            upstream: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.upstream.is_some()
    }
}

#[async_trait]
pub trait UpstreamForwarder: Send + Sync {
    /// Never fails: transport errors are absorbed into a SERVFAIL response.
    async fn forward(&self, query: &Message) -> ForwardOutcome;
}
