use async_trait::async_trait;
use hickory_proto::op::Message;
use std::time::Duration;
use v4only_dns_domain::DomainError;

/// Exchange with the upstream resolver.
///
/// One instance is shared by every in-flight request, so implementations must
/// allow concurrent exchanges without external locking.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Sends `query` and returns the reply correlated to `query.id()`.
    ///
    /// A reply whose id differs from the query, or that cannot be decoded, is
    /// an error. The whole exchange must complete within `timeout`.
    async fn exchange(&self, query: &Message, timeout: Duration) -> Result<Message, DomainError>;

    /// Human readable upstream endpoint, for logs.
    fn upstream(&self) -> String;
}
