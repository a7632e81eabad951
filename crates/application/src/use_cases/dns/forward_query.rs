use crate::messages::{DnsQuery, DnsResponse};
use crate::ports::UpstreamClient;
use hickory_proto::op::{Edns, Message, MessageType, OpCode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use v4only_dns_domain::DomainError;

/// Sends a client question upstream under a fresh transaction id and maps the
/// reply back onto the client's id.
pub struct ForwardQueryUseCase {
    upstream: Arc<dyn UpstreamClient>,
    timeout: Duration,
    edns_payload_size: u16,
    debug: bool,
}

impl ForwardQueryUseCase {
    pub fn new(upstream: Arc<dyn UpstreamClient>, timeout: Duration) -> Self {
        Self {
            upstream,
            timeout,
            edns_payload_size: 4096,
            debug: false,
        }
    }

    pub fn with_edns_payload_size(mut self, size: u16) -> Self {
        self.edns_payload_size = size;
        self
    }

    /// Log every outbound query and raw upstream reply.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Never fails: any upstream problem becomes a SERVFAIL for `query.id`.
    pub async fn execute(&self, query: &DnsQuery) -> DnsResponse {
        let outbound = self.build_upstream_query(query);

        if self.debug {
            debug!(
                upstream = %self.upstream.upstream(),
                client_id = query.id,
                upstream_id = outbound.id(),
                message = ?outbound,
                "Sending upstream query"
            );
        }

        let start = Instant::now();
        match self.exchange(&outbound).await {
            Ok(reply) => {
                if self.debug {
                    debug!(
                        upstream_id = reply.id(),
                        rcode = ?reply.response_code(),
                        latency_ms = start.elapsed().as_millis() as u64,
                        message = ?reply,
                        "Received upstream response"
                    );
                }
                DnsResponse::from_upstream(query.id, &reply)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    upstream = %self.upstream.upstream(),
                    domain = %query.question.name(),
                    record_type = ?query.question.query_type(),
                    "Upstream exchange failed, answering SERVFAIL"
                );
                DnsResponse::server_failure(query.id)
            }
        }
    }

    /// Outbound query: the client's question only, a new random id, RD set and
    /// an EDNS(0) OPT advertising `edns_payload_size` with DO clear.
    pub fn build_upstream_query(&self, query: &DnsQuery) -> Message {
        let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query.question.clone());

        let mut edns = Edns::new();
        edns.set_max_payload(self.edns_payload_size);
        edns.set_dnssec_ok(false);
        message.set_edns(edns);

        message
    }

    async fn exchange(&self, outbound: &Message) -> Result<Message, DomainError> {
        let reply = tokio::time::timeout(self.timeout, self.upstream.exchange(outbound, self.timeout))
            .await
            .map_err(|_| DomainError::QueryTimeout)??;

        if reply.id() != outbound.id() {
            return Err(DomainError::IdMismatch {
                expected: outbound.id(),
                received: reply.id(),
            });
        }

        Ok(reply)
    }
}
