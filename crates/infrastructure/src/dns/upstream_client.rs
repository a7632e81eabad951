use super::forwarding::{MessageBuilder, ResponseParser};
use super::transport::{self, resolver, tcp::TcpTransport, DnsTransport, Transport};
use async_trait::async_trait;
use hickory_proto::op::Message;
use std::time::{Duration, Instant};
use tracing::debug;
use v4only_dns_application::ports::UpstreamClient;
use v4only_dns_domain::{DnsProtocol, DomainError};

/// Upstream client speaking plain DNS over UDP or TCP.
///
/// A truncated UDP reply is re-sent over TCP to the same server within
/// whatever is left of the exchange timeout.
pub struct HickoryUpstreamClient {
    protocol: DnsProtocol,
    transport: Transport,
    tcp_fallback: Option<TcpTransport>,
}

impl HickoryUpstreamClient {
    /// `protocol` must carry a resolved address; see [`Self::connect`].
    pub fn new(protocol: DnsProtocol) -> Result<Self, DomainError> {
        let transport = transport::create_transport(&protocol)?;
        let tcp_fallback = match (&protocol, protocol.socket_addr()) {
            (DnsProtocol::Udp { .. }, Some(addr)) => Some(TcpTransport::new(addr)),
            _ => None,
        };

        Ok(Self {
            protocol,
            transport,
            tcp_fallback,
        })
    }

    /// Resolves a hostname upstream once, then builds the client.
    pub async fn connect(protocol: &DnsProtocol, timeout: Duration) -> Result<Self, DomainError> {
        let resolved = resolver::resolve_protocol(protocol, timeout).await?;
        Self::new(resolved)
    }

    pub fn protocol(&self) -> &DnsProtocol {
        &self.protocol
    }
}

#[async_trait]
impl UpstreamClient for HickoryUpstreamClient {
    async fn exchange(&self, query: &Message, timeout: Duration) -> Result<Message, DomainError> {
        let start = Instant::now();
        let query_bytes = MessageBuilder::serialize(query)?;

        let response = self.transport.send(&query_bytes, timeout).await?;
        let parsed = ResponseParser::parse(&response.bytes, query.id())?;

        let Some(tcp) = self.tcp_fallback.as_ref().filter(|_| parsed.truncated) else {
            debug!(
                server = %self.protocol,
                protocol = response.protocol_used,
                latency_ms = start.elapsed().as_millis() as u64,
                "Upstream exchange complete"
            );
            return Ok(parsed.message);
        };

        let remaining = timeout.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            return Err(DomainError::QueryTimeout);
        }

        debug!(server = %self.protocol, "Response truncated (TC bit), upgrading to TCP");

        let tcp_response = tcp.send(&query_bytes, remaining).await?;
        let tcp_parsed = ResponseParser::parse(&tcp_response.bytes, query.id())?;

        debug!(
            server = %self.protocol,
            protocol = tcp_response.protocol_used,
            latency_ms = start.elapsed().as_millis() as u64,
            "Upstream exchange complete"
        );

        Ok(tcp_parsed.message)
    }

    fn upstream(&self) -> String {
        self.protocol.to_string()
    }
}
