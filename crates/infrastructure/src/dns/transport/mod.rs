pub mod resolver;
pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use v4only_dns_domain::{DnsProtocol, DomainError};

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
        }
    }
}

/// Builds the transport for `protocol`, which must already carry a resolved address.
pub fn create_transport(protocol: &DnsProtocol) -> Result<Transport, DomainError> {
    let addr = resolved_addr(protocol)?;
    match protocol {
        DnsProtocol::Udp { .. } => Ok(Transport::Udp(udp::UdpTransport::new(addr))),
        DnsProtocol::Tcp { .. } => Ok(Transport::Tcp(tcp::TcpTransport::new(addr))),
    }
}

fn resolved_addr(protocol: &DnsProtocol) -> Result<SocketAddr, DomainError> {
    protocol.socket_addr().ok_or_else(|| {
        DomainError::ConfigError(format!(
            "{} transport requires a resolved address, got: {}",
            protocol.protocol_name(),
            protocol.addr()
        ))
    })
}

/// Maps an I/O failure against `server` onto the matching transport error.
pub(crate) fn io_error(server: SocketAddr, context: &str, e: std::io::Error) -> DomainError {
    use std::io::ErrorKind;

    let server = server.to_string();
    match e.kind() {
        ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused { server },
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe => {
            DomainError::TransportConnectionReset { server }
        }
        ErrorKind::TimedOut => DomainError::TransportTimeout { server },
        _ => DomainError::Transport {
            server,
            message: format!("{}: {}", context, e),
        },
    }
}
