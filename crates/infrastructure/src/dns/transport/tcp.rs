use super::{io_error, DnsTransport, TransportResponse};
use async_trait::async_trait;
use dashmap::DashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;
use v4only_dns_domain::DomainError;

const MAX_IDLE_TCP_PER_HOST: usize = 2;

/// Idle upstream connections keyed by server address.
pub type TcpConnectionPool = DashMap<SocketAddr, Vec<TcpStream>>;

/// DNS over TCP with RFC 1035 two-byte length framing.
///
/// Connections are returned to an idle pool after a successful exchange. A
/// pooled connection that fails on write is replaced once by a fresh one.
pub struct TcpTransport {
    server_addr: SocketAddr,
    pool: TcpConnectionPool,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self {
            server_addr,
            pool: TcpConnectionPool::new(),
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    pub fn idle_connections(&self) -> usize {
        self.pool
            .get(&self.server_addr)
            .map(|entry| entry.len())
            .unwrap_or(0)
    }

    fn take_pooled(&self) -> Option<TcpStream> {
        self.pool.get_mut(&self.server_addr)?.pop()
    }

    fn return_to_pool(&self, stream: TcpStream) {
        let mut entry = self.pool.entry(self.server_addr).or_default();
        if entry.len() < MAX_IDLE_TCP_PER_HOST {
            entry.push(stream);
        }
    }

    fn timeout_error(&self) -> DomainError {
        DomainError::TransportTimeout {
            server: self.server_addr.to_string(),
        }
    }

    async fn connect_new(&self, timeout: Duration) -> Result<TcpStream, DomainError> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(self.server_addr))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| io_error(self.server_addr, "failed to connect", e))?;

        stream
            .set_nodelay(true)
            .map_err(|e| io_error(self.server_addr, "failed to set TCP_NODELAY", e))?;

        Ok(stream)
    }

    /// Writes the framed query on `stream` and reads back one framed reply.
    async fn exchange_on(
        &self,
        stream: &mut TcpStream,
        message_bytes: &[u8],
        deadline: Instant,
    ) -> Result<Vec<u8>, DomainError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        tokio::time::timeout(remaining, send_with_length_prefix(stream, message_bytes))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| io_error(self.server_addr, "failed to send TCP query", e))?;

        debug!(server = %self.server_addr, message_len = message_bytes.len(), "TCP query sent");

        let remaining = deadline.saturating_duration_since(Instant::now());
        tokio::time::timeout(remaining, read_with_length_prefix(stream))
            .await
            .map_err(|_| self.timeout_error())?
            .map_err(|e| io_error(self.server_addr, "failed to read TCP response", e))
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let deadline = Instant::now() + timeout;

        let pooled = match self.take_pooled() {
            Some(mut stream) => match self.exchange_on(&mut stream, message_bytes, deadline).await {
                Ok(bytes) => Some((stream, bytes)),
                Err(DomainError::TransportTimeout { server }) => {
                    return Err(DomainError::TransportTimeout { server });
                }
                Err(e) => {
                    debug!(server = %self.server_addr, error = %e, "Stale pooled TCP connection, reconnecting");
                    None
                }
            },
            None => None,
        };

        let (stream, response_bytes) = match pooled {
            Some(exchanged) => exchanged,
            None => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                let mut stream = self.connect_new(remaining).await?;
                let bytes = self.exchange_on(&mut stream, message_bytes, deadline).await?;
                (stream, bytes)
            }
        };

        debug!(server = %self.server_addr, response_len = response_bytes.len(), "TCP response received");

        self.return_to_pool(stream);

        Ok(TransportResponse {
            bytes: response_bytes,
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}

pub async fn send_with_length_prefix<S>(stream: &mut S, message_bytes: &[u8]) -> std::io::Result<()>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("DNS message of {} bytes exceeds TCP frame", message_bytes.len()),
        )
    })?;

    stream.write_all(&length.to_be_bytes()).await?;
    stream.write_all(message_bytes).await?;
    stream.flush().await
}

pub async fn read_with_length_prefix<S>(stream: &mut S) -> std::io::Result<Vec<u8>>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await?;

    let mut message = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    stream.read_exact(&mut message).await?;

    Ok(message)
}
