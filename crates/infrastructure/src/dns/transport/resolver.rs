use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, info};
use v4only_dns_domain::{DnsProtocol, DomainError};

/// Resolves a hostname to all its socket addresses (IPv4 + IPv6).
pub async fn resolve_all(
    hostname: &str,
    port: u16,
    timeout: Duration,
) -> Result<Vec<SocketAddr>, DomainError> {
    let target = format!("{}:{}", hostname, port);

    let addrs_iter = tokio::time::timeout(timeout, tokio::net::lookup_host(&target))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: target.clone(),
        })?
        .map_err(|e| DomainError::Transport {
            server: target.clone(),
            message: format!("hostname resolution failed: {}", e),
        })?;

    let addrs: Vec<SocketAddr> = addrs_iter.collect();

    if addrs.is_empty() {
        return Err(DomainError::Transport {
            server: target,
            message: "hostname resolved to no addresses".to_string(),
        });
    }

    Ok(addrs)
}

/// Pins an upstream given by hostname to one concrete address, preferring IPv4.
///
/// Protocols that already carry an address are returned unchanged.
pub async fn resolve_protocol(
    protocol: &DnsProtocol,
    timeout: Duration,
) -> Result<DnsProtocol, DomainError> {
    let Some((hostname, port)) = protocol.addr().unresolved_parts() else {
        return Ok(protocol.clone());
    };

    let addrs = resolve_all(hostname, port, timeout).await?;
    debug!(hostname, candidates = ?addrs, "Upstream hostname resolved");

    let chosen = addrs
        .iter()
        .copied()
        .find(SocketAddr::is_ipv4)
        .unwrap_or(addrs[0]);

    info!(hostname, address = %chosen, "Using resolved upstream address");
    Ok(protocol.with_resolved_addr(chosen))
}
