use hickory_server::ServerFuture;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use v4only_dns_infrastructure::dns::DnsServerHandler;

const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// UDP socket and TCP listener bound to the same address.
pub struct DnsListeners {
    pub udp: UdpSocket,
    pub tcp: TcpListener,
}

impl DnsListeners {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.udp.local_addr()
    }
}

/// Binds both transports before either starts serving; any failure is fatal.
pub fn bind_listeners(bind_addr: &str) -> anyhow::Result<DnsListeners> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let udp = create_udp_socket(domain, socket_addr)?;
    // Port 0 means "any": the TCP side follows whatever UDP was given.
    let tcp_addr = SocketAddr::new(socket_addr.ip(), udp.local_addr()?.port());
    let tcp = create_tcp_listener(domain, tcp_addr)?;

    Ok(DnsListeners { udp, tcp })
}

/// Serves UDP and TCP until `shutdown` is cancelled, then drains both listeners.
pub async fn run_dns_server(
    listeners: DnsListeners,
    handler: DnsServerHandler,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let local_addr = listeners.local_addr()?;
    let mut join_set: JoinSet<(&'static str, anyhow::Result<()>)> = JoinSet::new();

    let mut udp_server = ServerFuture::new(handler.clone());
    udp_server.register_socket(listeners.udp);
    join_set.spawn(serve("UDP", udp_server, shutdown.clone()));

    let mut tcp_server = ServerFuture::new(handler);
    tcp_server.register_listener(listeners.tcp, TCP_IDLE_TIMEOUT);
    join_set.spawn(serve("TCP", tcp_server, shutdown.clone()));

    info!(bind_address = %local_addr, "DNS server ready (UDP + TCP)");

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((transport, Ok(()))) => info!(transport, "DNS listener stopped"),
            Ok((transport, Err(e))) => error!(transport, error = %e, "DNS listener failed"),
            Err(e) => error!(error = %e, "DNS listener task panicked"),
        }
    }

    Ok(())
}

async fn serve(
    transport: &'static str,
    mut server: ServerFuture<DnsServerHandler>,
    shutdown: CancellationToken,
) -> (&'static str, anyhow::Result<()>) {
    let finished = tokio::select! {
        result = server.block_until_done() => Some(result),
        _ = shutdown.cancelled() => None,
    };

    let result = match finished {
        Some(result) => result,
        None => server.shutdown_gracefully().await,
    };

    (transport, result.map_err(anyhow::Error::from))
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
