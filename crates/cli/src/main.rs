use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use v4only_dns_domain::CliOverrides;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "v4only-dns")]
#[command(version)]
#[command(about = "DNS forwarder that strips IPv6 answers for selected domains")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log every query and response
    #[arg(short = 'd', long)]
    debug: bool,

    /// Port to listen on (UDP and TCP)
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Upstream resolver (HOST:PORT, udp://HOST:PORT or tcp://HOST:PORT)
    #[arg(short = 'r', long, value_name = "ADDR")]
    resolver: Option<String>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Upstream exchange timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        port: cli.port,
        bind_address: cli.bind,
        upstream: cli.resolver,
        timeout_ms: cli.timeout_ms,
        log_level: cli.log_level,
        debug: cli.debug,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting v4only-dns v{}", env!("CARGO_PKG_VERSION"));
    bootstrap::log_config(&config);

    let dns_services = di::DnsServices::new(&config).await?;

    let listeners = server::bind_listeners(&config.server.listen_addr())?;

    let shutdown = CancellationToken::new();
    server::spawn_shutdown_listener(shutdown.clone());

    server::run_dns_server(listeners, dns_services.handler, shutdown).await?;

    info!("Server shutdown complete");
    Ok(())
}
