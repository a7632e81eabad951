use tracing_subscriber::EnvFilter;
use v4only_dns_domain::Config;

/// `RUST_LOG` wins when set; otherwise the configured level, forced to
/// `debug` by the debug flag.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.effective_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}
