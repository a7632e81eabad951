use tracing::info;
use v4only_dns_domain::{CliOverrides, Config};

/// Loads, overrides and validates the configuration; any error aborts startup.
pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Summary of the effective configuration, logged once logging is up.
pub fn log_config(config: &Config) {
    info!(
        listen = %config.server.listen_addr(),
        upstream = %config.upstream.address,
        timeout_ms = config.upstream.timeout_ms,
        edns_payload_size = config.upstream.edns_payload_size,
        filtered_domains = ?config.filtering.domains,
        debug = config.logging.debug,
        "Configuration loaded"
    );
}
