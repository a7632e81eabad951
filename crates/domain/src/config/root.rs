use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::ConfigError;
use super::filtering::FilteringConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;
use crate::dns_protocol::DnsProtocol;
use crate::routing::validate_domain_name;

const LOCAL_CONFIG_PATH: &str = "v4only-dns.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/v4only-dns/config.toml";

/// Smallest EDNS payload allowed by RFC 6891.
const MIN_EDNS_PAYLOAD: u16 = 512;

/// Main configuration structure for v4only-dns
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream resolver configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Domains routed to the AAAA-stripping path
    #[serde(default)]
    pub filtering: FilteringConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. v4only-dns.toml in current directory
    /// 3. /etc/v4only-dns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        config.normalize_domains();
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(upstream) = overrides.upstream {
            self.upstream.address = upstream;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.upstream.timeout_ms = timeout_ms;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.debug {
            self.logging.debug = true;
        }
    }

    /// Fully qualify and lowercase filtered domains, dropping duplicates.
    fn normalize_domains(&mut self) {
        let mut seen = Vec::with_capacity(self.filtering.domains.len());
        for domain in &self.filtering.domains {
            let normalized = crate::routing::normalize_name(domain);
            if !seen.contains(&normalized) {
                seen.push(normalized);
            }
        }
        self.filtering.domains = seen;
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Bind address cannot be empty".to_string(),
            ));
        }

        if self.upstream.address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "No upstream resolver configured".to_string(),
            ));
        }

        self.upstream_protocol()?;

        if self.upstream.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Upstream timeout must be greater than 0".to_string(),
            ));
        }

        if self.upstream.edns_payload_size < MIN_EDNS_PAYLOAD {
            return Err(ConfigError::Validation(format!(
                "EDNS payload size {} is below the minimum of {}",
                self.upstream.edns_payload_size, MIN_EDNS_PAYLOAD
            )));
        }

        for domain in &self.filtering.domains {
            validate_domain_name(domain).map_err(|e| {
                ConfigError::Validation(format!("Invalid filtered domain: {}", e))
            })?;
        }

        Ok(())
    }

    /// Parsed upstream endpoint.
    pub fn upstream_protocol(&self) -> Result<DnsProtocol, ConfigError> {
        self.upstream
            .address
            .parse::<DnsProtocol>()
            .map_err(ConfigError::Validation)
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|p| Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub upstream: Option<String>,
    pub timeout_ms: Option<u64>,
    pub log_level: Option<String>,
    pub debug: bool,
}
