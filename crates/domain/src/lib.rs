//! v4only-dns Domain Layer
pub mod config;
pub mod dns_protocol;
pub mod errors;
pub mod routing;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_protocol::{DnsProtocol, UpstreamAddr};
pub use errors::DomainError;
pub use routing::{RoutePath, RoutingRule, RoutingTable};
