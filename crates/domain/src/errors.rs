use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Failed to encode DNS message: {0}")]
    MessageEncoding(String),

    #[error("Response id {received} does not match query id {expected}")]
    IdMismatch { expected: u16, received: u16 },

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("Transport error with {server}: {message}")]
    Transport { server: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// True for failures of the exchange itself rather than of the reply content.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::QueryTimeout
                | Self::TransportTimeout { .. }
                | Self::TransportConnectionRefused { .. }
                | Self::TransportConnectionReset { .. }
                | Self::Transport { .. }
        )
    }
}
