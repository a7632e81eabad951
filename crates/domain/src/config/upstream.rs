use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// `host:port`, `udp://host:port` or `tcp://host:port`.
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// UDP payload size advertised in the EDNS(0) OPT record of outbound queries.
    #[serde(default = "default_edns_payload_size")]
    pub edns_payload_size: u16,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            timeout_ms: default_timeout_ms(),
            edns_payload_size: default_edns_payload_size(),
        }
    }
}

fn default_address() -> String {
    "8.8.8.8:53".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_edns_payload_size() -> u16 {
    4096
}
