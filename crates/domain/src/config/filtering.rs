use serde::{Deserialize, Serialize};

use crate::routing::{RoutePath, RoutingRule, RoutingTable};

/// Domains whose answers get their AAAA/IN records stripped.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilteringConfig {
    #[serde(default = "default_domains")]
    pub domains: Vec<String>,
}

impl FilteringConfig {
    pub fn routing_table(&self) -> RoutingTable {
        RoutingTable::new(
            self.domains
                .iter()
                .map(|domain| RoutingRule::new(domain.as_str(), RoutePath::Filtered)),
        )
    }
}

impl Default for FilteringConfig {
    fn default() -> Self {
        Self {
            domains: default_domains(),
        }
    }
}

fn default_domains() -> Vec<String> {
    ["netflix.com.", "nflxvideo.com.", "nflxext.com.", "nflximg.com."]
        .iter()
        .map(|d| d.to_string())
        .collect()
}
