use super::ForwardQueryUseCase;
use crate::messages::{DnsQuery, DnsResponse};
use crate::services::RecordFilter;
use std::sync::Arc;
use tracing::debug;
use v4only_dns_domain::{RoutePath, RoutingTable};

/// Routes each query to the filtering or pass-through path.
pub struct HandleDnsQueryUseCase {
    forwarder: Arc<ForwardQueryUseCase>,
    routing: Arc<RoutingTable>,
    debug: bool,
}

impl HandleDnsQueryUseCase {
    pub fn new(forwarder: Arc<ForwardQueryUseCase>, routing: Arc<RoutingTable>) -> Self {
        Self {
            forwarder,
            routing,
            debug: false,
        }
    }

    /// Log every inbound query and final response.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn route(&self, query: &DnsQuery) -> RoutePath {
        self.routing.route(&query.name())
    }

    pub async fn execute(&self, query: &DnsQuery) -> DnsResponse {
        let path = self.route(query);

        if self.debug {
            debug!(path = %path, query = ?query, "Received query");
        }

        let response = match path {
            RoutePath::Filtered => self.filtered(query).await,
            RoutePath::PassThrough => self.forwarder.execute(query).await,
        };

        if self.debug {
            debug!(path = %path, response = ?response, "Sending response");
        }

        response
    }

    async fn filtered(&self, query: &DnsQuery) -> DnsResponse {
        let mut response = self.forwarder.execute(query).await;

        let answers = RecordFilter::strip_ipv6(&response.answers);
        let additionals = RecordFilter::strip_ipv6(&response.additionals);

        let stripped =
            (response.answers.len() - answers.len()) + (response.additionals.len() - additionals.len());
        if stripped > 0 {
            debug!(domain = %query.question.name(), stripped, "Stripped AAAA records");
        }

        response.answers = answers;
        response.additionals = additionals;
        response
    }
}
