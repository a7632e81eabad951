use std::sync::Arc;
use tracing::info;
use v4only_dns_application::ports::UpstreamClient;
use v4only_dns_application::use_cases::{ForwardQueryUseCase, HandleDnsQueryUseCase};
use v4only_dns_domain::Config;
use v4only_dns_infrastructure::dns::{DnsServerHandler, HickoryUpstreamClient};

/// The process-wide query pipeline: one upstream client, one routing table.
pub struct DnsServices {
    pub handler: DnsServerHandler,
}

impl DnsServices {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let protocol = config.upstream_protocol()?;
        let timeout = config.upstream.timeout();
        let debug = config.logging.debug;

        let upstream: Arc<dyn UpstreamClient> =
            Arc::new(HickoryUpstreamClient::connect(&protocol, timeout).await?);

        let routing = Arc::new(config.filtering.routing_table());

        let forwarder = Arc::new(
            ForwardQueryUseCase::new(upstream.clone(), timeout)
                .with_edns_payload_size(config.upstream.edns_payload_size)
                .with_debug(debug),
        );

        let handler_use_case =
            Arc::new(HandleDnsQueryUseCase::new(forwarder, routing.clone()).with_debug(debug));

        info!(
            upstream = %upstream.upstream(),
            filtered = ?routing.filtered_suffixes().collect::<Vec<_>>(),
            "DNS services initialized"
        );

        Ok(Self {
            handler: DnsServerHandler::new(handler_use_case),
        })
    }
}
