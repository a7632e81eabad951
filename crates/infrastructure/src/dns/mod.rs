pub mod forwarding;
pub mod server;
pub mod transport;
pub mod upstream_client;

pub use server::DnsServerHandler;
pub use upstream_client::HickoryUpstreamClient;
