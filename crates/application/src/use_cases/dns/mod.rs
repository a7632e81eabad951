mod forward_query;
mod handle_dns_query;

pub use forward_query::ForwardQueryUseCase;
pub use handle_dns_query::HandleDnsQueryUseCase;
