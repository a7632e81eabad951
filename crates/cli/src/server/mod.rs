pub mod dns;
pub mod signal;

pub use dns::{bind_listeners, run_dns_server, DnsListeners};
pub use signal::spawn_shutdown_listener;
