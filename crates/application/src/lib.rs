//! v4only-dns Application Layer
//!
//! Query dispatch, upstream forwarding and answer filtering. Transport and
//! wire concerns live behind the [`ports::UpstreamClient`] port.
pub mod messages;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use messages::{DnsQuery, DnsResponse};
