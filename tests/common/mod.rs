#![allow(dead_code)]

mod upstream;

#[allow(unused_imports)]
pub use client::{a, aaaa, encode, query, tcp_exchange, udp_exchange, udp_exchange_raw};
pub use harness::ProxyHarness;
pub use upstream::MockUpstream;
