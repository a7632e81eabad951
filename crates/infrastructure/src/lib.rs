//! v4only-dns Infrastructure Layer
//!
//! Wire encoding, upstream transports and the `hickory-server` request handler.
pub mod dns;
