//! Wire encoding of outbound DNS messages.

use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use v4only_dns_domain::DomainError;

pub struct MessageBuilder;

impl MessageBuilder {
    /// Serialize a Message to wire format bytes
    pub fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message
            .emit(&mut encoder)
            .map_err(|e| DomainError::MessageEncoding(e.to_string()))?;

        Ok(buf)
    }
}
