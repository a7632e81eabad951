use hickory_proto::op::{Message, MessageType};
use tracing::debug;
use v4only_dns_domain::DomainError;

/// An upstream reply that decoded cleanly and answers the expected query id.
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    pub truncated: bool,

    pub message: Message,
}

pub struct ResponseParser;

impl ResponseParser {
    /// Decodes `response_bytes` and checks they answer query `expected_id`.
    pub fn parse(response_bytes: &[u8], expected_id: u16) -> Result<ParsedResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(
                "upstream sent a query instead of a response".to_string(),
            ));
        }

        if message.id() != expected_id {
            return Err(DomainError::IdMismatch {
                expected: expected_id,
                received: message.id(),
            });
        }

        let truncated = message.truncated();

        debug!(
            rcode = ?message.response_code(),
            answers = message.answers().len(),
            additionals = message.additionals().len(),
            truncated,
            "DNS response parsed"
        );

        Ok(ParsedResponse {
            truncated,
            message,
        })
    }
}
