use hickory_proto::op::{Message, Query, ResponseCode};
use hickory_proto::rr::Record;

/// A client query as seen by the core: its transaction id and single question.
#[derive(Debug, Clone)]
pub struct DnsQuery {
    pub id: u16,
    pub question: Query,
}

impl DnsQuery {
    pub fn new(id: u16, question: Query) -> Self {
        Self { id, question }
    }

    /// Question name in ASCII form, as matched by the routing table.
    pub fn name(&self) -> String {
        self.question.name().to_ascii()
    }
}

/// Reply handed back to the transport layer for encoding.
#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,
    pub response_code: ResponseCode,
    pub recursion_available: bool,
    pub answers: Vec<Record>,
    pub additionals: Vec<Record>,
}

impl DnsResponse {
    /// Re-correlates an upstream reply to the client's transaction id.
    ///
    /// Only the answer and additional sections are carried over; RA is always set.
    pub fn from_upstream(client_id: u16, upstream: &Message) -> Self {
        Self {
            id: client_id,
            response_code: upstream.response_code(),
            recursion_available: true,
            answers: upstream.answers().to_vec(),
            additionals: upstream.additionals().to_vec(),
        }
    }

    /// SERVFAIL with empty sections, correlated to `client_id`.
    pub fn server_failure(client_id: u16) -> Self {
        Self {
            id: client_id,
            response_code: ResponseCode::ServFail,
            recursion_available: true,
            answers: Vec::new(),
            additionals: Vec::new(),
        }
    }

    pub fn is_server_failure(&self) -> bool {
        self.response_code == ResponseCode::ServFail
    }
}
