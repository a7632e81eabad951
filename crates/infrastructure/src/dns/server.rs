use hickory_proto::op::{Edns, MessageType, Query, ResponseCode};
use hickory_proto::rr::Name;
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, warn};
use v4only_dns_application::use_cases::HandleDnsQueryUseCase;
use v4only_dns_application::DnsQuery;

/// Bridges `hickory-server` requests to [`HandleDnsQueryUseCase`].
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }
}

#[async_trait::async_trait]
impl RequestHandler for DnsServerHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        let request_info = match request.request_info() {
            Ok(info) => info,
            Err(e) => {
                warn!(error = %e, client = %request.src(), "Malformed query");
                return send_error_response(request, &mut response_handle, ResponseCode::FormErr)
                    .await;
            }
        };

        let lower_query = request_info.query;
        let name = match Name::from_str(&lower_query.name().to_string()) {
            Ok(name) => name,
            Err(e) => {
                warn!(error = %e, client = %request.src(), "Unparsable query name");
                return send_error_response(request, &mut response_handle, ResponseCode::FormErr)
                    .await;
            }
        };

        let mut question = Query::query(name, lower_query.query_type());
        question.set_query_class(lower_query.query_class());

        debug!(
            domain = %question.name(),
            record_type = ?question.query_type(),
            client = %request.src(),
            protocol = ?request.protocol(),
            "DNS query received"
        );

        let dns_query = DnsQuery::new(request.header().id(), question);
        let response = self.use_case.execute(&dns_query).await;

        let mut builder = MessageResponseBuilder::from_message_request(request);
        if let Some(edns) = response_edns(request) {
            builder.edns(edns);
        }
        let mut header = *request.header();
        header.set_id(response.id);
        header.set_message_type(MessageType::Response);
        header.set_response_code(response.response_code);
        header.set_recursion_available(response.recursion_available);
        header.set_authoritative(false);
        header.set_truncated(false);

        let message = builder.build(
            header,
            response.answers.iter(),
            &[],
            &[],
            response.additionals.iter(),
        );

        match response_handle.send_response(message).await {
            Ok(info) => info,
            Err(e) => {
                error!(error = %e, "Failed to send response");
                ResponseInfo::from(*request.header())
            }
        }
    }
}

async fn send_error_response<R: ResponseHandler>(
    request: &Request,
    response_handle: &mut R,
    code: ResponseCode,
) -> ResponseInfo {
    debug!(code = ?code, "Sending error response");
    let mut builder = MessageResponseBuilder::from_message_request(request);
    if let Some(edns) = response_edns(request) {
        builder.edns(edns);
    }
    let mut header = *request.header();
    header.set_message_type(MessageType::Response);
    header.set_response_code(code);
    header.set_recursion_available(true);
    let response = builder.build(header, &[], &[], &[], &[]);

    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "Failed to send error response");
            ResponseInfo::from(*request.header())
        }
    }
}

/// OPT record for the reply, present only when the client sent one.
/// Advertises the client's own payload size back to it.
fn response_edns(request: &Request) -> Option<Edns> {
    let client_edns = request.edns()?;
    let mut edns = Edns::new();
    edns.set_max_payload(client_edns.max_payload().max(512));
    Some(edns)
}
