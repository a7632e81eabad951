use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::Record;
use std::sync::Mutex;
use std::time::Duration;
use v4only_dns_application::ports::UpstreamClient;
use v4only_dns_domain::DomainError;

#[derive(Clone)]
pub enum UpstreamBehavior {
    /// Echo the query id and question back with these sections.
    Reply {
        rcode: ResponseCode,
        answers: Vec<Record>,
        authorities: Vec<Record>,
        additionals: Vec<Record>,
    },
    /// Reply with an id that differs from the query id.
    WrongId,
    Fail(DomainError),
    /// Sleep past any sane timeout before replying.
    Hang(Duration),
}

pub struct MockUpstreamClient {
    behavior: Mutex<UpstreamBehavior>,
    sent: Mutex<Vec<Message>>,
}

impl MockUpstreamClient {
    pub fn new() -> Self {
        Self::with_behavior(UpstreamBehavior::Reply {
            rcode: ResponseCode::NoError,
            answers: vec![],
            authorities: vec![],
            additionals: vec![],
        })
    }

    pub fn with_behavior(behavior: UpstreamBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(answers: Vec<Record>) -> Self {
        Self::with_behavior(UpstreamBehavior::Reply {
            rcode: ResponseCode::NoError,
            answers,
            authorities: vec![],
            additionals: vec![],
        })
    }

    pub fn failing(error: DomainError) -> Self {
        Self::with_behavior(UpstreamBehavior::Fail(error))
    }

    pub fn set_behavior(&self, behavior: UpstreamBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for MockUpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

fn reply_to(query: &Message, id: u16) -> Message {
    let mut reply = Message::new(id, MessageType::Response, query.op_code());
    reply.set_recursion_desired(query.recursion_desired());
    reply.add_queries(query.queries().to_vec());
    reply
}

#[async_trait]
impl UpstreamClient for MockUpstreamClient {
    async fn exchange(&self, query: &Message, _timeout: Duration) -> Result<Message, DomainError> {
        self.sent.lock().unwrap().push(query.clone());
        let behavior = self.behavior.lock().unwrap().clone();

        match behavior {
            UpstreamBehavior::Reply {
                rcode,
                answers,
                authorities,
                additionals,
            } => {
                let mut reply = reply_to(query, query.id());
                reply.set_response_code(rcode);
                reply.add_answers(answers);
                reply.add_name_servers(authorities);
                reply.add_additionals(additionals);
                Ok(reply)
            }
            UpstreamBehavior::WrongId => Ok(reply_to(query, query.id().wrapping_add(1))),
            UpstreamBehavior::Fail(error) => Err(error),
            UpstreamBehavior::Hang(delay) => {
                tokio::time::sleep(delay).await;
                Ok(reply_to(query, query.id()))
            }
        }
    }

    fn upstream(&self) -> String {
        "mock://upstream".to_string()
    }
}
