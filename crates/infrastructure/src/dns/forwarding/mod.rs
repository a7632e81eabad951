mod message_builder;
mod response_parser;

pub use message_builder::MessageBuilder;
pub use response_parser::{ParsedResponse, ResponseParser};
