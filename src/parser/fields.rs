//! Field accumulator filled in by grammar actions.

use serde::Serialize;

use crate::descriptor::Method;
use crate::parser::grammar::Action;

/// Raw fields collected during one walk, in query order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedFields {
    pub output_headers: Vec<String>,
    pub header_keys: Vec<String>,
    pub header_values: Vec<String>,
    pub json_keys: Vec<String>,
    pub json_values: Vec<String>,
    pub url: String,
    /// Last verb selected with `with`, if any.
    pub method: Option<Method>,
    pub payload: bool,
    pub basic_login: String,
    pub basic_password: String,
    /// Unparsed `timeout` literal.
    pub timeout: Option<String>,
}

impl ParsedFields {
    /// Apply one action with the literal of the token that fired it.
    pub fn apply(&mut self, action: Action, value: &str) {
        match action {
            Action::AppendOutputHeader => self.output_headers.push(value.to_string()),
            Action::SetUrl => self.url = value.to_string(),
            Action::AppendHeaderKey => self.header_keys.push(value.to_string()),
            Action::AppendHeaderValue => self.header_values.push(value.to_string()),
            Action::AppendJsonKey => self.json_keys.push(value.to_string()),
            Action::AppendJsonValue => self.json_values.push(value.to_string()),
            Action::SetPayloadFlag => self.payload = true,
            Action::SetMethod(method) => self.method = Some(method),
            Action::SetBasicLogin => self.basic_login = value.to_string(),
            Action::SetBasicPassword => self.basic_password = value.to_string(),
            Action::SetTimeoutLiteral => self.timeout = Some(value.to_string()),
        }
    }
}
