//! The compiled request description.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{SqlReqError, SqlReqResult};
use crate::parser::fields::ParsedFields;

/// Timeout applied when the query has no `with timeout` option.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP verb selectable with `with <verb>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Basic-auth credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicAuth {
    pub login: String,
    pub password: String,
}

/// Everything the HTTP layer needs to issue one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    /// Body fields from `key = value` clauses.
    pub json: Map<String, Value>,
    /// Caller-supplied body, set when the query has a payload marker.
    pub payload: Option<Value>,
    pub basic_auth: Option<BasicAuth>,
    /// Seconds.
    pub timeout: u64,
    /// Response headers to extract, header-selection mode only.
    pub output_headers: Vec<String>,
}

impl RequestDescriptor {
    /// Assemble a descriptor from parsed fields and the payload candidate.
    ///
    /// Fails with [`SqlReqError::MissingPayload`] when the query has a
    /// payload marker but no candidate, and with
    /// [`SqlReqError::InvalidTimeoutFormat`] when the timeout literal is not
    /// a non-negative integer.
    pub fn build(fields: ParsedFields, payload: Option<Value>) -> SqlReqResult<Self> {
        let headers = fields
            .header_keys
            .into_iter()
            .zip(fields.header_values)
            .collect();

        let json = fields
            .json_keys
            .into_iter()
            .zip(fields.json_values.into_iter().map(Value::String))
            .collect();

        let payload = match (fields.payload, payload) {
            (true, None) => return Err(SqlReqError::MissingPayload),
            (true, candidate) => candidate,
            (false, _) => None,
        };

        let timeout = match fields.timeout {
            Some(literal) => literal
                .parse::<u64>()
                .map_err(SqlReqError::InvalidTimeoutFormat)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let basic_auth = (!fields.basic_login.is_empty() && !fields.basic_password.is_empty())
            .then(|| BasicAuth {
                login: fields.basic_login,
                password: fields.basic_password,
            });

        Ok(Self {
            url: fields.url,
            method: fields.method.unwrap_or_default(),
            headers,
            json,
            payload,
            basic_auth,
            timeout,
            output_headers: fields.output_headers,
        })
    }

    /// Request timeout. A timeout of zero means no timeout at all.
    pub fn timeout_duration(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    /// JSON request body: the payload if present, otherwise the field map.
    pub fn body(&self) -> Value {
        match &self.payload {
            Some(payload) => payload.clone(),
            None => Value::Object(self.json.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let fields = ParsedFields {
            url: "http".to_string(),
            ..Default::default()
        };
        let desc = RequestDescriptor::build(fields, None).unwrap();
        assert_eq!(desc.method, Method::Get);
        assert_eq!(desc.timeout, DEFAULT_TIMEOUT_SECS);
        assert!(desc.headers.is_empty());
        assert!(desc.json.is_empty());
        assert_eq!(desc.payload, None);
        assert_eq!(desc.basic_auth, None);
    }

    #[test]
    fn test_missing_payload() {
        let fields = ParsedFields {
            payload: true,
            ..Default::default()
        };
        assert!(matches!(
            RequestDescriptor::build(fields, None),
            Err(SqlReqError::MissingPayload)
        ));
    }

    #[test]
    fn test_payload_ignored_without_marker() {
        let desc = RequestDescriptor::build(ParsedFields::default(), Some(json!({"a": 1}))).unwrap();
        assert_eq!(desc.payload, None);
        assert_eq!(desc.body(), json!({}));
    }

    #[test]
    fn test_payload_replaces_json_body() {
        let fields = ParsedFields {
            payload: true,
            json_keys: vec!["k".into()],
            json_values: vec!["v".into()],
            ..Default::default()
        };
        let desc = RequestDescriptor::build(fields, Some(json!([1, 2]))).unwrap();
        assert_eq!(desc.body(), json!([1, 2]));
        assert_eq!(desc.json.get("k"), Some(&json!("v")));
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let fields = ParsedFields {
            timeout: Some("0".to_string()),
            ..Default::default()
        };
        let desc = RequestDescriptor::build(fields, None).unwrap();
        assert_eq!(desc.timeout, 0);
        assert_eq!(desc.timeout_duration(), None);

        let desc = RequestDescriptor::build(ParsedFields::default(), None).unwrap();
        assert_eq!(desc.timeout_duration(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_invalid_timeout() {
        for literal in ["ten", "-5", "", "1.5"] {
            let fields = ParsedFields {
                timeout: Some(literal.to_string()),
                ..Default::default()
            };
            assert!(matches!(
                RequestDescriptor::build(fields, None),
                Err(SqlReqError::InvalidTimeoutFormat(_))
            ));
        }
    }

    #[test]
    fn test_basic_auth_needs_both_parts() {
        let fields = ParsedFields {
            basic_login: "user".into(),
            ..Default::default()
        };
        assert_eq!(RequestDescriptor::build(fields, None).unwrap().basic_auth, None);

        let fields = ParsedFields {
            basic_login: "user".into(),
            basic_password: "pw".into(),
            ..Default::default()
        };
        assert_eq!(
            RequestDescriptor::build(fields, None).unwrap().basic_auth,
            Some(BasicAuth {
                login: "user".into(),
                password: "pw".into(),
            })
        );
    }

    #[test]
    fn test_method_serializes_uppercase() {
        assert_eq!(serde_json::to_value(Method::Patch).unwrap(), json!("PATCH"));
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
