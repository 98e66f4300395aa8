use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use sqlreq::prelude::*;

fn headers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn json_fields(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

fn expected(url: &str) -> RequestDescriptor {
    RequestDescriptor {
        url: url.to_string(),
        method: Method::Get,
        headers: BTreeMap::new(),
        json: Map::new(),
        payload: None,
        basic_auth: None,
        timeout: 30,
        output_headers: Vec::new(),
    }
}

#[test]
fn test_from_only() {
    let desc = compile(Mode::Body, "from http", &[]).unwrap();
    assert_eq!(desc, expected("http"));
}

#[test]
fn test_dangling_where() {
    assert!(matches!(
        compile(Mode::Body, "from http where", &[]),
        Err(SqlReqError::IncompleteCommand)
    ));
}

#[test]
fn test_single_header() {
    let desc = compile(Mode::Body, "from http where header test1 = test2", &[]).unwrap();
    assert_eq!(
        desc,
        RequestDescriptor {
            headers: headers(&[("test1", "test2")]),
            ..expected("http")
        }
    );
}

#[test]
fn test_single_json_field() {
    let desc = compile(Mode::Body, "from http where test1 = test2", &[]).unwrap();
    assert_eq!(
        desc,
        RequestDescriptor {
            json: json_fields(&[("test1", "test2")]),
            ..expected("http")
        }
    );
}

#[test]
fn test_full_query() {
    let desc = compile(
        Mode::Body,
        "from http where test1 = test2 and header h1 = h2 and header hh1 = hh2 with post with timeout 10",
        &[],
    )
    .unwrap();
    assert_eq!(
        desc,
        RequestDescriptor {
            method: Method::Post,
            headers: headers(&[("h1", "h2"), ("hh1", "hh2")]),
            json: json_fields(&[("test1", "test2")]),
            timeout: 10,
            ..expected("http")
        }
    );
}

#[test]
fn test_substitution_matches_literal_query() {
    let literal = compile(
        Mode::Body,
        "from http where test1 = test2 and header h1 = h2 and header hh1 = hh2 with post with timeout 10",
        &[],
    )
    .unwrap();
    let substituted = compile(
        Mode::Body,
        "from http where %s = test2 and header h1 = '%s' and header hh1 = hh2 with post with timeout 10",
        &["test1".into(), "h2".into()],
    )
    .unwrap();
    assert_eq!(substituted, literal);
}

#[test]
fn test_missing_and_between_clauses() {
    let err = compile(
        Mode::Body,
        "from http where %s = test2 header h1 = '%s' and header hh1 = hh2 with post with timeout 10",
        &["test1".into(), "h2".into()],
    )
    .unwrap_err();
    assert!(matches!(err, SqlReqError::Parse { position: 7, .. }));
}

#[test]
fn test_compile_is_idempotent() {
    let query = "from http://host where payload = ? and header h = v with patch with basicauth me, pw";
    let args = [Arg::from(json!({"a": [1, 2]}))];
    let first = compile(Mode::Body, query, &args).unwrap();
    let second = compile(Mode::Body, query, &args).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_payload_binding() {
    let desc = compile(
        Mode::Body,
        "from http://host/%s where payload = ? with put",
        &[json!({"id": 7}).into(), "users".into()],
    )
    .unwrap();
    assert_eq!(desc.url, "http://host/users");
    assert_eq!(desc.method, Method::Put);
    assert_eq!(desc.payload, Some(json!({"id": 7})));
    assert_eq!(desc.body(), json!({"id": 7}));
}

#[test]
fn test_missing_payload() {
    assert!(matches!(
        compile(Mode::Body, "from http where payload = ?", &["unused".into()]),
        Err(SqlReqError::Substitution { .. })
    ));
    assert!(matches!(
        compile(Mode::Body, "from http where payload = ?", &[]),
        Err(SqlReqError::MissingPayload)
    ));
}

#[test]
fn test_invalid_timeout() {
    let err = compile(Mode::Body, "from http with timeout soon", &[]).unwrap_err();
    assert!(matches!(err, SqlReqError::InvalidTimeoutFormat(_)));
    assert!(err.to_string().starts_with("wrong timeout format error:"));
}

#[test]
fn test_insufficient_substitutions() {
    assert!(matches!(
        compile(Mode::Body, "from %s where %s = 1", &["http".into()]),
        Err(SqlReqError::Substitution {
            placeholders: 2,
            supplied: 1
        })
    ));
}

#[test]
fn test_basic_auth() {
    let desc = compile(Mode::Body, "from http with basicauth admin, 'S3cret'", &[]).unwrap();
    assert_eq!(
        desc.basic_auth,
        Some(BasicAuth {
            login: "admin".into(),
            password: "s3cret".into(),
        })
    );
}

#[test]
fn test_header_selection_mode() {
    let desc = compile(
        Mode::HeaderSelection,
        "Content-Type, ETag from http://host with delete",
        &[],
    )
    .unwrap();
    assert_eq!(desc.output_headers, vec!["content-type", "etag"]);
    assert_eq!(desc.method, Method::Delete);
    assert_eq!(desc.url, "http://host");
}

#[test]
fn test_descriptor_serializes() {
    let desc = compile(Mode::Body, "from http where a = b with post", &[]).unwrap();
    assert_eq!(
        serde_json::to_value(&desc).unwrap(),
        json!({
            "url": "http",
            "method": "POST",
            "headers": {},
            "json": {"a": "b"},
            "payload": null,
            "basic_auth": null,
            "timeout": 30,
            "output_headers": []
        })
    );
}

#[test]
fn test_explain_stages_serialize() {
    use sqlreq::parser::{Parser, tokens::tokenize};

    let bound = bind("from %s where k = v", &["http".into()]).unwrap();
    let tokens = tokenize(&bound.query);
    let fields = Parser::new(Mode::HeaderSelection)
        .parse(&tokenize(&format!("etag {}", bound.query)))
        .unwrap();

    assert_eq!(serde_json::to_value(Mode::HeaderSelection).unwrap(), json!("HeaderSelection"));
    assert_eq!(
        serde_json::to_value(&tokens[..2]).unwrap(),
        json!([
            {"kind": "From", "value": "from"},
            {"kind": "Value", "value": "http"}
        ])
    );

    let fields = serde_json::to_value(&fields).unwrap();
    assert_eq!(fields["url"], "http");
    assert_eq!(fields["output_headers"], json!(["etag"]));
    assert_eq!(fields["json_keys"], json!(["k"]));
}
