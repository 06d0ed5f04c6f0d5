// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use yare::parameterized;

fn args(url: &str) -> RequestArgs {
    RequestArgs {
        url: url.to_string(),
        ..Default::default()
    }
}

#[parameterized(
    simple = { "Accept: text/html", "Accept", "text/html" },
    padded = { "  X-Id :  42 ", "X-Id", "42" },
    colon_in_value = { "Referer: https://a.example", "Referer", "https://a.example" },
    empty_value = { "X-Empty:", "X-Empty", "" },
)]
fn test_parse_header(raw: &str, name: &str, value: &str) {
    assert_eq!(
        parse_header(raw).unwrap(),
        (name.to_string(), value.to_string())
    );
}

#[parameterized(
    no_colon = { "Accept text/html" },
    no_name = { ": value" },
)]
fn test_parse_header_rejects(raw: &str) {
    assert!(matches!(parse_header(raw), Err(Error::InvalidHeader(_))));
}

#[test]
fn test_candidate_defaults() {
    let candidate = args("https://a.example").to_candidate(&Config::default()).unwrap();
    assert_eq!(candidate.url, "https://a.example");
    assert!(candidate.method.is_none());
    assert!(candidate.headers.is_empty());
    assert!(candidate.body.is_none());
}

#[test]
fn test_candidate_text_body() {
    let mut args = args("https://a.example");
    args.method = Some("post".to_string());
    args.data = Some("{\"not\": \"parsed\"}".to_string());
    let candidate = args.to_candidate(&Config::default()).unwrap();
    assert_eq!(candidate.method.as_deref(), Some("post"));
    assert_eq!(candidate.body, Some(json!("{\"not\": \"parsed\"}")));
}

#[test]
fn test_candidate_json_body() {
    let mut args = args("https://a.example");
    args.data = Some("{\"qty\": 2}".to_string());
    args.json_body = true;
    let candidate = args.to_candidate(&Config::default()).unwrap();
    assert_eq!(candidate.body, Some(json!({"qty": 2})));
}

#[test]
fn test_candidate_invalid_json_body() {
    let mut args = args("https://a.example");
    args.data = Some("{oops".to_string());
    args.json_body = true;
    let err = args.to_candidate(&Config::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidBody(_)));
}

#[test]
fn test_candidate_resolves_against_endpoint() {
    let config = Config::new(Some("https://api.example".to_string()));
    let candidate = args("/orders").to_candidate(&config).unwrap();
    assert_eq!(candidate.url, "https://api.example/orders");
}
