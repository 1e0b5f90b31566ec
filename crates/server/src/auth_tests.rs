// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};

use super::authorized;

fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(v) = HeaderValue::from_str(value) {
        headers.insert(AUTHORIZATION, v);
    }
    headers
}

#[test]
fn open_access_without_configured_token() {
    assert!(authorized(&HeaderMap::new(), None));
    assert!(authorized(&headers_with("Bearer anything"), None));
}

#[yare::parameterized(
    bearer = { "Bearer secret", true },
    bare = { "secret", true },
    wrong_bearer = { "Bearer nope", false },
    wrong_bare = { "nope", false },
    empty = { "", false },
    bearer_prefix_only = { "Bearer ", false },
    case_sensitive = { "bearer secret", false },
)]
fn checks_header_against_token(value: &str, expected: bool) {
    assert_eq!(authorized(&headers_with(value), Some("secret")), expected);
}

#[test]
fn missing_header_is_rejected_when_token_configured() {
    assert!(!authorized(&HeaderMap::new(), Some("secret")));
}
