// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bearer-token check for the upgrade request.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

/// Check the `Authorization` header against the configured token.
///
/// No configured token means open access. Both `Bearer <token>` and the
/// bare token value are accepted.
pub fn authorized(headers: &HeaderMap, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    let Some(value) = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) else {
        return false;
    };
    match value.strip_prefix("Bearer ") {
        Some(bearer) => bearer == expected,
        None => value == expected,
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
