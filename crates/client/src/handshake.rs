// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upgrade-request construction: endpoint validation and the bearer
//! credential header.
//!
//! Validation happens synchronously, before any socket exists; a string
//! that fails here never reaches the transport layer.

use std::fmt;

use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::{HeaderValue, Uri};

/// Why an upgrade request could not be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeError {
    /// The endpoint is not a valid `ws://` or `wss://` URI.
    InvalidUrl,
    /// The credential cannot be carried in an `Authorization` header.
    InvalidToken,
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => f.write_str("Invalid URL"),
            Self::InvalidToken => f.write_str("Invalid token"),
        }
    }
}

/// Build the WebSocket upgrade request for `url`.
///
/// A non-empty `token` is attached as `Authorization: Bearer <token>`.
pub fn build_request(url: &str, token: &str) -> Result<Request, HandshakeError> {
    let uri: Uri = url.parse().map_err(|_| HandshakeError::InvalidUrl)?;

    if !matches!(uri.scheme_str(), Some("ws") | Some("wss")) {
        return Err(HandshakeError::InvalidUrl);
    }
    if uri.host().is_none() {
        return Err(HandshakeError::InvalidUrl);
    }

    let mut request = uri.into_client_request().map_err(|_| HandshakeError::InvalidUrl)?;

    if !token.is_empty() {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| HandshakeError::InvalidToken)?;
        request.headers_mut().insert(AUTHORIZATION, value);
    }

    Ok(request)
}

#[cfg(test)]
#[path = "handshake_tests.rs"]
mod tests;
