// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket relay: one shell per connection, raw byte passthrough.
//!
//! Text and binary frames are written to the PTY as-is; PTY output goes
//! back as binary frames. The only structure on the wire is the
//! `__RESIZE__` control message, which is consumed rather than forwarded.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tracing::debug;

use crate::auth;
use crate::shell;
use crate::ServerState;

/// `GET /ws`: authenticate, upgrade, and bridge the socket to a shell.
pub async fn ws_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    if !auth::authorized(&headers, state.config.auth_token.as_deref()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    ws.on_upgrade(move |socket| handle_socket(socket, state)).into_response()
}

async fn handle_socket(mut socket: WebSocket, state: Arc<ServerState>) {
    let shell_path = shell::resolve_shell(state.config.shell.as_deref());
    let spawned = shell::spawn_shell(
        &shell_path,
        &state.config.shell_args,
        state.config.cols,
        state.config.rows,
    );
    let (mut pty, mut output_rx) = match spawned {
        Ok(value) => value,
        Err(err) => {
            let _ = socket.send(Message::Text(format!("Failed to start shell: {err}").into())).await;
            return;
        }
    };

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => break,

            chunk = output_rx.recv() => {
                match chunk {
                    Some(bytes) => {
                        if ws_tx.send(Message::Binary(bytes.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break, // shell exited
                }
            }

            msg = ws_rx.next() => {
                let msg = match msg {
                    Some(Ok(m)) => m,
                    Some(Err(_)) | None => break,
                };
                match msg {
                    Message::Text(text) => {
                        if let Some(dims) = parse_resize(text.as_str()) {
                            if let Some((cols, rows)) = dims {
                                pty.resize(cols, rows);
                            }
                            continue;
                        }
                        if pty.send(text.as_str().as_bytes()).is_err() {
                            break;
                        }
                    }
                    Message::Binary(data) => {
                        if pty.send(&data).is_err() {
                            break;
                        }
                    }
                    Message::Ping(payload) => {
                        if ws_tx.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Message::Pong(_) => {}
                    Message::Close(_) => break,
                }
            }
        }
    }

    pty.shutdown();
    debug!("shell session closed");
}

/// Recognize a `__RESIZE__ <cols> <rows>` control frame.
///
/// Outer `Some` means the frame is a control message and must not reach
/// the shell; the inner value carries the dimensions when they parse.
pub fn parse_resize(text: &str) -> Option<Option<(u16, u16)>> {
    let rest = text.trim().strip_prefix("__RESIZE__")?;
    let mut parts = rest.split_whitespace();
    let cols = parts.next().and_then(|v| v.parse::<u16>().ok());
    let rows = parts.next().and_then(|v| v.parse::<u16>().ok());
    match (cols, rows) {
        (Some(cols), Some(rows)) => Some(Some((cols, rows))),
        _ => Some(None),
    }
}

#[cfg(test)]
#[path = "ws_tests.rs"]
mod tests;
