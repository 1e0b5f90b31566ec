// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: a scriptable mock remote and assertion
//! helpers.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::Message;

/// In-process WebSocket peer standing in for the remote host.
///
/// Accepts exactly one connection. Frames received from the client land on
/// `frames_rx`; frames pushed into `push_tx` are sent to the client.
/// Dropping `push_tx` makes the mock close the connection from its side.
pub struct MockRemote {
    pub addr: SocketAddr,
    /// Every frame the client sent, including the close frame.
    pub frames_rx: mpsc::UnboundedReceiver<Message>,
    /// Frames to deliver to the client.
    pub push_tx: mpsc::UnboundedSender<Message>,
    /// The `Authorization` header of the upgrade request, if any.
    pub authorization_rx: oneshot::Receiver<Option<String>>,
}

impl MockRemote {
    pub fn url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

/// Bind a mock remote on an ephemeral port and serve one connection.
pub async fn spawn_mock_remote() -> anyhow::Result<MockRemote> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let (frames_tx, frames_rx) = mpsc::unbounded_channel();
    let (push_tx, mut push_rx) = mpsc::unbounded_channel::<Message>();
    let (auth_tx, authorization_rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((stream, _peer)) = listener.accept().await else {
            return;
        };

        let capture_auth = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            let auth = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_owned());
            let _ = auth_tx.send(auth);
            Ok(resp)
        };

        let Ok(ws_stream) = tokio_tungstenite::accept_hdr_async(stream, capture_auth).await else {
            return;
        };
        let (mut ws_tx, mut ws_rx) = ws_stream.split();

        loop {
            tokio::select! {
                outgoing = push_rx.recv() => {
                    match outgoing {
                        Some(msg) => {
                            if ws_tx.send(msg).await.is_err() {
                                break;
                            }
                        }
                        None => {
                            let _ = ws_tx.send(Message::Close(None)).await;
                            break;
                        }
                    }
                }
                incoming = ws_rx.next() => {
                    match incoming {
                        Some(Ok(msg)) => {
                            let is_close = matches!(msg, Message::Close(_));
                            let _ = frames_tx.send(msg);
                            if is_close {
                                break;
                            }
                        }
                        Some(Err(_)) | None => break,
                    }
                }
            }
        }
    });

    Ok(MockRemote { addr, frames_rx, push_tx, authorization_rx })
}

/// Poll `cond` every few milliseconds until it holds or `timeout` elapses.
pub async fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}

/// Convert any displayable error into `anyhow::Error` (tests return
/// `anyhow::Result` under the no-unwrap lint).
pub trait AnyhowExt<T> {
    fn anyhow(self) -> anyhow::Result<T>;
}

impl<T, E: std::fmt::Display> AnyhowExt<T> for Result<T, E> {
    fn anyhow(self) -> anyhow::Result<T> {
        self.map_err(|e| anyhow::anyhow!("{e}"))
    }
}
