// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session connection: lifecycle state machine, send/receive protocol, and
//! the published fields the presentation layer observes.
//!
//! One connection task exists per `connect()`. Every completion that can
//! arrive late (handshake result, read error, send error) is stamped with
//! the generation that spawned it and dropped if a newer generation has
//! taken over, so callbacks from a superseded socket never mutate live
//! state. Field mutations are serialized through a single mutex that is
//! never held across an await.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::buffer::{OutputBuffer, DEFAULT_LIMIT};
use crate::event::SessionEvent;
use crate::handshake;

/// Default endpoint shown to the user before they edit it.
pub const DEFAULT_SERVER_URL: &str = "ws://HOST:7070/ws";

/// Connection lifecycle phase.
///
/// Failure exits carry no distinct phase; they collapse to `Disconnected`
/// with an explanatory status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    Connecting,
    Connected,
}

/// Handle to the active socket: the outbound line queue and the token that
/// cancels the connection task. Dropping the sender or cancelling the token
/// ends the task; exactly one `Link` exists while connecting or connected.
struct Link {
    outbound_tx: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
}

struct State {
    server_url: String,
    token: String,
    input: String,
    phase: Phase,
    status: String,
    output: OutputBuffer,
    generation: u64,
    link: Option<Link>,
}

struct Inner {
    state: Mutex<State>,
    events_tx: broadcast::Sender<SessionEvent>,
}

/// One terminal session: owns the socket lifecycle and the output buffer.
///
/// Clones share the same session. All operations are callable from any
/// task; `connect()` must be called within a tokio runtime because it
/// spawns the connection task.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }

    /// Create a session whose output buffer retains `limit` characters.
    pub fn with_limit(limit: usize) -> Self {
        let (events_tx, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    server_url: DEFAULT_SERVER_URL.to_owned(),
                    token: String::new(),
                    input: String::new(),
                    phase: Phase::Disconnected,
                    status: "Disconnected".to_owned(),
                    output: OutputBuffer::new(limit),
                    generation: 0,
                    link: None,
                }),
                events_tx,
            }),
        }
    }

    // -- Published fields ---------------------------------------------------

    /// Snapshot of the retained output.
    pub fn output(&self) -> String {
        self.inner.state.lock().output.as_str().to_owned()
    }

    pub fn input(&self) -> String {
        self.inner.state.lock().input.clone()
    }

    pub fn server_url(&self) -> String {
        self.inner.state.lock().server_url.clone()
    }

    pub fn token(&self) -> String {
        self.inner.state.lock().token.clone()
    }

    pub fn connected(&self) -> bool {
        self.inner.state.lock().phase == Phase::Connected
    }

    pub fn phase(&self) -> Phase {
        self.inner.state.lock().phase
    }

    pub fn status(&self) -> String {
        self.inner.state.lock().status.clone()
    }

    /// Subscribe to change events. Sends are best-effort; a lagging
    /// receiver misses events, it does not block the session.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events_tx.subscribe()
    }

    // -- User-editable fields -----------------------------------------------

    pub fn set_input(&self, text: &str) {
        self.inner.state.lock().input = text.to_owned();
    }

    pub fn set_server_url(&self, url: &str) {
        self.inner.state.lock().server_url = url.to_owned();
    }

    pub fn set_token(&self, token: &str) {
        self.inner.state.lock().token = token.to_owned();
    }

    // -- Operations ---------------------------------------------------------

    /// Initiate if disconnected, terminate otherwise.
    pub fn toggle_connection(&self) {
        let disconnected = { self.inner.state.lock().phase == Phase::Disconnected };
        if disconnected {
            self.connect();
        } else {
            self.disconnect();
        }
    }

    /// Initiate a connection to the configured endpoint.
    ///
    /// Validates the URL synchronously: on failure the transition is
    /// refused, no socket is created, and the status reports the problem.
    /// On success a connection task is spawned; the outcome is observed
    /// via `connected`/`status`.
    pub fn connect(&self) {
        let (generation, request, outbound_rx, cancel) = {
            let mut st = self.inner.state.lock();
            if st.phase != Phase::Disconnected {
                return;
            }

            let request = match handshake::build_request(&st.server_url, &st.token) {
                Ok(request) => request,
                Err(err) => {
                    st.status = err.to_string();
                    self.publish_transition(&st);
                    return;
                }
            };

            st.generation += 1;
            let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
            let cancel = CancellationToken::new();
            st.link = Some(Link { outbound_tx, cancel: cancel.clone() });
            st.phase = Phase::Connecting;
            st.status = "Connecting".to_owned();
            self.publish_transition(&st);
            (st.generation, request, outbound_rx, cancel)
        };

        let session = self.clone();
        tokio::spawn(async move {
            session.run_link(generation, request, outbound_rx, cancel).await;
        });
    }

    /// Terminate the connection, closing the socket with a "going away"
    /// close code. Always safe to call; terminating an already-disconnected
    /// session is a no-op beyond refreshing the status message.
    pub fn disconnect(&self) {
        let mut st = self.inner.state.lock();
        if let Some(link) = st.link.take() {
            link.cancel.cancel();
        }
        // Invalidate in-flight callbacks from the old connection task.
        st.generation += 1;
        st.phase = Phase::Disconnected;
        st.status = "Disconnected".to_owned();
        self.publish_transition(&st);
    }

    /// Submit the pending input as one line: append the terminator, clear
    /// the field, forward to the send primitive.
    pub fn send_line(&self) {
        let line = {
            let mut st = self.inner.state.lock();
            let mut line = std::mem::take(&mut st.input);
            line.push('\n');
            line
        };
        self.send(line);
    }

    /// Outbound send primitive.
    ///
    /// Dropped silently unless connected: a send racing a just-completed
    /// disconnect (or issued before the handshake finishes) loses that one
    /// line rather than faulting. This at-most-once policy is deliberate.
    pub fn send(&self, text: String) {
        let st = self.inner.state.lock();
        if st.phase != Phase::Connected {
            debug!(len = text.len(), "dropping send while not connected");
            return;
        }
        if let Some(ref link) = st.link {
            // Receiver gone means the task already took a failure exit.
            let _ = link.outbound_tx.send(text);
        }
    }

    // -- Connection task ----------------------------------------------------

    async fn run_link(
        self,
        generation: u64,
        request: Request,
        mut outbound_rx: mpsc::UnboundedReceiver<String>,
        cancel: CancellationToken,
    ) {
        let connect = tokio::select! {
            _ = cancel.cancelled() => return,
            result = tokio_tungstenite::connect_async(request) => result,
        };

        let ws_stream = match connect {
            Ok((stream, _response)) => stream,
            Err(e) => {
                self.fail(generation, format!("Receive error: {e}"));
                return;
            }
        };

        if !self.mark_connected(generation) {
            // Superseded while the handshake was in flight.
            let mut ws_stream = ws_stream;
            let _ = ws_stream.close(Some(close_going_away())).await;
            return;
        }

        let (mut ws_tx, mut ws_rx) = ws_stream.split();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = ws_tx.send(Message::Close(Some(close_going_away()))).await;
                    return;
                }
                line = outbound_rx.recv() => {
                    let Some(line) = line else {
                        // Link dropped by terminate; close gracefully.
                        let _ = ws_tx.send(Message::Close(Some(close_going_away()))).await;
                        return;
                    };
                    if let Err(e) = ws_tx.send(Message::Text(line.into())).await {
                        self.fail(generation, format!("Send error: {e}"));
                        return;
                    }
                }
                frame = ws_rx.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            self.append_output(generation, text.as_str());
                        }
                        Some(Ok(Message::Binary(data))) => {
                            // Best-effort decode; malformed sequences become
                            // replacement characters, never an error.
                            let text = String::from_utf8_lossy(&data);
                            self.append_output(generation, &text);
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            // Remote close, clean or not, ends the session.
                            self.fail(generation, "Receive error: connection closed".to_owned());
                            return;
                        }
                        Some(Ok(_)) => {} // ping/pong handled by the transport
                        Some(Err(e)) => {
                            self.fail(generation, format!("Receive error: {e}"));
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Move to `Connected` unless this generation has been superseded.
    fn mark_connected(&self, generation: u64) -> bool {
        let mut st = self.inner.state.lock();
        if st.generation != generation || st.link.is_none() {
            return false;
        }
        st.phase = Phase::Connected;
        st.status = "Connected".to_owned();
        self.publish_transition(&st);
        true
    }

    /// Failure exit for the stamped generation; late callbacks from a
    /// superseded socket are no-ops.
    fn fail(&self, generation: u64, status: String) {
        let mut st = self.inner.state.lock();
        if st.generation != generation {
            debug!(generation, "ignoring failure from superseded connection");
            return;
        }
        st.link = None;
        st.phase = Phase::Disconnected;
        st.status = status;
        self.publish_transition(&st);
    }

    /// Append received text to the output buffer (generation-guarded).
    fn append_output(&self, generation: u64, text: &str) {
        let mut st = self.inner.state.lock();
        if st.generation != generation {
            return;
        }
        st.output.append(text);
        let _ = self.inner.events_tx.send(SessionEvent::Output(text.to_owned()));
    }

    fn publish_transition(&self, st: &State) {
        let _ = self.inner.events_tx.send(SessionEvent::Transition {
            connected: st.phase == Phase::Connected,
            status: st.status.clone(),
        });
    }
}

fn close_going_away() -> CloseFrame {
    CloseFrame { code: CloseCode::Away, reason: "".into() }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
