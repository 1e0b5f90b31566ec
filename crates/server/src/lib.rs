// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wireshd: WebSocket shell server. Each connection gets its own PTY-backed
//! shell; frames are relayed raw in both directions.

pub mod auth;
pub mod config;
pub mod shell;
pub mod ws;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Shared server state.
pub struct ServerState {
    pub config: Config,
    pub shutdown: CancellationToken,
}

pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new().route("/ws", get(ws::ws_handler)).with_state(state)
}

/// Bind the configured address and serve until `shutdown` is cancelled.
pub async fn run(config: Config, shutdown: CancellationToken) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    serve(listener, config, shutdown).await
}

/// Bind and serve in a background task, returning the bound address.
///
/// Used by integration tests (port 0) and embedders.
pub async fn spawn(config: Config, shutdown: CancellationToken) -> anyhow::Result<SocketAddr> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    let local = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = serve(listener, config, shutdown).await {
            tracing::error!("server error: {e:#}");
        }
    });
    Ok(local)
}

async fn serve(
    listener: TcpListener,
    config: Config,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    if config.auth_token.is_none() {
        tracing::warn!("auth token is not set; accepting all connections");
    }
    let local = listener.local_addr()?;
    tracing::info!("wireshd listening on ws://{local}/ws");

    let state = Arc::new(ServerState { config, shutdown: shutdown.clone() });
    let router = build_router(state);
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;
    Ok(())
}
