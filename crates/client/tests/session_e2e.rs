// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Full-stack tests: the session core driving a real in-process wireshd.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use wiresh::session::{Phase, Session};
use wiresh::test_support::wait_for;
use wireshd::config::Config;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn connect_send_receive_terminate() -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let addr = wireshd::spawn(Config::test(), shutdown.clone()).await?;

    let session = Session::new();
    session.set_server_url(&format!("ws://{addr}/ws"));
    session.connect();

    let connected = wait_for(RECV_TIMEOUT, || session.connected()).await;
    assert!(connected, "status: {}", session.status());
    assert_eq!(session.status(), "Connected");

    session.set_input("help");
    session.send_line();
    assert_eq!(session.input(), "");

    // `cat` (plus the PTY echo) sends the line straight back.
    let echoed = wait_for(RECV_TIMEOUT, || session.output().contains("help")).await;
    assert!(echoed, "output: {:?}", session.output());

    session.disconnect();
    assert_eq!(session.phase(), Phase::Disconnected);
    assert_eq!(session.status(), "Disconnected");

    // A further submit produces no frame and no state change.
    session.set_input("dead letter");
    session.send_line();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(session.status(), "Disconnected");
    assert!(!session.output().contains("dead letter"));

    shutdown.cancel();
    Ok(())
}

#[tokio::test]
async fn bearer_credential_grants_access() -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let mut config = Config::test();
    config.auth_token = Some("letmein".to_owned());
    let addr = wireshd::spawn(config, shutdown.clone()).await?;

    let session = Session::new();
    session.set_server_url(&format!("ws://{addr}/ws"));
    session.set_token("letmein");
    session.connect();

    let connected = wait_for(RECV_TIMEOUT, || session.connected()).await;
    assert!(connected, "status: {}", session.status());

    session.disconnect();
    shutdown.cancel();
    Ok(())
}

#[tokio::test]
async fn rejected_credential_fails_the_session() -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let mut config = Config::test();
    config.auth_token = Some("letmein".to_owned());
    let addr = wireshd::spawn(config, shutdown.clone()).await?;

    let session = Session::new();
    session.set_server_url(&format!("ws://{addr}/ws"));
    session.set_token("wrong");
    session.connect();

    let failed = wait_for(RECV_TIMEOUT, || {
        session.phase() == Phase::Disconnected && session.status() != "Disconnected"
    })
    .await;
    assert!(failed, "status: {}", session.status());
    assert!(session.status().starts_with("Receive error:"), "status: {}", session.status());

    shutdown.cancel();
    Ok(())
}

#[tokio::test]
async fn reconnect_appends_to_the_same_buffer() -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let addr = wireshd::spawn(Config::test(), shutdown.clone()).await?;

    let session = Session::new();
    session.set_server_url(&format!("ws://{addr}/ws"));

    session.connect();
    assert!(wait_for(RECV_TIMEOUT, || session.connected()).await);
    session.set_input("one");
    session.send_line();
    assert!(wait_for(RECV_TIMEOUT, || session.output().contains("one")).await);
    session.disconnect();

    let before = session.output();

    session.toggle_connection();
    assert!(wait_for(RECV_TIMEOUT, || session.connected()).await);
    session.set_input("two");
    session.send_line();
    assert!(wait_for(RECV_TIMEOUT, || session.output().contains("two")).await);

    // Scrollback persists across reconnects within the process.
    assert!(session.output().starts_with(&before));

    session.disconnect();
    shutdown.cancel();
    Ok(())
}
