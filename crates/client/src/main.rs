// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin line-oriented front-end: bridges stdin lines into the session and
//! session output onto stdout. All terminal state lives in the session
//! core; this binary only observes published fields and calls the public
//! operations.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast;

use wiresh::config::Config;
use wiresh::event::SessionEvent;
use wiresh::session::Session;

#[tokio::main]
async fn main() {
    let config = Config::parse();
    init_tracing(&config);
    std::process::exit(run(config).await);
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    match config.log_format.as_str() {
        "json" => {
            fmt::fmt().with_env_filter(filter).json().init();
        }
        _ => {
            fmt::fmt().with_env_filter(filter).init();
        }
    }
}

async fn run(config: Config) -> i32 {
    let session = Session::with_limit(config.scrollback);
    session.set_server_url(&config.url);
    session.set_token(&config.token);

    let mut events = session.subscribe();
    session.connect();

    // URL validation failures surface synchronously.
    if session.phase() == wiresh::session::Phase::Disconnected {
        eprintln!("error: {}", session.status());
        return 2;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut stdin_done = false;

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(SessionEvent::Output(chunk)) => {
                        if stdout.write_all(chunk.as_bytes()).await.is_err() {
                            session.disconnect();
                            return 1;
                        }
                        let _ = stdout.flush().await;
                    }
                    Ok(SessionEvent::Transition { connected, status }) => {
                        eprintln!("wiresh: {status}");
                        if !connected && status != "Connecting" {
                            // Terminal exit: either a failure or our own
                            // disconnect finished.
                            return i32::from(status != "Disconnected");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return 1,
                }
            }
            line = lines.next_line(), if !stdin_done => {
                match line {
                    Ok(Some(line)) => {
                        session.set_input(&line);
                        session.send_line();
                    }
                    Ok(None) | Err(_) => {
                        // EOF: terminate and let the Disconnected
                        // transition above end the loop.
                        stdin_done = true;
                        session.disconnect();
                    }
                }
            }
        }
    }
}
