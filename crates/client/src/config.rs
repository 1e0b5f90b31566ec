// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;

use crate::buffer::DEFAULT_LIMIT;
use crate::session::DEFAULT_SERVER_URL;

/// Remote terminal client over a WebSocket.
#[derive(Debug, Parser)]
#[command(name = "wiresh", version, about)]
pub struct Config {
    /// WebSocket endpoint of the remote shell (e.g. ws://host:7070/ws).
    #[arg(env = "WIRESH_URL", default_value = DEFAULT_SERVER_URL)]
    pub url: String,

    /// Bearer credential attached to the connection handshake.
    #[arg(long, env = "WIRESH_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    /// Output retention limit in characters.
    #[arg(long, env = "WIRESH_SCROLLBACK", default_value_t = DEFAULT_LIMIT)]
    pub scrollback: usize,

    /// Log format (json or text).
    #[arg(long, env = "WIRESH_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "WIRESH_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Config {
    /// Build a minimal `Config` for tests.
    #[doc(hidden)]
    pub fn test() -> Self {
        Self {
            url: "ws://127.0.0.1:7070/ws".into(),
            token: String::new(),
            scrollback: 4096,
            log_format: "text".into(),
            log_level: "debug".into(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
