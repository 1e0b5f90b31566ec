// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;

/// Configuration for the wireshd server.
#[derive(Debug, Clone, Parser)]
#[command(name = "wireshd", version, about)]
pub struct Config {
    /// Host address to bind to.
    #[arg(long, env = "WIRESHD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "WIRESHD_PORT", default_value_t = 7070)]
    pub port: u16,

    /// Bearer token required on the upgrade request. Unset disables auth.
    #[arg(long, env = "WIRESHD_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Shell to spawn for each connection (default: probe common paths).
    #[arg(long, env = "WIRESHD_SHELL")]
    pub shell: Option<String>,

    /// Arguments passed to the shell.
    #[arg(
        long = "shell-arg",
        env = "WIRESHD_SHELL_ARGS",
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_value = "-i"
    )]
    pub shell_args: Vec<String>,

    /// Initial terminal columns.
    #[arg(long, env = "WIRESHD_COLS", default_value_t = 80)]
    pub cols: u16,

    /// Initial terminal rows.
    #[arg(long, env = "WIRESHD_ROWS", default_value_t = 24)]
    pub rows: u16,

    /// Log format (json or text).
    #[arg(long, env = "WIRESHD_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "WIRESHD_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Build a minimal `Config` for tests: ephemeral port, `cat` as the
    /// shell so output mirrors input without an interactive prompt.
    #[doc(hidden)]
    pub fn test() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            auth_token: None,
            shell: Some("cat".into()),
            shell_args: Vec::new(),
            cols: 80,
            rows: 24,
            log_format: "text".into(),
            log_level: "debug".into(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
