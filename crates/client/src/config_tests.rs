// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;

use super::Config;
use crate::buffer::DEFAULT_LIMIT;
use crate::session::DEFAULT_SERVER_URL;

#[test]
fn defaults() -> anyhow::Result<()> {
    let config = Config::try_parse_from(["wiresh"])?;
    assert_eq!(config.url, DEFAULT_SERVER_URL);
    assert_eq!(config.token, "");
    assert_eq!(config.scrollback, DEFAULT_LIMIT);
    assert_eq!(config.log_format, "text");
    assert_eq!(config.log_level, "warn");
    Ok(())
}

#[test]
fn positional_url_and_flags() -> anyhow::Result<()> {
    let config = Config::try_parse_from([
        "wiresh",
        "ws://host:7070/ws",
        "--token",
        "secret",
        "--scrollback",
        "1000",
    ])?;
    assert_eq!(config.url, "ws://host:7070/ws");
    assert_eq!(config.token, "secret");
    assert_eq!(config.scrollback, 1000);
    Ok(())
}

#[test]
fn test_config_is_small() {
    let config = Config::test();
    assert!(config.scrollback < DEFAULT_LIMIT);
}
