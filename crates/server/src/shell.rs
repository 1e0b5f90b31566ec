// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PTY-backed shell child for one connection.
//!
//! A blocking reader thread pumps PTY output into an unbounded channel so
//! the async relay loop never blocks on the PTY fd.

use std::io::{Read, Write};
use std::path::Path;
use std::thread;

use anyhow::{Context, Result};
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use tokio::sync::mpsc;
use tracing::debug;

pub struct ShellPty {
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send>,
    _reader_thread: thread::JoinHandle<()>,
}

impl ShellPty {
    /// Write input bytes to the shell.
    pub fn send(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data).context("write to pty")?;
        self.writer.flush().context("flush pty writer")?;
        Ok(())
    }

    /// Resize the PTY. Best-effort; a failed ioctl is not fatal.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let _ = self.master.resize(PtySize { rows, cols, pixel_width: 0, pixel_height: 0 });
    }

    /// Kill the shell and reap it.
    pub fn shutdown(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Spawn `shell` with `args` on a new PTY.
///
/// Returns the PTY handle and the channel carrying shell output. The
/// channel closes when the shell exits or the PTY read fails.
pub fn spawn_shell(
    shell: &str,
    args: &[String],
    cols: u16,
    rows: u16,
) -> Result<(ShellPty, mpsc::UnboundedReceiver<Vec<u8>>)> {
    let pty_system = native_pty_system();
    let pair = pty_system
        .openpty(PtySize { rows, cols, pixel_width: 0, pixel_height: 0 })
        .context("open pty")?;

    let mut cmd = CommandBuilder::new(shell);
    cmd.args(args);
    let child = pair.slave.spawn_command(cmd).context("spawn shell")?;

    let mut reader = pair.master.try_clone_reader().context("pty reader")?;
    let writer = pair.master.take_writer().context("pty writer")?;
    let (tx, rx) = mpsc::unbounded_channel::<Vec<u8>>();

    let reader_thread = thread::spawn(move || {
        let mut buf = [0_u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
        debug!("pty reader thread exiting");
    });

    Ok((
        ShellPty { master: pair.master, writer, child, _reader_thread: reader_thread },
        rx,
    ))
}

/// Pick the shell to spawn: configured value, else the first common shell
/// path that exists, else plain `bash` resolved via PATH.
pub fn resolve_shell(configured: Option<&str>) -> String {
    if let Some(shell) = configured {
        return shell.to_owned();
    }
    let candidates = ["/bin/bash", "/usr/bin/bash", "/bin/sh", "/usr/bin/sh"];
    for path in candidates {
        if Path::new(path).exists() {
            return path.to_owned();
        }
    }
    "bash".to_owned()
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
