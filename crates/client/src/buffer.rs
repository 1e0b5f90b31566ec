// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Bounded scrollback for received session output.
///
/// Retains at most `limit` characters; when an append pushes past the limit,
/// only the trailing `limit` characters survive. Tracks the total number of
/// characters ever appended so consumers can detect discarded history.
///
/// The retained content is the suffix `text[start..]` of a backing `String`.
/// Appends only advance `start`; the dead prefix is compacted away once it
/// outgrows the live suffix, so the per-character cost stays amortized O(1)
/// even when every append lands on a full buffer.
#[derive(Debug)]
pub struct OutputBuffer {
    text: String,
    start: usize,
    chars: usize,
    limit: usize,
    total_appended: u64,
}

/// Default retention limit in characters.
pub const DEFAULT_LIMIT: usize = 200_000;

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl OutputBuffer {
    /// Create a buffer retaining at most `limit` characters.
    pub fn new(limit: usize) -> Self {
        Self { text: String::new(), start: 0, chars: 0, limit, total_appended: 0 }
    }

    /// Append `chunk`, then drop the oldest characters past the limit.
    pub fn append(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }

        self.text.push_str(chunk);
        let added = chunk.chars().count();
        self.chars += added;
        self.total_appended += added as u64;

        if self.chars > self.limit {
            let excess = self.chars - self.limit;
            let mut cut = 0usize;
            for ch in self.text[self.start..].chars().take(excess) {
                cut += ch.len_utf8();
            }
            self.start += cut;
            self.chars = self.limit;
        }

        // Compact once the dead prefix outgrows the live suffix.
        if self.start > self.text.len() - self.start {
            self.text.drain(..self.start);
            self.start = 0;
        }
    }

    /// The retained content.
    pub fn as_str(&self) -> &str {
        &self.text[self.start..]
    }

    /// Number of characters currently retained.
    pub fn len_chars(&self) -> usize {
        self.chars
    }

    /// Total characters ever appended through this buffer.
    pub fn total_appended(&self) -> u64 {
        self.total_appended
    }

    /// The retention limit this buffer was created with.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
