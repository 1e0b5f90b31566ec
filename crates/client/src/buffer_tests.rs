// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use proptest::prelude::*;

use super::*;

#[test]
fn empty_buffer() {
    let buf = OutputBuffer::new(16);
    assert_eq!(buf.as_str(), "");
    assert_eq!(buf.len_chars(), 0);
    assert_eq!(buf.total_appended(), 0);
}

#[test]
fn sequential_appends() {
    let mut buf = OutputBuffer::new(16);
    buf.append("hello");
    buf.append(" world");

    assert_eq!(buf.as_str(), "hello world");
    assert_eq!(buf.len_chars(), 11);
    assert_eq!(buf.total_appended(), 11);
}

#[test]
fn oldest_discarded_first() {
    let mut buf = OutputBuffer::new(8);
    buf.append("abcdef");
    buf.append("ghij");

    // total 10 chars, limit 8: "ab" is gone
    assert_eq!(buf.as_str(), "cdefghij");
    assert_eq!(buf.len_chars(), 8);
    assert_eq!(buf.total_appended(), 10);
}

#[test]
fn single_oversized_append() {
    let mut buf = OutputBuffer::new(4);
    buf.append("abcdefgh");
    assert_eq!(buf.as_str(), "efgh");
    assert_eq!(buf.total_appended(), 8);
}

#[test]
fn exact_limit_append() {
    let mut buf = OutputBuffer::new(4);
    buf.append("abcd");
    assert_eq!(buf.as_str(), "abcd");
    assert_eq!(buf.len_chars(), 4);
}

#[test]
fn truncation_lands_on_char_boundary() {
    let mut buf = OutputBuffer::new(3);
    buf.append("aé漢x");

    // 4 chars appended, limit 3: 'a' dropped, multi-byte chars intact
    assert_eq!(buf.as_str(), "é漢x");
    assert_eq!(buf.len_chars(), 3);
}

#[test]
fn survives_many_full_buffer_appends() {
    let mut buf = OutputBuffer::new(10);
    for i in 0..1000 {
        buf.append(&format!("{i:03}"));
    }
    assert_eq!(buf.len_chars(), 10);
    assert_eq!(buf.total_appended(), 3000);
    // trailing appends were "998" and "999"
    assert!(buf.as_str().ends_with("998999"));
}

#[test]
fn empty_append_is_noop() {
    let mut buf = OutputBuffer::new(8);
    buf.append("abc");
    buf.append("");
    assert_eq!(buf.as_str(), "abc");
    assert_eq!(buf.total_appended(), 3);
}

#[test]
fn zero_limit_retains_nothing() {
    let mut buf = OutputBuffer::new(0);
    buf.append("abc");
    assert_eq!(buf.as_str(), "");
    assert_eq!(buf.len_chars(), 0);
    assert_eq!(buf.total_appended(), 3);
}

proptest! {
    #[test]
    fn retains_exact_trailing_suffix(
        chunks in proptest::collection::vec(".{0,40}", 0..32),
        limit in 1usize..200,
    ) {
        let mut buf = OutputBuffer::new(limit);
        let mut all = String::new();
        for chunk in &chunks {
            buf.append(chunk);
            all.push_str(chunk);
        }

        let total = all.chars().count();
        let expected_chars = total.min(limit);
        prop_assert_eq!(buf.len_chars(), expected_chars);
        prop_assert_eq!(buf.total_appended(), total as u64);

        let skip = total - expected_chars;
        let suffix: String = all.chars().skip(skip).collect();
        prop_assert_eq!(buf.as_str(), suffix.as_str());
    }
}
