// crates/scrape-warden-core/tests/delta_signal.rs
// ============================================================================
// Module: Delta Signal Tests
// Description: Validate set-difference semantics for listing hash snapshots.
// Purpose: Ensure the pre-filter never misreads an empty read as deletions.
// ============================================================================

//! ## Overview
//! Covers the unchanged case, the empty-current special case, new-hash
//! detection, and input normalization.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use scrape_warden_core::compute_delta_signal;

fn hashes(raw: &[&str]) -> Vec<String> {
    raw.iter().map(ToString::to_string).collect()
}

#[test]
fn identical_sets_report_no_change() {
    let current = hashes(&["a1", "b2", "c3"]);
    let last_seen = hashes(&["c3", "a1", "b2"]);
    let signal = compute_delta_signal(&current, &last_seen);
    assert!(!signal.changed);
    assert_eq!(signal.delta_count, 0);
    assert_eq!(signal.current_count, 3);
    assert_eq!(signal.last_seen_count, 3);
}

#[test]
fn new_hash_flags_a_change() {
    let current = hashes(&["a1", "b2", "d4"]);
    let last_seen = hashes(&["a1", "b2", "c3"]);
    let signal = compute_delta_signal(&current, &last_seen);
    assert!(signal.changed);
    assert_eq!(signal.delta_count, 1);
}

#[test]
fn removed_hashes_alone_are_not_a_change() {
    // Listings disappearing without any new hash is a shrink, not a delta.
    let current = hashes(&["a1"]);
    let last_seen = hashes(&["a1", "b2", "c3"]);
    let signal = compute_delta_signal(&current, &last_seen);
    assert!(!signal.changed);
    assert_eq!(signal.delta_count, 0);
}

#[test]
fn empty_current_read_never_signals_change() {
    let current: Vec<String> = Vec::new();
    let last_seen = hashes(&["a1", "b2"]);
    let signal = compute_delta_signal(&current, &last_seen);
    assert!(!signal.changed);
    assert_eq!(signal.current_count, 0);
    assert_eq!(signal.last_seen_count, 2);
}

#[test]
fn whitespace_and_duplicates_are_normalized_away() {
    let current = hashes(&["  a1 ", "a1", "", "   ", "b2"]);
    let last_seen = hashes(&["a1"]);
    let signal = compute_delta_signal(&current, &last_seen);
    assert_eq!(signal.current_count, 2);
    assert!(signal.changed);
    assert_eq!(signal.delta_count, 1);
}

#[test]
fn first_observation_counts_every_hash_as_new() {
    let current = hashes(&["a1", "b2"]);
    let signal = compute_delta_signal(&current, &[]);
    assert!(signal.changed);
    assert_eq!(signal.delta_count, 2);
    assert_eq!(signal.last_seen_count, 0);
}
