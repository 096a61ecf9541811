// crates/scrape-warden-core/src/runtime/delta.rs
// ============================================================================
// Module: Scrape Warden Delta Signal Evaluator
// Description: Set difference between current and last-seen listing hashes.
// Purpose: Let dispatchers skip unchanged listings before spending budget.
// Dependencies: serde, std
// ============================================================================

//! ## Overview
//! The delta signal is a stateless pre-filter the dispatcher may run before
//! the enforcer: zero delta with a nonzero current count means "nothing new,
//! skip the expensive scrape", independent of and prior to budget
//! enforcement.
//!
//! An empty current read is never interpreted as "everything was deleted";
//! it means "nothing observed this cycle" and yields `changed = false`
//! unconditionally.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Delta Signal
// ============================================================================

/// Derived change signal between two listing hash sets.
///
/// # Invariants
/// - `changed` implies `delta_count > 0`.
/// - Counts refer to the normalized (trimmed, deduplicated) sets, not the
///   raw inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaSignal {
    /// Whether any listing hash is new relative to the last-seen set.
    pub changed: bool,
    /// Number of hashes present now but absent from the last-seen set.
    pub delta_count: usize,
    /// Size of the normalized current set.
    pub current_count: usize,
    /// Size of the normalized last-seen set.
    pub last_seen_count: usize,
}

// ============================================================================
// SECTION: Delta Evaluation
// ============================================================================

/// Computes the delta signal between current and last-seen listing hashes.
///
/// Inputs are normalized to trimmed, non-empty string sets; malformed
/// (whitespace-only) entries are dropped silently, matching the defensive
/// posture toward telemetry payloads.
#[must_use]
pub fn compute_delta_signal(current: &[String], last_seen: &[String]) -> DeltaSignal {
    let current = normalize(current);
    let last_seen = normalize(last_seen);

    if current.is_empty() {
        return DeltaSignal {
            changed: false,
            delta_count: 0,
            current_count: 0,
            last_seen_count: last_seen.len(),
        };
    }

    let delta_count = current.difference(&last_seen).count();
    DeltaSignal {
        changed: delta_count > 0,
        delta_count,
        current_count: current.len(),
        last_seen_count: last_seen.len(),
    }
}

/// Normalizes raw hash entries into a trimmed, deduplicated set.
fn normalize(hashes: &[String]) -> BTreeSet<String> {
    hashes
        .iter()
        .map(|hash| hash.trim())
        .filter(|hash| !hash.is_empty())
        .map(ToString::to_string)
        .collect()
}
