// crates/scrape-warden-core/src/core/time.rs
// ============================================================================
// Module: Scrape Warden Time Model
// Description: Canonical timestamp representation for enforcement inputs.
// Purpose: Provide deterministic, replayable time values across decision records.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Scrape Warden uses explicit time values supplied by callers to keep
//! decisions deterministic and replayable. The engine never reads wall-clock
//! time; hosts materialize `now` at their composition root and pass it in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Timestamps
// ============================================================================

/// Canonical timestamp: unix epoch milliseconds.
///
/// # Invariants
/// - Values are explicitly provided by callers; the engine never reads
///   wall-clock time.
/// - Arithmetic helpers saturate instead of wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Returns whole seconds elapsed from `earlier` to `self` (saturating,
    /// never negative).
    #[must_use]
    pub const fn seconds_since(self, earlier: Self) -> u64 {
        let delta = self.0.saturating_sub(earlier.0);
        if delta <= 0 { 0 } else { (delta / 1000) as u64 }
    }

    /// Returns the timestamp advanced by `seconds` (saturating).
    #[must_use]
    pub const fn plus_seconds(self, seconds: u64) -> Self {
        Self(self.0.saturating_add((seconds as i64).saturating_mul(1000)))
    }

    /// Reports whether the timestamp is plausibly valid (strictly after the
    /// unix epoch). Zero and negative values indicate an unpopulated field.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
