// crates/scrape-warden-core/src/core/action.rs
// ============================================================================
// Module: Scrape Warden Action Ladder
// Description: Scrape action kinds and the public enforcement mode.
// Purpose: Define the ordered quality ladder that degrading walks down.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Scrape actions form an ordered quality ladder: a full scrape renders the
//! listing pages, a partial fetch pulls summaries only, and a signal check
//! merely probes for change. Budget enforcement only ever moves down this
//! ladder; there is no upgrade path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Action Kinds
// ============================================================================

/// Scrape action kind, ordered cheapest-first.
///
/// # Invariants
/// - Derived `Ord` encodes the quality ladder:
///   `SignalCheck < PartialFetch < FullScrape`.
/// - Variants are stable for serialization and cost-table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Cheap change probe; no listing content is fetched.
    SignalCheck,
    /// Summary-only fetch of listing data.
    PartialFetch,
    /// Full-fidelity scrape with page rendering.
    FullScrape,
}

impl ActionKind {
    /// Steps one rung down the quality ladder.
    ///
    /// Returns `None` below [`ActionKind::SignalCheck`]; there is nothing
    /// cheaper to degrade to.
    #[must_use]
    pub const fn downgrade(self) -> Option<Self> {
        match self {
            Self::FullScrape => Some(Self::PartialFetch),
            Self::PartialFetch => Some(Self::SignalCheck),
            Self::SignalCheck => None,
        }
    }

    /// Returns the stable wire key for the action kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignalCheck => "signal_check",
            Self::PartialFetch => "partial_fetch",
            Self::FullScrape => "full_scrape",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Enforcement Mode
// ============================================================================

/// Public mode value consumed by dispatchers.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnforcementMode {
    /// Run the full scrape.
    Full,
    /// Run the partial fetch variant.
    Partial,
    /// Run the signal check only.
    Signal,
    /// Do not run anything.
    Block,
}

impl From<ActionKind> for EnforcementMode {
    fn from(action: ActionKind) -> Self {
        match action {
            ActionKind::FullScrape => Self::Full,
            ActionKind::PartialFetch => Self::Partial,
            ActionKind::SignalCheck => Self::Signal,
        }
    }
}

impl fmt::Display for EnforcementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Full => "FULL",
            Self::Partial => "PARTIAL",
            Self::Signal => "SIGNAL",
            Self::Block => "BLOCK",
        };
        f.write_str(label)
    }
}
