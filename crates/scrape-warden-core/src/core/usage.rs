// crates/scrape-warden-core/src/core/usage.rs
// ============================================================================
// Module: Scrape Warden Usage Telemetry
// Description: Usage snapshots, rolling counters, and telemetry increments.
// Purpose: Carry read-only usage inputs and computed counter deltas.
// Dependencies: serde, thiserror, crate::core::{identifiers, time}
// ============================================================================

//! ## Overview
//! The enforcement core never owns telemetry: the store hands it a read-only
//! [`UsageSnapshot`] (or [`RecentTelemetry`]) per evaluation, and the core
//! hands back a [`TelemetryIncrement`] the caller applies atomically.
//! Snapshots must pass completeness validation before they are trusted; a
//! snapshot with a non-finite field is rejected, not repaired.
//!
//! Increments are computed, never constructed by callers, so a caller cannot
//! record usage the cost model did not price.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::Marketplace;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// Rejection raised when a snapshot fails completeness validation.
///
/// # Invariants
/// - Variants are stable for programmatic handling; consumers map any
///   variant to the fail-closed (blocking) outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotInvalid {
    /// A floating-point field was NaN or infinite.
    #[error("non-finite numeric field: {field}")]
    NonFinite {
        /// Offending field name.
        field: &'static str,
    },
    /// A numeric field was negative where only zero-or-positive is valid.
    #[error("negative numeric field: {field}")]
    Negative {
        /// Offending field name.
        field: &'static str,
    },
    /// A required field was absent or empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// Offending field name.
        field: &'static str,
    },
    /// A timestamp field was zero or pre-epoch.
    #[error("invalid timestamp field: {field}")]
    InvalidTimestamp {
        /// Offending field name.
        field: &'static str,
    },
}

/// Checks that a floating-point field is finite and non-negative.
///
/// # Errors
///
/// Returns [`SnapshotInvalid`] naming the field on failure.
pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<(), SnapshotInvalid> {
    if !value.is_finite() {
        return Err(SnapshotInvalid::NonFinite { field });
    }
    if value < 0.0 {
        return Err(SnapshotInvalid::Negative { field });
    }
    Ok(())
}

// ============================================================================
// SECTION: Usage Snapshot
// ============================================================================

/// Read-only usage snapshot for one (user, marketplace) pair.
///
/// # Invariants
/// - Owned by the telemetry store; the engine receives a copy per evaluation
///   and never mutates it.
/// - Must pass [`UsageSnapshot::validate`] before being trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Jobs currently running for the user.
    pub running_jobs: u32,
    /// Runs started today (UTC day bucket).
    pub daily_runs: u32,
    /// Proxy gigabytes consumed today.
    pub proxy_gb_today: f64,
    /// Timestamp of the most recent run, if any.
    pub last_run_at: Option<Timestamp>,
    /// Marketplace the snapshot is scoped to.
    pub marketplace: Marketplace,
}

impl UsageSnapshot {
    /// Validates snapshot completeness.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotInvalid`] when a numeric field is non-finite or
    /// negative, or a present `last_run_at` is not a valid timestamp.
    pub fn validate(&self) -> Result<(), SnapshotInvalid> {
        require_finite("proxy_gb_today", self.proxy_gb_today)?;
        if let Some(last_run_at) = self.last_run_at
            && !last_run_at.is_valid()
        {
            return Err(SnapshotInvalid::InvalidTimestamp {
                field: "last_run_at",
            });
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Recent Telemetry
// ============================================================================

/// Rolling counters for one (user, marketplace, day) bucket.
///
/// # Invariants
/// - Counters are monotonic within a day bucket; the store applies
///   increments atomically (see [`crate::interfaces::TelemetryStore`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecentTelemetry {
    /// Signal checks executed today.
    pub signal_checks_today: u32,
    /// Partial fetches executed today.
    pub partial_fetches_today: u32,
    /// Full scrapes executed today.
    pub full_scrapes_today: u32,
    /// Proxy gigabytes consumed today.
    pub proxy_gb_today: f64,
    /// Estimated USD spend today.
    pub cost_usd_today: f64,
    /// Cooldown barrier: no action may run before this timestamp.
    pub cooldown_until: Option<Timestamp>,
}

impl RecentTelemetry {
    /// Validates telemetry completeness.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotInvalid`] when a numeric field is non-finite or
    /// negative.
    pub fn validate(&self) -> Result<(), SnapshotInvalid> {
        require_finite("proxy_gb_today", self.proxy_gb_today)?;
        require_finite("cost_usd_today", self.cost_usd_today)?;
        Ok(())
    }

    /// Total runs of any kind recorded today.
    #[must_use]
    pub const fn runs_today(&self) -> u32 {
        self.signal_checks_today
            .saturating_add(self.partial_fetches_today)
            .saturating_add(self.full_scrapes_today)
    }
}

// ============================================================================
// SECTION: Telemetry Increment
// ============================================================================

/// Counter delta to apply after a decision is executed.
///
/// # Invariants
/// - Computed by the engine from the cost model; callers cannot construct
///   one directly, so recorded usage always matches priced usage.
/// - Exactly one of the three count fields is 1; the others are 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryIncrement {
    /// Signal checks to add.
    pub signal_checks: u32,
    /// Partial fetches to add.
    pub partial_fetches: u32,
    /// Full scrapes to add.
    pub full_scrapes: u32,
    /// Estimated proxy gigabytes to add.
    pub proxy_gb_estimated: f64,
    /// Estimated USD cost to add.
    pub cost_usd_estimated: f64,
}

impl TelemetryIncrement {
    /// Crate-internal constructor; see [`crate::core::cost::CostModel::increment_for`].
    pub(crate) const fn new(
        signal_checks: u32,
        partial_fetches: u32,
        full_scrapes: u32,
        proxy_gb_estimated: f64,
        cost_usd_estimated: f64,
    ) -> Self {
        Self {
            signal_checks,
            partial_fetches,
            full_scrapes,
            proxy_gb_estimated,
            cost_usd_estimated,
        }
    }
}
