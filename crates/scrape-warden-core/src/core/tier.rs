// crates/scrape-warden-core/src/core/tier.rs
// ============================================================================
// Module: Scrape Warden Tiers and Entitlements
// Description: Tenant tier keys and frozen entitlement snapshots.
// Purpose: Map tiers to deterministic quota snapshots for enforcement.
// Dependencies: serde, thiserror, crate::core::usage
// ============================================================================

//! ## Overview
//! Tiers drive every quota lookup in the engine. `EntitlementsSnapshot` is a
//! frozen, deterministic projection of the static tier table: the same tier
//! always yields a structurally identical snapshot, which keeps decisions
//! replayable. Snapshots must pass completeness validation before any
//! decision logic consumes them; an incomplete snapshot is a hard rejection,
//! never a best-effort default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::usage::SnapshotInvalid;
use crate::core::usage::require_finite;

// ============================================================================
// SECTION: Entitlements Version
// ============================================================================

/// Version tag stamped on every entitlements snapshot.
///
/// Bumped whenever the static tier table changes, so audit rows can be
/// correlated with the quota schedule that produced them.
pub const ENTITLEMENTS_VERSION: &str = "2026-07";

// ============================================================================
// SECTION: Tier Keys
// ============================================================================

/// Tenant service tier.
///
/// # Invariants
/// - Variants are stable for serialization and quota lookup.
/// - Unknown tier strings never enter the engine; they fail at
///   [`TierKey::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierKey {
    /// Free tier.
    Free,
    /// Basic paid tier.
    Basic,
    /// Pro tier.
    Pro,
    /// Elite tier.
    Elite,
    /// Enterprise tier.
    Enterprise,
}

impl TierKey {
    /// All tiers, cheapest first.
    pub const ALL: [Self; 5] = [Self::Free, Self::Basic, Self::Pro, Self::Elite, Self::Enterprise];

    /// Returns the stable wire key for the tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Pro => "pro",
            Self::Elite => "elite",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for TierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown tier key.
///
/// # Invariants
/// - Carries the offending key verbatim for caller diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tier key: {key}")]
pub struct TierParseError {
    /// The unrecognized key.
    pub key: String,
}

impl FromStr for TierKey {
    type Err = TierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "basic" => Ok(Self::Basic),
            "pro" => Ok(Self::Pro),
            "elite" => Ok(Self::Elite),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(TierParseError {
                key: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// SECTION: Entitlements Snapshot
// ============================================================================

/// Frozen entitlements for a tier.
///
/// # Invariants
/// - Derived deterministically from [`TierKey`]; never mutated. A tier change
///   replaces the whole snapshot.
/// - Must pass [`EntitlementsSnapshot::validate`] before being trusted by any
///   decision function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitlementsSnapshot {
    /// Tier that produced this snapshot.
    pub tier: TierKey,
    /// Maximum concurrently running jobs per user.
    pub max_concurrency_user: u32,
    /// Maximum configured monitors.
    pub max_monitors: u32,
    /// Maximum boosted (priority-refresh) monitors.
    pub max_boosted_monitors: u32,
    /// Minimum seconds between consecutive runs for one monitor.
    pub refresh_interval_floor_seconds: u64,
    /// Maximum scraper runs per day.
    pub max_daily_runs: u32,
    /// Maximum proxy bandwidth per day, in gigabytes.
    pub max_proxy_gb_per_day: f64,
    /// Version of the entitlements schedule that produced this snapshot.
    pub entitlements_version: String,
}

impl EntitlementsSnapshot {
    /// Resolves the frozen entitlements for a tier.
    ///
    /// Pure table lookup: the same tier always yields a structurally
    /// identical snapshot.
    #[must_use]
    pub fn for_tier(tier: TierKey) -> Self {
        let (concurrency, monitors, boosted, floor_seconds, daily_runs, proxy_gb) = match tier {
            TierKey::Free => (1, 3, 0, 3600, 8, 0.5),
            TierKey::Basic => (2, 10, 1, 900, 40, 2.0),
            TierKey::Pro => (4, 30, 5, 300, 160, 8.0),
            TierKey::Elite => (8, 75, 15, 120, 480, 24.0),
            TierKey::Enterprise => (16, 200, 50, 60, 1500, 80.0),
        };
        Self {
            tier,
            max_concurrency_user: concurrency,
            max_monitors: monitors,
            max_boosted_monitors: boosted,
            refresh_interval_floor_seconds: floor_seconds,
            max_daily_runs: daily_runs,
            max_proxy_gb_per_day: proxy_gb,
            entitlements_version: ENTITLEMENTS_VERSION.to_string(),
        }
    }

    /// Validates snapshot completeness.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotInvalid`] when any numeric field is non-finite or
    /// negative, or the version tag is empty. Callers must treat a failed
    /// validation as a blocking outcome.
    pub fn validate(&self) -> Result<(), SnapshotInvalid> {
        require_finite("max_proxy_gb_per_day", self.max_proxy_gb_per_day)?;
        if self.entitlements_version.is_empty() {
            return Err(SnapshotInvalid::MissingField {
                field: "entitlements_version",
            });
        }
        Ok(())
    }
}
