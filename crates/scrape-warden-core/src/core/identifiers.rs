// crates/scrape-warden-core/src/core/identifiers.rs
// ============================================================================
// Module: Scrape Warden Identifiers
// Description: Canonical identifiers for tenants, jobs, marketplaces, and days.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! This module defines the canonical identifiers used throughout Scrape
//! Warden. Identifiers serialize as numbers or strings on the wire. Numeric
//! identifiers enforce non-zero, 1-based invariants at construction
//! boundaries; marketplace keys are a closed enum so that an unknown key is
//! rejected at the parse boundary instead of flowing into decision logic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Tenant and Job Identifiers
// ============================================================================

/// Tenant (end user) identifier scoped to enforcement decisions.
///
/// # Invariants
/// - Always >= 1 (non-zero, 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(NonZeroU64);

impl UserId {
    /// Creates a new user identifier from a non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    /// Creates a user identifier from a raw value (returns `None` if zero).
    #[must_use]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the raw identifier value (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}

/// Scrape job identifier.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Creates a new job identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Marketplace Keys
// ============================================================================

/// Supported marketplace keys.
///
/// # Invariants
/// - Variants are stable for serialization and cost-table lookup.
/// - Unknown keys never enter the engine; they fail at [`Marketplace::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marketplace {
    /// eBay.
    Ebay,
    /// Facebook Marketplace.
    FacebookMarketplace,
    /// Vinted.
    Vinted,
    /// Gumtree.
    Gumtree,
    /// Amazon.
    Amazon,
    /// Craigslist.
    Craigslist,
}

impl Marketplace {
    /// All supported marketplaces, in stable order.
    pub const ALL: [Self; 6] = [
        Self::Ebay,
        Self::FacebookMarketplace,
        Self::Vinted,
        Self::Gumtree,
        Self::Amazon,
        Self::Craigslist,
    ];

    /// Returns the stable wire key for the marketplace.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ebay => "ebay",
            Self::FacebookMarketplace => "facebook_marketplace",
            Self::Vinted => "vinted",
            Self::Gumtree => "gumtree",
            Self::Amazon => "amazon",
            Self::Craigslist => "craigslist",
        }
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown marketplace key.
///
/// # Invariants
/// - Carries the offending key verbatim for caller diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown marketplace key: {key}")]
pub struct MarketplaceParseError {
    /// The unrecognized key.
    pub key: String,
}

impl FromStr for Marketplace {
    type Err = MarketplaceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ebay" => Ok(Self::Ebay),
            "facebook_marketplace" => Ok(Self::FacebookMarketplace),
            "vinted" => Ok(Self::Vinted),
            "gumtree" => Ok(Self::Gumtree),
            "amazon" => Ok(Self::Amazon),
            "craigslist" => Ok(Self::Craigslist),
            other => Err(MarketplaceParseError {
                key: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// SECTION: Country Codes
// ============================================================================

/// ISO-3166 alpha-2 country code, normalized to uppercase.
///
/// # Invariants
/// - Stored uppercase; comparisons are case-insensitive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Creates a country code, normalizing to uppercase ASCII.
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    /// Returns the normalized code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Day Bucket Keys
// ============================================================================

/// Day bucket key (`YYYY-MM-DD`, UTC) for daily telemetry counters.
///
/// # Invariants
/// - Derived from a [`Timestamp`] with the proleptic Gregorian calendar in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    /// Creates a day key from a raw `YYYY-MM-DD` string.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derives the UTC day bucket for a timestamp.
    #[must_use]
    pub fn from_timestamp(at: Timestamp) -> Self {
        let days = at.as_unix_millis().div_euclid(86_400_000);
        let (year, month, day) = civil_from_days(days);
        Self(format!("{year:04}-{month:02}-{day:02}"))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Converts days since the unix epoch into a (year, month, day) civil date.
///
/// Standard days-to-civil conversion over the proleptic Gregorian calendar.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Month and day values are bounded by calendar arithmetic."
)]
const fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let year = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = if month <= 2 { year + 1 } else { year };
    (year, month, day)
}
