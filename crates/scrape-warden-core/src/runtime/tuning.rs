// crates/scrape-warden-core/src/runtime/tuning.rs
// ============================================================================
// Module: Scrape Warden Marketplace Tuning Resolver
// Description: Static per-marketplace tuning plus telemetry-driven damping.
// Purpose: Resolve concurrency and rate ceilings for a marketplace and tier.
// Dependencies: serde, crate::core::{identifiers, tier}
// ============================================================================

//! ## Overview
//! Tuning resolution is a continuous-feedback damping mechanism, distinct
//! from the hard guardrails: rather than hard-stopping a tenant, it smooths
//! load by cutting concurrency and request rates as proxy or full-scrape
//! usage approaches its ceiling. Country kill switches and the per-market
//! global switch decide the `enabled` bit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CountryCode;
use crate::core::identifiers::Marketplace;
use crate::core::tier::TierKey;

// ============================================================================
// SECTION: Per-Tier Tables
// ============================================================================

/// A value table keyed by tier.
///
/// # Invariants
/// - Total over [`TierKey`]; lookups cannot miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerTier<T> {
    /// Value for the free tier.
    pub free: T,
    /// Value for the basic tier.
    pub basic: T,
    /// Value for the pro tier.
    pub pro: T,
    /// Value for the elite tier.
    pub elite: T,
    /// Value for the enterprise tier.
    pub enterprise: T,
}

impl<T: Copy> PerTier<T> {
    /// Returns the value for a tier.
    #[must_use]
    pub const fn get(&self, tier: TierKey) -> T {
        match tier {
            TierKey::Free => self.free,
            TierKey::Basic => self.basic,
            TierKey::Pro => self.pro,
            TierKey::Elite => self.elite,
            TierKey::Enterprise => self.enterprise,
        }
    }
}

// ============================================================================
// SECTION: Tuning Configuration
// ============================================================================

/// Proxy pool profile a marketplace requires.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyProfile {
    /// Datacenter proxies suffice.
    Datacenter,
    /// Residential proxies required.
    Residential,
    /// Mobile proxies required.
    Mobile,
}

/// Bias applied when the enforcer must choose how aggressively to degrade.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradeBias {
    /// Prefer degrading early to protect ban budget.
    Conservative,
    /// Balanced.
    Neutral,
    /// Prefer full fidelity until limits force otherwise.
    Aggressive,
}

/// Retry policy for transient scrape failures.
///
/// # Invariants
/// - `backoff_seconds` applies between attempts; zero disables waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum retry attempts.
    pub max_retries: u32,
    /// Seconds to wait between attempts.
    pub backoff_seconds: u64,
}

/// Kill-switch block inside a tuning entry.
///
/// # Invariants
/// - `countries` lists markets where the marketplace is disabled; codes are
///   normalized uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TuningKillSwitch {
    /// Disable the marketplace everywhere.
    pub global: bool,
    /// Disable the marketplace for specific countries.
    pub countries: Vec<CountryCode>,
}

/// Static tuning entry for one marketplace.
///
/// # Invariants
/// - Read-mostly configuration; refreshed on config change events, never
///   mutated in place during evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceTuning {
    /// Default concurrency per tier.
    pub default_concurrency_by_tier: PerTier<u32>,
    /// Requests-per-second ceiling per tier.
    pub max_rps_by_tier: PerTier<f64>,
    /// Proxy pool profile required by the marketplace.
    pub proxy_profile: ProxyProfile,
    /// Kill-switch block.
    pub kill_switch: TuningKillSwitch,
    /// Degrade bias for this marketplace.
    pub degrade_bias: DegradeBias,
    /// Retry policy for transient failures.
    pub retry_policy: RetryPolicy,
}

impl MarketplaceTuning {
    /// Built-in tuning table per marketplace.
    #[must_use]
    pub fn default_for(marketplace: Marketplace) -> Self {
        match marketplace {
            Marketplace::Ebay | Marketplace::Craigslist => Self {
                default_concurrency_by_tier: PerTier {
                    free: 1,
                    basic: 2,
                    pro: 4,
                    elite: 8,
                    enterprise: 16,
                },
                max_rps_by_tier: PerTier {
                    free: 0.5,
                    basic: 1.0,
                    pro: 2.0,
                    elite: 4.0,
                    enterprise: 8.0,
                },
                proxy_profile: ProxyProfile::Datacenter,
                kill_switch: TuningKillSwitch::default(),
                degrade_bias: DegradeBias::Neutral,
                retry_policy: RetryPolicy {
                    max_retries: 3,
                    backoff_seconds: 30,
                },
            },
            Marketplace::FacebookMarketplace => Self {
                default_concurrency_by_tier: PerTier {
                    free: 1,
                    basic: 1,
                    pro: 2,
                    elite: 4,
                    enterprise: 8,
                },
                max_rps_by_tier: PerTier {
                    free: 0.2,
                    basic: 0.3,
                    pro: 0.5,
                    elite: 1.0,
                    enterprise: 2.0,
                },
                proxy_profile: ProxyProfile::Mobile,
                kill_switch: TuningKillSwitch::default(),
                degrade_bias: DegradeBias::Conservative,
                retry_policy: RetryPolicy {
                    max_retries: 2,
                    backoff_seconds: 120,
                },
            },
            Marketplace::Amazon => Self {
                default_concurrency_by_tier: PerTier {
                    free: 1,
                    basic: 2,
                    pro: 3,
                    elite: 6,
                    enterprise: 12,
                },
                max_rps_by_tier: PerTier {
                    free: 0.3,
                    basic: 0.5,
                    pro: 1.0,
                    elite: 2.0,
                    enterprise: 4.0,
                },
                proxy_profile: ProxyProfile::Residential,
                kill_switch: TuningKillSwitch::default(),
                degrade_bias: DegradeBias::Conservative,
                retry_policy: RetryPolicy {
                    max_retries: 2,
                    backoff_seconds: 60,
                },
            },
            Marketplace::Vinted | Marketplace::Gumtree => Self {
                default_concurrency_by_tier: PerTier {
                    free: 1,
                    basic: 2,
                    pro: 4,
                    elite: 6,
                    enterprise: 12,
                },
                max_rps_by_tier: PerTier {
                    free: 0.4,
                    basic: 0.8,
                    pro: 1.5,
                    elite: 3.0,
                    enterprise: 6.0,
                },
                proxy_profile: ProxyProfile::Residential,
                kill_switch: TuningKillSwitch::default(),
                degrade_bias: DegradeBias::Neutral,
                retry_policy: RetryPolicy {
                    max_retries: 3,
                    backoff_seconds: 45,
                },
            },
        }
    }
}

// ============================================================================
// SECTION: Tuning Telemetry and Backoff
// ============================================================================

/// Telemetry ratios driving the damping mechanism.
///
/// # Invariants
/// - Ratios are usage over quota for the current day, expected in `[0, 1]`
///   but tolerated above 1 (overshoot reads).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TuningTelemetry {
    /// Proxy gigabytes used over the daily quota.
    pub proxy_usage_ratio: f64,
    /// Full scrapes used over the daily cap.
    pub full_scrape_ratio: f64,
}

/// Damping level applied during resolution.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffLevel {
    /// No damping applied.
    None,
    /// Usage crossed 0.75 of quota; ceilings cut by a quarter.
    Damped,
    /// Usage crossed 0.9 of quota; ceilings halved.
    Halved,
}

/// Resolved tuning for one (marketplace, tier, country) evaluation.
///
/// # Invariants
/// - `concurrency >= 1` and `max_rps >= 0.2` whenever `enabled` is true;
///   damping floors, not zeroes, the ceilings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTuning {
    /// Whether the marketplace is enabled for this evaluation.
    pub enabled: bool,
    /// Concurrency ceiling after damping.
    pub concurrency: u32,
    /// Requests-per-second ceiling after damping.
    pub max_rps: f64,
    /// Proxy pool profile required.
    pub proxy_profile: ProxyProfile,
    /// Degrade bias for the marketplace.
    pub degrade_bias: DegradeBias,
    /// Retry policy for transient failures.
    pub retry_policy: RetryPolicy,
    /// Damping level that was applied.
    pub backoff: BackoffLevel,
}

// ============================================================================
// SECTION: Tuning Resolution
// ============================================================================

/// Resolves tuning from the built-in table.
///
/// See [`resolve_tuning_with`] for resolution against an explicit entry
/// (for deployments that override the table from configuration).
#[must_use]
pub fn resolve_tuning(
    marketplace: Marketplace,
    tier: TierKey,
    country: Option<&CountryCode>,
    telemetry: Option<&TuningTelemetry>,
) -> ResolvedTuning {
    resolve_tuning_with(&MarketplaceTuning::default_for(marketplace), tier, country, telemetry)
}

/// Resolves tuning against an explicit tuning entry.
///
/// `enabled` is false when the entry's global switch is on or the country is
/// listed. Damping: usage ratio at or above 0.9 halves concurrency and
/// max-RPS (floors: 1 concurrency, 0.2 rps); at or above 0.75 both are cut
/// by a quarter.
#[must_use]
pub fn resolve_tuning_with(
    tuning: &MarketplaceTuning,
    tier: TierKey,
    country: Option<&CountryCode>,
    telemetry: Option<&TuningTelemetry>,
) -> ResolvedTuning {
    let country_killed =
        country.is_some_and(|code| tuning.kill_switch.countries.iter().any(|c| c == code));
    let enabled = !(tuning.kill_switch.global || country_killed);

    let base_concurrency = tuning.default_concurrency_by_tier.get(tier);
    let base_rps = tuning.max_rps_by_tier.get(tier);

    let pressure = telemetry.map_or(0.0, |t| t.proxy_usage_ratio.max(t.full_scrape_ratio));
    let (backoff, concurrency, max_rps) = if pressure >= 0.9 {
        (
            BackoffLevel::Halved,
            (base_concurrency / 2).max(1),
            (base_rps * 0.5).max(0.2),
        )
    } else if pressure >= 0.75 {
        (
            BackoffLevel::Damped,
            (base_concurrency.saturating_mul(3) / 4).max(1),
            (base_rps * 0.75).max(0.2),
        )
    } else {
        (BackoffLevel::None, base_concurrency.max(1), base_rps.max(0.2))
    };

    ResolvedTuning {
        enabled,
        concurrency,
        max_rps,
        proxy_profile: tuning.proxy_profile,
        degrade_bias: tuning.degrade_bias,
        retry_policy: tuning.retry_policy,
        backoff,
    }
}
