// crates/scrape-warden-core/src/core/cost.rs
// ============================================================================
// Module: Scrape Warden Cost Model
// Description: Per-marketplace cost curves, tier ceilings, and spend forecasts.
// Purpose: Translate heterogeneous scrape actions into a single economic check.
// Dependencies: serde, crate::core::{action, identifiers, tier, usage}
// ============================================================================

//! ## Overview
//! The cost model is pure: table lookups from (marketplace, action) to USD
//! cost and proxy-GB estimate, tier daily ceilings, and a probabilistic
//! forecaster for prospective monitor refresh intervals. Each marketplace has
//! a distinct curve reflecting its anti-bot and proxy overhead.
//!
//! The forecast coefficients are policy knobs, not derived constants. They
//! live in [`ForecastKnobs`] so deployments can override them from
//! configuration, and the knob version is stamped into every decision's audit
//! trail for reproducibility.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::action::ActionKind;
use crate::core::identifiers::Marketplace;
use crate::core::tier::TierKey;
use crate::core::usage::TelemetryIncrement;

// ============================================================================
// SECTION: Action Costs
// ============================================================================

/// Cost of executing one action once.
///
/// # Invariants
/// - Both fields are finite and non-negative by construction (static table).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionCost {
    /// USD cost per execution.
    pub usd: f64,
    /// Proxy bandwidth estimate per execution, in gigabytes.
    pub proxy_gb: f64,
}

impl ActionCost {
    /// Scales the cost by a repeat count.
    #[must_use]
    pub fn repeated(self, count: u32) -> Self {
        let count = f64::from(count);
        Self {
            usd: self.usd * count,
            proxy_gb: self.proxy_gb * count,
        }
    }
}

// ============================================================================
// SECTION: Forecast Knobs
// ============================================================================

/// Policy coefficients for the refresh-cost forecaster.
///
/// # Invariants
/// - `model_version` identifies the coefficient set in audit trails.
/// - Probabilities produced from these knobs are clamped into `[0, 1]` and
///   never jointly exceed 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastKnobs {
    /// Base probability that a refresh needs a full scrape.
    pub full_scrape_base_prob: f64,
    /// Slope applied to expected deltas per refresh interval (full scrape).
    pub full_scrape_slope: f64,
    /// Base probability that a refresh needs a partial fetch.
    pub partial_fetch_base_prob: f64,
    /// Slope applied to expected deltas per refresh interval (partial fetch).
    pub partial_fetch_slope: f64,
    /// Version tag for this coefficient set.
    pub model_version: String,
}

impl Default for ForecastKnobs {
    fn default() -> Self {
        Self {
            full_scrape_base_prob: 0.05,
            full_scrape_slope: 0.15,
            partial_fetch_base_prob: 0.20,
            partial_fetch_slope: 0.30,
            model_version: "cost-v3".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Cost Model
// ============================================================================

/// Pure cost model over marketplaces, actions, and tiers.
///
/// # Invariants
/// - All lookups are deterministic; two models with equal knobs produce
///   identical outputs for identical inputs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CostModel {
    /// Forecast policy knobs, overridable from configuration.
    knobs: ForecastKnobs,
}

impl CostModel {
    /// Creates a cost model with the given forecast knobs.
    #[must_use]
    pub const fn new(knobs: ForecastKnobs) -> Self {
        Self { knobs }
    }

    /// Returns the active forecast knob version.
    #[must_use]
    pub fn model_version(&self) -> &str {
        &self.knobs.model_version
    }

    /// Looks up the cost of one action on one marketplace.
    ///
    /// Curves are distinct per marketplace: Facebook Marketplace and Amazon
    /// carry the heaviest anti-bot and proxy overhead, Craigslist the
    /// lightest.
    #[must_use]
    pub const fn action_cost(marketplace: Marketplace, action: ActionKind) -> ActionCost {
        let (usd, proxy_gb) = match (marketplace, action) {
            (Marketplace::Ebay, ActionKind::SignalCheck) => (0.0008, 0.0004),
            (Marketplace::Ebay, ActionKind::PartialFetch) => (0.004, 0.004),
            (Marketplace::Ebay, ActionKind::FullScrape) => (0.02, 0.03),
            (Marketplace::FacebookMarketplace, ActionKind::SignalCheck) => (0.002, 0.001),
            (Marketplace::FacebookMarketplace, ActionKind::PartialFetch) => (0.012, 0.01),
            (Marketplace::FacebookMarketplace, ActionKind::FullScrape) => (0.06, 0.08),
            (Marketplace::Vinted, ActionKind::SignalCheck) => (0.001, 0.0005),
            (Marketplace::Vinted, ActionKind::PartialFetch) => (0.005, 0.005),
            (Marketplace::Vinted, ActionKind::FullScrape) => (0.025, 0.035),
            (Marketplace::Gumtree, ActionKind::SignalCheck) => (0.001, 0.0005),
            (Marketplace::Gumtree, ActionKind::PartialFetch) => (0.005, 0.004),
            (Marketplace::Gumtree, ActionKind::FullScrape) => (0.022, 0.03),
            (Marketplace::Amazon, ActionKind::SignalCheck) => (0.0015, 0.0008),
            (Marketplace::Amazon, ActionKind::PartialFetch) => (0.008, 0.007),
            (Marketplace::Amazon, ActionKind::FullScrape) => (0.04, 0.05),
            (Marketplace::Craigslist, ActionKind::SignalCheck) => (0.0005, 0.0003),
            (Marketplace::Craigslist, ActionKind::PartialFetch) => (0.003, 0.003),
            (Marketplace::Craigslist, ActionKind::FullScrape) => (0.012, 0.02),
        };
        ActionCost { usd, proxy_gb }
    }

    /// Looks up the cost of `count` repetitions of an action.
    #[must_use]
    pub fn action_cost_repeated(
        marketplace: Marketplace,
        action: ActionKind,
        count: u32,
    ) -> ActionCost {
        Self::action_cost(marketplace, action).repeated(count)
    }

    /// Daily USD spend ceiling for a tier.
    #[must_use]
    pub const fn daily_cost_ceiling_usd(tier: TierKey) -> f64 {
        match tier {
            TierKey::Free => 0.25,
            TierKey::Basic => 1.50,
            TierKey::Pro => 6.0,
            TierKey::Elite => 20.0,
            TierKey::Enterprise => 75.0,
        }
    }

    /// Daily full-scrape cap for a tier on a marketplace.
    ///
    /// The two highest-overhead marketplaces get half the tier's base cap,
    /// floored at one full scrape per day.
    #[must_use]
    pub const fn max_full_scrapes_per_day(tier: TierKey, marketplace: Marketplace) -> u32 {
        let base = match tier {
            TierKey::Free => 4,
            TierKey::Basic => 20,
            TierKey::Pro => 80,
            TierKey::Elite => 240,
            TierKey::Enterprise => 800,
        };
        match marketplace {
            Marketplace::FacebookMarketplace | Marketplace::Amazon => {
                let halved = base / 2;
                if halved == 0 { 1 } else { halved }
            }
            _ => base,
        }
    }

    /// Expected USD cost of one monitor refresh at the given interval.
    ///
    /// Probability of a full scrape follows a logistic-style clamp:
    /// `clamp(base + slope * delta_rate_per_hour * interval_hours, 0, 1)`;
    /// the partial-fetch probability is clamped the same way but capped at
    /// the remaining mass so the two never jointly exceed 1. The remainder
    /// is a signal check.
    #[must_use]
    pub fn expected_cost_per_refresh(
        &self,
        marketplace: Marketplace,
        interval_seconds: u64,
        delta_rate_per_hour: f64,
    ) -> f64 {
        let probs = self.refresh_probabilities(interval_seconds, delta_rate_per_hour);
        probs.full * Self::action_cost(marketplace, ActionKind::FullScrape).usd
            + probs.partial * Self::action_cost(marketplace, ActionKind::PartialFetch).usd
            + probs.signal * Self::action_cost(marketplace, ActionKind::SignalCheck).usd
    }

    /// Expected proxy gigabytes for one monitor refresh at the given interval.
    #[must_use]
    pub fn expected_proxy_gb_per_refresh(
        &self,
        marketplace: Marketplace,
        interval_seconds: u64,
        delta_rate_per_hour: f64,
    ) -> f64 {
        let probs = self.refresh_probabilities(interval_seconds, delta_rate_per_hour);
        probs.full * Self::action_cost(marketplace, ActionKind::FullScrape).proxy_gb
            + probs.partial * Self::action_cost(marketplace, ActionKind::PartialFetch).proxy_gb
            + probs.signal * Self::action_cost(marketplace, ActionKind::SignalCheck).proxy_gb
    }

    /// Expected daily USD spend for a monitor refreshed at the given interval.
    ///
    /// Forecast for a *prospective* monitor before it is created; intervals
    /// shorter than one second are treated as one second.
    #[must_use]
    pub fn expected_daily_cost(
        &self,
        marketplace: Marketplace,
        interval_seconds: u64,
        delta_rate_per_hour: f64,
    ) -> f64 {
        let interval = interval_seconds.max(1);
        let refreshes_per_day = 86_400.0 / interval_f64(interval);
        self.expected_cost_per_refresh(marketplace, interval, delta_rate_per_hour)
            * refreshes_per_day
    }

    /// Computes the telemetry increment for executing one action.
    #[must_use]
    pub fn increment_for(marketplace: Marketplace, action: ActionKind) -> TelemetryIncrement {
        let cost = Self::action_cost(marketplace, action);
        let (signal, partial, full) = match action {
            ActionKind::SignalCheck => (1, 0, 0),
            ActionKind::PartialFetch => (0, 1, 0),
            ActionKind::FullScrape => (0, 0, 1),
        };
        TelemetryIncrement::new(signal, partial, full, cost.proxy_gb, cost.usd)
    }

    /// Derives the per-refresh action probabilities from the knobs.
    fn refresh_probabilities(
        &self,
        interval_seconds: u64,
        delta_rate_per_hour: f64,
    ) -> RefreshProbabilities {
        let interval_hours = interval_f64(interval_seconds) / 3600.0;
        let pressure = delta_rate_per_hour.max(0.0) * interval_hours;
        let full = clamp01(self.knobs.full_scrape_base_prob + self.knobs.full_scrape_slope * pressure);
        let partial = clamp01(
            self.knobs.partial_fetch_base_prob + self.knobs.partial_fetch_slope * pressure,
        )
        .min(1.0 - full);
        let signal = (1.0 - full - partial).max(0.0);
        RefreshProbabilities {
            full,
            partial,
            signal,
        }
    }
}

// ============================================================================
// SECTION: Private Helpers
// ============================================================================

/// Per-refresh probabilities over the action ladder.
///
/// Joint mass never exceeds 1 by construction.
struct RefreshProbabilities {
    /// Probability that the refresh needs a full scrape.
    full: f64,
    /// Probability that the refresh needs a partial fetch.
    partial: f64,
    /// Remaining probability mass (signal check).
    signal: f64,
}

/// Clamps a probability into `[0, 1]`.
fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Lossless-enough u64-to-f64 conversion for refresh intervals.
#[allow(
    clippy::cast_precision_loss,
    reason = "Refresh intervals are far below the 2^53 precision boundary."
)]
const fn interval_f64(interval_seconds: u64) -> f64 {
    interval_seconds as f64
}
