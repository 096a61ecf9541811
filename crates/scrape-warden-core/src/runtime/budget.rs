// crates/scrape-warden-core/src/runtime/budget.rs
// ============================================================================
// Module: Scrape Warden Budget Enforcer
// Description: Degrade-ladder walk over daily caps and remaining USD budget.
// Purpose: Keep, downgrade, or deny a requested action within tier economics.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! The budget enforcer owns per-action economics. Starting from the
//! requested action it walks the quality ladder downward: the full-scrape
//! daily cap steps full scrapes to partial fetches, the proxy-GB cap steps
//! further to signal checks, and the remaining USD budget decides between
//! downgrade and outright denial. The enforcer never substitutes an action
//! more expensive than the one requested.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::action::ActionKind;
use crate::core::cost::CostModel;
use crate::core::identifiers::Marketplace;
use crate::core::tier::EntitlementsSnapshot;
use crate::core::tier::TierKey;

// ============================================================================
// SECTION: Budget Gate
// ============================================================================

/// Budget enforcement verdict.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
/// - `Downgrade` instructs the caller to step the requested action one rung
///   down; it never means "run something pricier".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetGate {
    /// Run the requested action as-is.
    Allow,
    /// Run a one-step-cheaper variant of the requested action.
    Downgrade,
    /// Do not run anything; even the cheapest variant is unaffordable.
    Deny,
}

/// Projection of the action a caller wants to run, with current counters.
///
/// # Invariants
/// - Counter fields come from the telemetry store for the current day
///   bucket; stale values produce bounded overshoot, not corruption (soft
///   accounting, see the concurrency notes on
///   [`crate::interfaces::TelemetryStore`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetProjection {
    /// Requested action kind.
    pub requested: ActionKind,
    /// Full scrapes already executed today.
    pub full_scrapes_today: u32,
    /// Proxy gigabytes already consumed today.
    pub proxy_gb_today: f64,
    /// Estimated USD already spent today.
    pub cost_usd_today: f64,
}

// ============================================================================
// SECTION: Budget Enforcement
// ============================================================================

/// Walks the degrade ladder for a projected action.
///
/// Ladder, in order:
/// 1. full-scrape daily cap exceeded -> consider a partial fetch instead;
/// 2. projected proxy-GB at the (possibly downgraded) action over the tier
///    cap -> consider a signal check instead;
/// 3. remaining USD budget below even a signal check -> [`BudgetGate::Deny`];
/// 4. remaining budget below the chosen action -> [`BudgetGate::Downgrade`];
/// 5. otherwise the verdict reflects whatever cap-driven downgrade happened,
///    or [`BudgetGate::Allow`] if none did.
#[must_use]
pub fn enforce_budget(
    tier: TierKey,
    marketplace: Marketplace,
    projection: &BudgetProjection,
) -> BudgetGate {
    let entitlements = EntitlementsSnapshot::for_tier(tier);
    let mut action = projection.requested;
    let mut degraded = false;

    if action == ActionKind::FullScrape {
        let cap = CostModel::max_full_scrapes_per_day(tier, marketplace);
        if projection.full_scrapes_today.saturating_add(1) > cap {
            action = ActionKind::PartialFetch;
            degraded = true;
        }
    }

    let projected_gb =
        projection.proxy_gb_today + CostModel::action_cost(marketplace, action).proxy_gb;
    if projected_gb > entitlements.max_proxy_gb_per_day && action != ActionKind::SignalCheck {
        action = ActionKind::SignalCheck;
        degraded = true;
    }

    let remaining_usd = CostModel::daily_cost_ceiling_usd(tier) - projection.cost_usd_today;
    let signal_usd = CostModel::action_cost(marketplace, ActionKind::SignalCheck).usd;
    if remaining_usd < signal_usd {
        return BudgetGate::Deny;
    }

    let chosen_usd = CostModel::action_cost(marketplace, action).usd;
    if remaining_usd < chosen_usd {
        return BudgetGate::Downgrade;
    }

    if degraded { BudgetGate::Downgrade } else { BudgetGate::Allow }
}
