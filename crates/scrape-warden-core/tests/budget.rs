// crates/scrape-warden-core/tests/budget.rs
// ============================================================================
// Module: Budget Enforcer Tests
// Description: Validate the degrade-ladder walk over caps and remaining budget.
// Purpose: Ensure budget enforcement only holds steady or degrades.
// ============================================================================

//! ## Overview
//! Covers each rung of the degrade ladder: the full-scrape cap, the proxy-GB
//! cap, budget-driven downgrade, and outright denial.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use scrape_warden_core::ActionKind;
use scrape_warden_core::BudgetGate;
use scrape_warden_core::BudgetProjection;
use scrape_warden_core::CostModel;
use scrape_warden_core::Marketplace;
use scrape_warden_core::TierKey;
use scrape_warden_core::enforce_budget;

fn projection(requested: ActionKind) -> BudgetProjection {
    BudgetProjection {
        requested,
        full_scrapes_today: 0,
        proxy_gb_today: 0.0,
        cost_usd_today: 0.0,
    }
}

#[test]
fn untouched_budget_allows_full_scrape() {
    let gate = enforce_budget(TierKey::Free, Marketplace::Ebay, &projection(ActionKind::FullScrape));
    assert_eq!(gate, BudgetGate::Allow);
}

#[test]
fn full_scrape_cap_steps_down_to_partial() {
    let cap = CostModel::max_full_scrapes_per_day(TierKey::Free, Marketplace::Ebay);
    let mut projection = projection(ActionKind::FullScrape);
    projection.full_scrapes_today = cap;
    let gate = enforce_budget(TierKey::Free, Marketplace::Ebay, &projection);
    assert_eq!(gate, BudgetGate::Downgrade);
}

#[test]
fn full_scrape_cap_is_halved_on_heavy_marketplaces() {
    let base = CostModel::max_full_scrapes_per_day(TierKey::Basic, Marketplace::Ebay);
    let heavy = CostModel::max_full_scrapes_per_day(TierKey::Basic, Marketplace::Amazon);
    assert_eq!(heavy, base / 2);
    assert!(CostModel::max_full_scrapes_per_day(TierKey::Free, Marketplace::Amazon) >= 1);
}

#[test]
fn proxy_cap_steps_down_to_signal() {
    // 0.49 GB used; an eBay full scrape would cross the free-tier 0.5 GB cap.
    let mut projection = projection(ActionKind::FullScrape);
    projection.proxy_gb_today = 0.49;
    let gate = enforce_budget(TierKey::Free, Marketplace::Ebay, &projection);
    assert_eq!(gate, BudgetGate::Downgrade);
}

#[test]
fn exhausted_budget_denies_even_signal_checks() {
    let mut projection = projection(ActionKind::SignalCheck);
    projection.cost_usd_today = CostModel::daily_cost_ceiling_usd(TierKey::Free);
    let gate = enforce_budget(TierKey::Free, Marketplace::Ebay, &projection);
    assert_eq!(gate, BudgetGate::Deny);
}

#[test]
fn low_budget_downgrades_the_requested_action() {
    // Remaining free-tier budget covers a partial fetch but not a Facebook
    // Marketplace full scrape.
    let mut projection = projection(ActionKind::FullScrape);
    projection.cost_usd_today = CostModel::daily_cost_ceiling_usd(TierKey::Free) - 0.05;
    let gate = enforce_budget(TierKey::Free, Marketplace::FacebookMarketplace, &projection);
    assert_eq!(gate, BudgetGate::Downgrade);
}

#[test]
fn signal_check_request_never_upgrades() {
    // Caps that would rearrange a full scrape leave a signal-check request
    // untouched.
    let mut projection = projection(ActionKind::SignalCheck);
    projection.full_scrapes_today = 1000;
    projection.proxy_gb_today = 100.0;
    let gate = enforce_budget(TierKey::Free, Marketplace::Ebay, &projection);
    assert_eq!(gate, BudgetGate::Allow);
}
