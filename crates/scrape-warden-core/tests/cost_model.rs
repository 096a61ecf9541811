// crates/scrape-warden-core/tests/cost_model.rs
// ============================================================================
// Module: Cost Model Tests
// Description: Validate cost tables, forecast probabilities, and day bucketing.
// Purpose: Ensure the economic layer is deterministic and ordered sensibly.
// ============================================================================

//! ## Overview
//! Covers table ordering across marketplaces and tiers, forecast probability
//! behavior at the knob defaults, increment derivation, and UTC day keys.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    reason = "Test-only assertions and helpers are permitted."
)]

use scrape_warden_core::ActionKind;
use scrape_warden_core::CostModel;
use scrape_warden_core::DayKey;
use scrape_warden_core::EntitlementsSnapshot;
use scrape_warden_core::Marketplace;
use scrape_warden_core::TierKey;
use scrape_warden_core::Timestamp;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn every_marketplace_orders_the_action_ladder_by_cost() {
    for marketplace in Marketplace::ALL {
        let signal = CostModel::action_cost(marketplace, ActionKind::SignalCheck);
        let partial = CostModel::action_cost(marketplace, ActionKind::PartialFetch);
        let full = CostModel::action_cost(marketplace, ActionKind::FullScrape);
        assert!(signal.usd < partial.usd, "{marketplace}");
        assert!(partial.usd < full.usd, "{marketplace}");
        assert!(signal.proxy_gb < full.proxy_gb, "{marketplace}");
    }
}

#[test]
fn facebook_marketplace_carries_the_heaviest_full_scrape() {
    let facebook = CostModel::action_cost(Marketplace::FacebookMarketplace, ActionKind::FullScrape);
    for marketplace in Marketplace::ALL {
        let cost = CostModel::action_cost(marketplace, ActionKind::FullScrape);
        assert!(cost.usd <= facebook.usd);
    }
    let craigslist = CostModel::action_cost(Marketplace::Craigslist, ActionKind::FullScrape);
    assert!(craigslist.usd < facebook.usd);
}

#[test]
fn ceilings_and_caps_grow_with_the_tier() {
    for window in TierKey::ALL.windows(2) {
        let [lower, upper] = [window[0], window[1]];
        assert!(
            CostModel::daily_cost_ceiling_usd(lower) < CostModel::daily_cost_ceiling_usd(upper)
        );
        assert!(
            CostModel::max_full_scrapes_per_day(lower, Marketplace::Ebay)
                < CostModel::max_full_scrapes_per_day(upper, Marketplace::Ebay)
        );
    }
}

#[test]
fn entitlements_table_is_deterministic_and_valid() {
    for tier in TierKey::ALL {
        let first = EntitlementsSnapshot::for_tier(tier);
        let second = EntitlementsSnapshot::for_tier(tier);
        assert_eq!(first, second);
        first.validate().expect("built-in entitlements are valid");
        assert_eq!(first.tier, tier);
    }
}

#[test]
fn repeated_cost_scales_linearly() {
    let once = CostModel::action_cost(Marketplace::Vinted, ActionKind::PartialFetch);
    let thrice = CostModel::action_cost_repeated(Marketplace::Vinted, ActionKind::PartialFetch, 3);
    assert_close(thrice.usd, once.usd * 3.0);
    assert_close(thrice.proxy_gb, once.proxy_gb * 3.0);
    let none = once.repeated(0);
    assert_close(none.usd, 0.0);
}

#[test]
fn zero_delta_rate_uses_the_base_probabilities() {
    // At the default knobs a static listing set resolves to 5% full, 20%
    // partial, 75% signal regardless of the interval.
    let model = CostModel::default();
    let expected = 0.05 * 0.02 + 0.20 * 0.004 + 0.75 * 0.0008;
    assert_close(model.expected_cost_per_refresh(Marketplace::Ebay, 3600, 0.0), expected);
    assert_close(model.expected_cost_per_refresh(Marketplace::Ebay, 60, 0.0), expected);
}

#[test]
fn busy_listings_shift_mass_toward_full_scrapes() {
    let model = CostModel::default();
    let quiet = model.expected_cost_per_refresh(Marketplace::Amazon, 3600, 0.1);
    let busy = model.expected_cost_per_refresh(Marketplace::Amazon, 3600, 5.0);
    assert!(busy > quiet);
    // Saturated pressure pins the refresh at one full scrape.
    let saturated = model.expected_cost_per_refresh(Marketplace::Amazon, 3600, 1000.0);
    assert_close(
        saturated,
        CostModel::action_cost(Marketplace::Amazon, ActionKind::FullScrape).usd,
    );
}

#[test]
fn expected_daily_cost_grows_as_the_interval_shrinks() {
    let model = CostModel::default();
    let hourly = model.expected_daily_cost(Marketplace::Ebay, 3600, 1.0);
    let five_minutes = model.expected_daily_cost(Marketplace::Ebay, 300, 1.0);
    assert!(five_minutes > hourly);
    // A zero interval is treated as one second, not a division by zero.
    let degenerate = model.expected_daily_cost(Marketplace::Ebay, 0, 1.0);
    assert!(degenerate.is_finite());
}

#[test]
fn increments_mirror_the_action_cost_table() {
    let increment = CostModel::increment_for(Marketplace::Gumtree, ActionKind::FullScrape);
    assert_eq!(increment.full_scrapes, 1);
    assert_eq!(increment.partial_fetches, 0);
    assert_eq!(increment.signal_checks, 0);
    let cost = CostModel::action_cost(Marketplace::Gumtree, ActionKind::FullScrape);
    assert_close(increment.cost_usd_estimated, cost.usd);
    assert_close(increment.proxy_gb_estimated, cost.proxy_gb);
}

#[test]
fn day_keys_bucket_timestamps_by_utc_date() {
    let midnight = Timestamp::from_unix_millis(1_787_788_800_000);
    assert_eq!(DayKey::from_timestamp(midnight).as_str(), "2026-08-27");
    let just_before = Timestamp::from_unix_millis(1_787_788_800_000 - 1);
    assert_eq!(DayKey::from_timestamp(just_before).as_str(), "2026-08-26");
    let late_evening = Timestamp::from_unix_millis(1_787_788_800_000 + 86_399_999);
    assert_eq!(DayKey::from_timestamp(late_evening).as_str(), "2026-08-27");
}
