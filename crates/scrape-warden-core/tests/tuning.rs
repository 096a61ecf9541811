// crates/scrape-warden-core/tests/tuning.rs
// ============================================================================
// Module: Tuning Resolver Tests
// Description: Validate damping thresholds, floors, and kill-switch handling.
// Purpose: Ensure backoff smooths load without zeroing any tenant's ceilings.
// ============================================================================

//! ## Overview
//! Covers the undamped path, both damping thresholds with their floors, and
//! the global and country kill switches.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    reason = "Test-only assertions and helpers are permitted."
)]

use scrape_warden_core::BackoffLevel;
use scrape_warden_core::CountryCode;
use scrape_warden_core::Marketplace;
use scrape_warden_core::MarketplaceTuning;
use scrape_warden_core::ProxyProfile;
use scrape_warden_core::TierKey;
use scrape_warden_core::TuningTelemetry;
use scrape_warden_core::resolve_tuning;
use scrape_warden_core::resolve_tuning_with;

#[test]
fn quiet_telemetry_resolves_the_base_table() {
    let resolved = resolve_tuning(Marketplace::Ebay, TierKey::Pro, None, None);
    assert!(resolved.enabled);
    assert_eq!(resolved.concurrency, 4);
    assert_eq!(resolved.max_rps, 2.0);
    assert_eq!(resolved.proxy_profile, ProxyProfile::Datacenter);
    assert_eq!(resolved.backoff, BackoffLevel::None);
}

#[test]
fn usage_past_ninety_percent_halves_ceilings() {
    let telemetry = TuningTelemetry {
        proxy_usage_ratio: 0.95,
        full_scrape_ratio: 0.1,
    };
    let resolved = resolve_tuning(Marketplace::Ebay, TierKey::Elite, None, Some(&telemetry));
    assert_eq!(resolved.backoff, BackoffLevel::Halved);
    assert_eq!(resolved.concurrency, 4);
    assert_eq!(resolved.max_rps, 2.0);
}

#[test]
fn usage_past_three_quarters_damps_ceilings() {
    let telemetry = TuningTelemetry {
        proxy_usage_ratio: 0.2,
        full_scrape_ratio: 0.8,
    };
    let resolved = resolve_tuning(Marketplace::Ebay, TierKey::Enterprise, None, Some(&telemetry));
    assert_eq!(resolved.backoff, BackoffLevel::Damped);
    assert_eq!(resolved.concurrency, 12);
    assert_eq!(resolved.max_rps, 6.0);
}

#[test]
fn halving_floors_at_one_slot_and_a_fifth_rps() {
    let telemetry = TuningTelemetry {
        proxy_usage_ratio: 1.0,
        full_scrape_ratio: 1.0,
    };
    // Free-tier Facebook Marketplace already sits at the minimum.
    let resolved = resolve_tuning(
        Marketplace::FacebookMarketplace,
        TierKey::Free,
        None,
        Some(&telemetry),
    );
    assert_eq!(resolved.backoff, BackoffLevel::Halved);
    assert_eq!(resolved.concurrency, 1);
    assert_eq!(resolved.max_rps, 0.2);
}

#[test]
fn the_worse_of_the_two_ratios_drives_damping() {
    let telemetry = TuningTelemetry {
        proxy_usage_ratio: 0.1,
        full_scrape_ratio: 0.92,
    };
    let resolved = resolve_tuning(Marketplace::Amazon, TierKey::Pro, None, Some(&telemetry));
    assert_eq!(resolved.backoff, BackoffLevel::Halved);
}

#[test]
fn global_kill_switch_disables_the_marketplace() {
    let mut tuning = MarketplaceTuning::default_for(Marketplace::Vinted);
    tuning.kill_switch.global = true;
    let resolved = resolve_tuning_with(&tuning, TierKey::Pro, None, None);
    assert!(!resolved.enabled);
    // Ceilings still resolve so callers can log what would have applied.
    assert_eq!(resolved.concurrency, 4);
}

#[test]
fn country_kill_switch_matches_case_insensitively() {
    let mut tuning = MarketplaceTuning::default_for(Marketplace::Gumtree);
    tuning.kill_switch.countries.push(CountryCode::new("de"));

    let blocked = resolve_tuning_with(&tuning, TierKey::Basic, Some(&CountryCode::new("DE")), None);
    assert!(!blocked.enabled);

    let open = resolve_tuning_with(&tuning, TierKey::Basic, Some(&CountryCode::new("GB")), None);
    assert!(open.enabled);
}

#[test]
fn heavy_marketplaces_require_premium_proxy_pools() {
    let facebook = resolve_tuning(Marketplace::FacebookMarketplace, TierKey::Pro, None, None);
    assert_eq!(facebook.proxy_profile, ProxyProfile::Mobile);
    let amazon = resolve_tuning(Marketplace::Amazon, TierKey::Pro, None, None);
    assert_eq!(amazon.proxy_profile, ProxyProfile::Residential);
}
