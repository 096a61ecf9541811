// crates/scrape-warden-core/tests/enforcement.rs
// ============================================================================
// Module: Runtime Enforcer Tests
// Description: Validate the orchestrated enforcement pipeline end to end.
// Purpose: Ensure cooldown, budget, and audit semantics compose correctly.
// ============================================================================

//! ## Overview
//! Exercises the full enforcement pipeline: cooldown short-circuit, allow
//! and downgrade paths, denial reasons, increment computation, and audit
//! event recording through the in-memory sink.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    reason = "Test-only assertions and helpers are permitted."
)]

use scrape_warden_core::ActionKind;
use scrape_warden_core::CostModel;
use scrape_warden_core::DecisionReason;
use scrape_warden_core::EnforcementInput;
use scrape_warden_core::EnforcementMode;
use scrape_warden_core::EnforcementOutcome;
use scrape_warden_core::Marketplace;
use scrape_warden_core::MemoryAuditSink;
use scrape_warden_core::RecentTelemetry;
use scrape_warden_core::TierKey;
use scrape_warden_core::Timestamp;
use scrape_warden_core::UserId;
use scrape_warden_core::evaluate_enforcement;
use scrape_warden_core::record_enforcement_event;
use serde_json::json;

const NOW: Timestamp = Timestamp::from_unix_millis(20_500 * 86_400_000 + 12 * 3_600_000);

fn input(tier: TierKey, marketplace: Marketplace, requested: ActionKind) -> EnforcementInput {
    EnforcementInput {
        user_id: UserId::from_raw(42).unwrap(),
        tier,
        marketplace,
        requested,
        job_id: None,
        now: NOW,
        telemetry: RecentTelemetry::default(),
    }
}

#[test]
fn active_cooldown_blocks_before_anything_else() {
    let cooldown_until = NOW.plus_seconds(300);
    let mut input = input(TierKey::Pro, Marketplace::Ebay, ActionKind::FullScrape);
    input.telemetry.cooldown_until = Some(cooldown_until);
    // Exhaust every other limit; the cooldown must still be the reason.
    input.telemetry.full_scrapes_today = 10_000;
    input.telemetry.proxy_gb_today = 100.0;
    input.telemetry.cost_usd_today = 100.0;

    let decision = evaluate_enforcement(&input, &CostModel::default());
    assert!(!decision.allowed);
    assert_eq!(decision.mode, EnforcementMode::Block);
    assert_eq!(decision.reason, DecisionReason::CooldownActive);
    assert_eq!(decision.next_allowed_at, Some(cooldown_until));
    assert!(decision.audit.guardrails_hit.is_empty());
    assert_eq!(
        serde_json::to_value(decision.reason).unwrap(),
        json!("cooldown_active")
    );
}

#[test]
fn expired_cooldown_does_not_block() {
    let mut input = input(TierKey::Pro, Marketplace::Ebay, ActionKind::FullScrape);
    input.telemetry.cooldown_until = Some(Timestamp::from_unix_millis(NOW.as_unix_millis() - 1));
    let decision = evaluate_enforcement(&input, &CostModel::default());
    assert!(decision.allowed);
}

#[test]
fn clean_telemetry_allows_the_requested_action() {
    let input = input(TierKey::Pro, Marketplace::Amazon, ActionKind::FullScrape);
    let decision = evaluate_enforcement(&input, &CostModel::default());
    assert!(decision.allowed);
    assert_eq!(decision.mode, EnforcementMode::Full);
    assert_eq!(decision.reason, DecisionReason::Allowed);
    assert_eq!(decision.audit.degrade_path, vec![EnforcementMode::Full]);

    let delta = decision.counters_delta.expect("allowed decisions carry a delta");
    assert_eq!(delta.full_scrapes, 1);
    assert_eq!(delta.partial_fetches, 0);
    assert_eq!(delta.signal_checks, 0);
    assert_eq!(delta.cost_usd_estimated, 0.04);
}

#[test]
fn tight_budget_downgrades_one_step() {
    let mut input = input(TierKey::Free, Marketplace::FacebookMarketplace, ActionKind::FullScrape);
    input.telemetry.cost_usd_today = CostModel::daily_cost_ceiling_usd(TierKey::Free) - 0.05;

    let decision = evaluate_enforcement(&input, &CostModel::default());
    assert!(decision.allowed);
    assert_eq!(decision.mode, EnforcementMode::Partial);
    assert_eq!(decision.reason, DecisionReason::BudgetDowngraded);
    assert_eq!(
        decision.audit.degrade_path,
        vec![EnforcementMode::Full, EnforcementMode::Partial]
    );
    let delta = decision.counters_delta.expect("downgraded decisions carry a delta");
    assert_eq!(delta.partial_fetches, 1);
    assert_eq!(delta.full_scrapes, 0);
}

#[test]
fn exhausted_budget_blocks_with_first_guardrail_hit() {
    let mut input = input(TierKey::Free, Marketplace::Ebay, ActionKind::FullScrape);
    input.telemetry.full_scrapes_today =
        CostModel::max_full_scrapes_per_day(TierKey::Free, Marketplace::Ebay);
    input.telemetry.cost_usd_today = CostModel::daily_cost_ceiling_usd(TierKey::Free);

    let decision = evaluate_enforcement(&input, &CostModel::default());
    assert!(!decision.allowed);
    assert_eq!(decision.mode, EnforcementMode::Block);
    assert_eq!(decision.reason, DecisionReason::FullScrapeCapReached);
    assert!(decision.counters_delta.is_none());
}

#[test]
fn exhausted_budget_without_cap_hits_blocks_as_budget_denied() {
    let mut input = input(TierKey::Free, Marketplace::Ebay, ActionKind::SignalCheck);
    input.telemetry.cost_usd_today = CostModel::daily_cost_ceiling_usd(TierKey::Free);

    let decision = evaluate_enforcement(&input, &CostModel::default());
    assert!(!decision.allowed);
    assert_eq!(decision.reason, DecisionReason::BudgetDenied);
    assert!(decision.audit.guardrails_hit.is_empty());
}

#[test]
fn invalid_telemetry_fails_closed() {
    let mut input = input(TierKey::Enterprise, Marketplace::Ebay, ActionKind::SignalCheck);
    input.telemetry.proxy_gb_today = f64::INFINITY;

    let decision = evaluate_enforcement(&input, &CostModel::default());
    assert!(!decision.allowed);
    assert_eq!(decision.reason, DecisionReason::TelemetryInvalid);
}

#[test]
fn decisions_carry_the_cost_model_version() {
    let input = input(TierKey::Basic, Marketplace::Vinted, ActionKind::PartialFetch);
    let cost_model = CostModel::default();
    let decision = evaluate_enforcement(&input, &cost_model);
    assert_eq!(decision.audit.cost_model_version, cost_model.model_version());
}

#[test]
fn audit_events_classify_outcomes_from_the_decision() {
    let sink = MemoryAuditSink::new();
    let cost_model = CostModel::default();

    let allowed = input(TierKey::Pro, Marketplace::Ebay, ActionKind::FullScrape);
    let decision = evaluate_enforcement(&allowed, &cost_model);
    record_enforcement_event(
        &sink,
        allowed.user_id,
        allowed.marketplace,
        allowed.tier,
        None,
        NOW,
        &decision,
    )
    .expect("sink accepts events");

    let mut degraded = input(TierKey::Free, Marketplace::FacebookMarketplace, ActionKind::FullScrape);
    degraded.telemetry.cost_usd_today = CostModel::daily_cost_ceiling_usd(TierKey::Free) - 0.05;
    let decision = evaluate_enforcement(&degraded, &cost_model);
    record_enforcement_event(
        &sink,
        degraded.user_id,
        degraded.marketplace,
        degraded.tier,
        None,
        NOW,
        &decision,
    )
    .expect("sink accepts events");

    let mut denied = input(TierKey::Free, Marketplace::Ebay, ActionKind::SignalCheck);
    denied.telemetry.cost_usd_today = CostModel::daily_cost_ceiling_usd(TierKey::Free);
    let decision = evaluate_enforcement(&denied, &cost_model);
    record_enforcement_event(
        &sink,
        denied.user_id,
        denied.marketplace,
        denied.tier,
        None,
        NOW,
        &decision,
    )
    .expect("sink accepts events");

    let events = sink.events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].outcome, EnforcementOutcome::Allow);
    assert_eq!(events[1].outcome, EnforcementOutcome::Downgrade);
    assert_eq!(events[1].requested_mode, EnforcementMode::Full);
    assert_eq!(events[1].resulting_mode, EnforcementMode::Partial);
    assert_eq!(events[2].outcome, EnforcementOutcome::Deny);
    assert_eq!(events[2].resulting_mode, EnforcementMode::Block);
}
