// crates/scrape-warden-core/src/runtime/guardrails.rs
// ============================================================================
// Module: Scrape Warden Guardrail Evaluator
// Description: Ordered pricing guardrail chain over entitlements and usage.
// Purpose: Resolve per-user quota and cost checks into allow/throttle/block.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! The guardrail evaluator is the dispatcher-facing pre-admission check.
//! Both snapshots and the timestamp are validated before any policy logic
//! runs; an invalid input resolves to the blocking outcome with
//! [`GuardrailReason::EntitlementsMissing`] — the engine never fails open.
//!
//! Checks are ordered and first-match-wins: hard quota exhaustion and the
//! anti-abuse refresh floor outrank the soft concurrency and cost throttles.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::cost::CostModel;
use crate::core::tier::EntitlementsSnapshot;
use crate::core::time::Timestamp;
use crate::core::usage::UsageSnapshot;

// ============================================================================
// SECTION: Guardrail Decisions
// ============================================================================

/// Guardrail decision class.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailDecision {
    /// Run the action.
    Allow,
    /// Hold or queue the action (soft limit).
    Throttle,
    /// Do not run the action (hard stop or invalid input).
    Block,
}

/// Guardrail reason code.
///
/// # Invariants
/// - Variants are stable for serialization; the order of checks in
///   [`evaluate_pricing_guardrails`] determines which code surfaces when
///   several limits are breached at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardrailReason {
    /// No guardrail matched.
    Allowed,
    /// A snapshot or the timestamp failed validation (fail closed).
    EntitlementsMissing,
    /// Daily run quota exhausted.
    MaxDailyRunsExceeded,
    /// Daily proxy bandwidth quota exhausted.
    MaxProxyGbExceeded,
    /// Last run is inside the tier's refresh interval floor.
    RefreshIntervalFloor,
    /// Per-user concurrency ceiling reached.
    MaxConcurrencyExceeded,
    /// Projected daily spend exceeds the tier ceiling.
    DailyCostLimitExceeded,
}

/// The limit a guardrail found violated, with only the fields relevant to
/// that limit.
///
/// # Invariants
/// - Variants are closed; audit consumers get typed payloads, not loose maps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "limit_kind", rename_all = "snake_case")]
pub enum ViolatedLimit {
    /// Daily run quota.
    DailyRuns {
        /// Runs recorded today.
        used: u32,
        /// Tier quota.
        limit: u32,
    },
    /// Daily proxy bandwidth quota.
    ProxyGb {
        /// Gigabytes consumed today.
        used_gb: f64,
        /// Tier quota in gigabytes.
        limit_gb: f64,
    },
    /// Refresh interval floor.
    RefreshFloor {
        /// Seconds elapsed since the last run.
        seconds_since_last: u64,
        /// Tier floor in seconds.
        floor_seconds: u64,
    },
    /// Per-user concurrency ceiling.
    Concurrency {
        /// Jobs currently running.
        running: u32,
        /// Tier ceiling.
        limit: u32,
    },
    /// Daily cost ceiling.
    DailyCost {
        /// Projected USD spend for the day.
        projected_usd: f64,
        /// Tier ceiling in USD.
        ceiling_usd: f64,
    },
}

/// Suggested caller behavior for a non-allow outcome.
///
/// # Invariants
/// - Advisory only; callers may ignore it but must still honor the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Retry no earlier than the given timestamp.
    RetryAt {
        /// Earliest viable retry time.
        at: Timestamp,
    },
    /// Queue behind currently running jobs.
    Queue,
    /// Lengthen refresh intervals or reduce monitor count.
    ReduceSpend,
}

/// Guardrail evaluation outcome.
///
/// # Invariants
/// - `violated_limit` is present exactly when `reason` is not
///   [`GuardrailReason::Allowed`] or [`GuardrailReason::EntitlementsMissing`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailOutcome {
    /// Decision class.
    pub decision: GuardrailDecision,
    /// Reason code for the decision.
    pub reason: GuardrailReason,
    /// Violated limit details, when a concrete limit matched.
    pub violated_limit: Option<ViolatedLimit>,
    /// Advisory next step for the caller.
    pub suggested_action: Option<SuggestedAction>,
}

impl GuardrailOutcome {
    /// The fail-closed outcome for invalid inputs.
    const fn fail_closed() -> Self {
        Self {
            decision: GuardrailDecision::Block,
            reason: GuardrailReason::EntitlementsMissing,
            violated_limit: None,
            suggested_action: None,
        }
    }
}

// ============================================================================
// SECTION: Guardrail Evaluation
// ============================================================================

/// Evaluates the ordered pricing guardrail chain.
///
/// Preconditions are validated first: a missing usage snapshot, a snapshot
/// with non-finite fields, or an invalid `now` all resolve to
/// `Block / ENTITLEMENTS_MISSING` regardless of any other field.
///
/// Ordered checks, first match wins:
/// 1. daily runs exhausted (hard stop)
/// 2. proxy gigabytes exhausted (hard stop)
/// 3. refresh interval floor (hard stop)
/// 4. concurrency ceiling (soft throttle)
/// 5. projected daily cost over the tier ceiling (soft throttle)
#[must_use]
pub fn evaluate_pricing_guardrails(
    entitlements: &EntitlementsSnapshot,
    usage: Option<&UsageSnapshot>,
    now: Timestamp,
    cost_model: &CostModel,
) -> GuardrailOutcome {
    let Some(usage) = usage else {
        return GuardrailOutcome::fail_closed();
    };
    if entitlements.validate().is_err() || usage.validate().is_err() || !now.is_valid() {
        return GuardrailOutcome::fail_closed();
    }

    if usage.daily_runs >= entitlements.max_daily_runs {
        return GuardrailOutcome {
            decision: GuardrailDecision::Block,
            reason: GuardrailReason::MaxDailyRunsExceeded,
            violated_limit: Some(ViolatedLimit::DailyRuns {
                used: usage.daily_runs,
                limit: entitlements.max_daily_runs,
            }),
            suggested_action: None,
        };
    }

    if usage.proxy_gb_today >= entitlements.max_proxy_gb_per_day {
        return GuardrailOutcome {
            decision: GuardrailDecision::Block,
            reason: GuardrailReason::MaxProxyGbExceeded,
            violated_limit: Some(ViolatedLimit::ProxyGb {
                used_gb: usage.proxy_gb_today,
                limit_gb: entitlements.max_proxy_gb_per_day,
            }),
            suggested_action: None,
        };
    }

    if let Some(last_run_at) = usage.last_run_at {
        let elapsed = now.seconds_since(last_run_at);
        if elapsed < entitlements.refresh_interval_floor_seconds {
            let floor = entitlements.refresh_interval_floor_seconds;
            return GuardrailOutcome {
                decision: GuardrailDecision::Block,
                reason: GuardrailReason::RefreshIntervalFloor,
                violated_limit: Some(ViolatedLimit::RefreshFloor {
                    seconds_since_last: elapsed,
                    floor_seconds: floor,
                }),
                suggested_action: Some(SuggestedAction::RetryAt {
                    at: last_run_at.plus_seconds(floor),
                }),
            };
        }
    }

    if usage.running_jobs >= entitlements.max_concurrency_user {
        return GuardrailOutcome {
            decision: GuardrailDecision::Throttle,
            reason: GuardrailReason::MaxConcurrencyExceeded,
            violated_limit: Some(ViolatedLimit::Concurrency {
                running: usage.running_jobs,
                limit: entitlements.max_concurrency_user,
            }),
            suggested_action: Some(SuggestedAction::Queue),
        };
    }

    let projected_usd = projected_daily_cost(entitlements, usage, now, cost_model);
    let ceiling_usd = CostModel::daily_cost_ceiling_usd(entitlements.tier);
    if projected_usd > ceiling_usd {
        return GuardrailOutcome {
            decision: GuardrailDecision::Throttle,
            reason: GuardrailReason::DailyCostLimitExceeded,
            violated_limit: Some(ViolatedLimit::DailyCost {
                projected_usd,
                ceiling_usd,
            }),
            suggested_action: Some(SuggestedAction::ReduceSpend),
        };
    }

    GuardrailOutcome {
        decision: GuardrailDecision::Allow,
        reason: GuardrailReason::Allowed,
        violated_limit: None,
        suggested_action: None,
    }
}

// ============================================================================
// SECTION: Private Helpers
// ============================================================================

/// Projects the full-day spend from the snapshot and evaluation time.
///
/// Today's runs are priced at the tier's refresh floor with a nominal delta
/// rate of one change per hour, then extrapolated over the elapsed fraction
/// of the UTC day (floored at one hour, so a midnight burst does not divide
/// by near-zero). Deterministic and replayable from the inputs alone.
fn projected_daily_cost(
    entitlements: &EntitlementsSnapshot,
    usage: &UsageSnapshot,
    now: Timestamp,
    cost_model: &CostModel,
) -> f64 {
    let per_refresh = cost_model.expected_cost_per_refresh(
        usage.marketplace,
        entitlements.refresh_interval_floor_seconds,
        1.0,
    );
    let spend_so_far = per_refresh * f64::from(usage.daily_runs);
    let day_fraction = day_fraction_elapsed(now).clamp(1.0 / 24.0, 1.0);
    spend_so_far / day_fraction
}

/// Fraction of the UTC day elapsed at `now`.
#[allow(
    clippy::cast_precision_loss,
    reason = "Milliseconds-into-day is far below the 2^53 precision boundary."
)]
fn day_fraction_elapsed(now: Timestamp) -> f64 {
    let millis_into_day = now.as_unix_millis().rem_euclid(86_400_000);
    millis_into_day as f64 / 86_400_000.0
}
