// crates/scrape-warden-core/src/runtime/enforcer.rs
// ============================================================================
// Module: Scrape Warden Runtime Enforcer
// Description: Orchestrates cooldown, guardrail hits, and the budget ladder.
// Purpose: Produce the single EnforcementDecision artifact callers act on.
// Dependencies: crate::core, crate::runtime::budget, serde
// ============================================================================

//! ## Overview
//! The runtime enforcer is the orchestrator: one call per prospective scrape
//! action, combining the cooldown short-circuit, guardrail-hit annotation,
//! the budget ladder, and telemetry-increment computation into an immutable
//! [`EnforcementDecision`]. The cooldown check precedes everything else and
//! short-circuits the rest of the pipeline.
//!
//! The decision's degrade path is the audit trail an operator uses to answer
//! "why did this run at signal-only": `[requested]` when unchanged,
//! `[requested, resulting]` when degraded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::action::ActionKind;
use crate::core::action::EnforcementMode;
use crate::core::cost::CostModel;
use crate::core::identifiers::JobId;
use crate::core::identifiers::Marketplace;
use crate::core::identifiers::UserId;
use crate::core::tier::EntitlementsSnapshot;
use crate::core::tier::TierKey;
use crate::core::time::Timestamp;
use crate::core::usage::RecentTelemetry;
use crate::core::usage::TelemetryIncrement;
use crate::runtime::budget::BudgetGate;
use crate::runtime::budget::BudgetProjection;
use crate::runtime::budget::enforce_budget;

// ============================================================================
// SECTION: Enforcement Input
// ============================================================================

/// Input for one enforcement evaluation.
///
/// # Invariants
/// - `telemetry` is a read-only copy for the current (user, marketplace,
///   day) bucket; the enforcer never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnforcementInput {
    /// Tenant being evaluated.
    pub user_id: UserId,
    /// Tenant tier.
    pub tier: TierKey,
    /// Marketplace the action targets.
    pub marketplace: Marketplace,
    /// Action the dispatcher wants to run.
    pub requested: ActionKind,
    /// Optional job identifier for audit correlation.
    pub job_id: Option<JobId>,
    /// Evaluation time, supplied by the caller.
    pub now: Timestamp,
    /// Rolling telemetry for the current day bucket.
    pub telemetry: RecentTelemetry,
}

// ============================================================================
// SECTION: Decision Reason Codes
// ============================================================================

/// Reason code attached to every enforcement decision.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// A cooldown barrier is active; nothing may run yet.
    CooldownActive,
    /// Telemetry failed completeness validation (fail closed).
    TelemetryInvalid,
    /// The daily full-scrape cap blocked the request.
    FullScrapeCapReached,
    /// The daily proxy-GB cap blocked the request.
    ProxyGbCapReached,
    /// Remaining budget cannot afford even a signal check.
    BudgetDenied,
    /// Remaining budget forced a one-step downgrade.
    BudgetDowngraded,
    /// No limit matched; the requested action runs as-is.
    Allowed,
}

/// Guardrail observed in breach during evaluation, recorded for audit.
///
/// # Invariants
/// - Annotation only; the budget ladder independently decides the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailHit {
    /// Daily full-scrape cap reached.
    FullScrapeCap,
    /// Daily proxy-GB cap reached.
    ProxyGbCap,
}

// ============================================================================
// SECTION: Enforcement Decision
// ============================================================================

/// Audit annotations carried by every decision.
///
/// # Invariants
/// - `degrade_path` holds `[requested]` when the action ran unchanged and
///   `[requested, resulting]` when it was degraded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionAudit {
    /// Guardrails observed in breach during evaluation.
    pub guardrails_hit: Vec<GuardrailHit>,
    /// Requested-to-resulting mode trail.
    pub degrade_path: Vec<EnforcementMode>,
    /// Cost model version the decision was priced with.
    pub cost_model_version: String,
}

/// The single artifact callers act on.
///
/// # Invariants
/// - Immutable once produced; consumed by the dispatcher and the audit sink,
///   then discarded.
/// - `counters_delta` is present exactly when `allowed` is true.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnforcementDecision {
    /// Whether any action may run.
    pub allowed: bool,
    /// Mode the caller must use when invoking the scraper.
    pub mode: EnforcementMode,
    /// Reason code for the decision.
    pub reason: DecisionReason,
    /// Telemetry delta to apply after executing the chosen action.
    pub counters_delta: Option<TelemetryIncrement>,
    /// Earliest time a retry can succeed, when known.
    pub next_allowed_at: Option<Timestamp>,
    /// Audit annotations.
    pub audit: DecisionAudit,
}

// ============================================================================
// SECTION: Enforcement Evaluation
// ============================================================================

/// Evaluates one prospective scrape action.
///
/// Pipeline:
/// 1. telemetry completeness validation (fail closed);
/// 2. cooldown short-circuit — an active cooldown blocks before any
///    guardrail is inspected and sets `next_allowed_at`;
/// 3. guardrail-hit detection for audit annotation;
/// 4. budget ladder via [`enforce_budget`];
/// 5. final action, mode, and telemetry increment.
#[must_use]
pub fn evaluate_enforcement(input: &EnforcementInput, cost_model: &CostModel) -> EnforcementDecision {
    let requested_mode = EnforcementMode::from(input.requested);
    let version = cost_model.model_version().to_string();

    if input.telemetry.validate().is_err() || !input.now.is_valid() {
        return blocked(DecisionReason::TelemetryInvalid, None, Vec::new(), requested_mode, version);
    }

    if let Some(cooldown_until) = input.telemetry.cooldown_until
        && cooldown_until > input.now
    {
        return blocked(
            DecisionReason::CooldownActive,
            Some(cooldown_until),
            Vec::new(),
            requested_mode,
            version,
        );
    }

    let guardrails_hit = detect_guardrail_hits(input);

    let projection = BudgetProjection {
        requested: input.requested,
        full_scrapes_today: input.telemetry.full_scrapes_today,
        proxy_gb_today: input.telemetry.proxy_gb_today,
        cost_usd_today: input.telemetry.cost_usd_today,
    };
    let gate = enforce_budget(input.tier, input.marketplace, &projection);

    match gate {
        BudgetGate::Deny => {
            let reason = match guardrails_hit.first() {
                Some(GuardrailHit::FullScrapeCap) => DecisionReason::FullScrapeCapReached,
                Some(GuardrailHit::ProxyGbCap) => DecisionReason::ProxyGbCapReached,
                None => DecisionReason::BudgetDenied,
            };
            blocked(reason, None, guardrails_hit, requested_mode, version)
        }
        BudgetGate::Downgrade => {
            let resulting = input.requested.downgrade().unwrap_or(ActionKind::SignalCheck);
            EnforcementDecision {
                allowed: true,
                mode: EnforcementMode::from(resulting),
                reason: DecisionReason::BudgetDowngraded,
                counters_delta: Some(CostModel::increment_for(input.marketplace, resulting)),
                next_allowed_at: None,
                audit: DecisionAudit {
                    guardrails_hit,
                    degrade_path: vec![requested_mode, EnforcementMode::from(resulting)],
                    cost_model_version: version,
                },
            }
        }
        BudgetGate::Allow => EnforcementDecision {
            allowed: true,
            mode: requested_mode,
            reason: DecisionReason::Allowed,
            counters_delta: Some(CostModel::increment_for(input.marketplace, input.requested)),
            next_allowed_at: None,
            audit: DecisionAudit {
                guardrails_hit,
                degrade_path: vec![requested_mode],
                cost_model_version: version,
            },
        },
    }
}

// ============================================================================
// SECTION: Private Helpers
// ============================================================================

/// Builds a blocking decision.
fn blocked(
    reason: DecisionReason,
    next_allowed_at: Option<Timestamp>,
    guardrails_hit: Vec<GuardrailHit>,
    requested_mode: EnforcementMode,
    cost_model_version: String,
) -> EnforcementDecision {
    EnforcementDecision {
        allowed: false,
        mode: EnforcementMode::Block,
        reason,
        counters_delta: None,
        next_allowed_at,
        audit: DecisionAudit {
            guardrails_hit,
            degrade_path: vec![requested_mode],
            cost_model_version,
        },
    }
}

/// Detects breached guardrails for audit annotation.
fn detect_guardrail_hits(input: &EnforcementInput) -> Vec<GuardrailHit> {
    let mut hits = Vec::new();
    let cap = CostModel::max_full_scrapes_per_day(input.tier, input.marketplace);
    if input.telemetry.full_scrapes_today >= cap {
        hits.push(GuardrailHit::FullScrapeCap);
    }
    let entitlements = EntitlementsSnapshot::for_tier(input.tier);
    if input.telemetry.proxy_gb_today >= entitlements.max_proxy_gb_per_day {
        hits.push(GuardrailHit::ProxyGbCap);
    }
    hits
}
