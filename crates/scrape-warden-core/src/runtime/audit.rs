// crates/scrape-warden-core/src/runtime/audit.rs
// ============================================================================
// Module: Scrape Warden Enforcement Audit
// Description: Outcome classification and audit event records.
// Purpose: Persist an explainable record of every enforcement decision.
// Dependencies: crate::core, crate::interfaces, crate::runtime::enforcer, serde
// ============================================================================

//! ## Overview
//! Every decision produces one audit event. The outcome class is derived
//! from the decision itself — a blocked decision is a denial, a degrade path
//! longer than one entry is a downgrade — so the audit trail can never
//! disagree with what the dispatcher was told to do. Sink failures are
//! returned to the caller, never swallowed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::action::EnforcementMode;
use crate::core::identifiers::JobId;
use crate::core::identifiers::Marketplace;
use crate::core::identifiers::UserId;
use crate::core::tier::TierKey;
use crate::core::time::Timestamp;
use crate::interfaces::AuditError;
use crate::interfaces::AuditSink;
use crate::runtime::enforcer::DecisionReason;
use crate::runtime::enforcer::EnforcementDecision;

// ============================================================================
// SECTION: Outcome Classification
// ============================================================================

/// Outcome class of an enforcement decision.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnforcementOutcome {
    /// The requested action ran unchanged.
    Allow,
    /// A cheaper action ran instead.
    Downgrade,
    /// Nothing ran.
    Deny,
}

impl EnforcementOutcome {
    /// Classifies a decision into its outcome class.
    #[must_use]
    pub fn classify(decision: &EnforcementDecision) -> Self {
        if !decision.allowed {
            return Self::Deny;
        }
        if decision.audit.degrade_path.len() > 1 {
            return Self::Downgrade;
        }
        Self::Allow
    }
}

// ============================================================================
// SECTION: Enforcement Events
// ============================================================================

/// Audit event persisted for one enforcement decision.
///
/// # Invariants
/// - Derived entirely from the decision and its call context; replaying the
///   decision reproduces the event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnforcementEvent {
    /// Tenant the decision applied to.
    pub user_id: UserId,
    /// Marketplace the action targeted.
    pub marketplace: Marketplace,
    /// Tenant tier at decision time.
    pub tier: TierKey,
    /// Job identifier, when the dispatcher supplied one.
    pub job_id: Option<JobId>,
    /// Outcome class.
    pub outcome: EnforcementOutcome,
    /// Mode the dispatcher requested.
    pub requested_mode: EnforcementMode,
    /// Mode the decision resolved to.
    pub resulting_mode: EnforcementMode,
    /// Reason code from the decision.
    pub reason: DecisionReason,
    /// Cost model version the decision was priced with.
    pub cost_model_version: String,
    /// Decision timestamp.
    pub decided_at: Timestamp,
}

impl EnforcementEvent {
    /// Builds the audit event for a decision.
    ///
    /// The requested mode is the head of the degrade path; the resulting
    /// mode is the decision's own mode field.
    #[must_use]
    pub fn from_decision(
        user_id: UserId,
        marketplace: Marketplace,
        tier: TierKey,
        job_id: Option<JobId>,
        decided_at: Timestamp,
        decision: &EnforcementDecision,
    ) -> Self {
        let requested_mode =
            decision.audit.degrade_path.first().copied().unwrap_or(decision.mode);
        Self {
            user_id,
            marketplace,
            tier,
            job_id,
            outcome: EnforcementOutcome::classify(decision),
            requested_mode,
            resulting_mode: decision.mode,
            reason: decision.reason,
            cost_model_version: decision.audit.cost_model_version.clone(),
            decided_at,
        }
    }
}

// ============================================================================
// SECTION: Event Recording
// ============================================================================

/// Builds and records the audit event for a decision.
///
/// # Errors
///
/// Returns [`AuditError`] when the sink rejects the event; failures are
/// surfaced to the caller, never swallowed.
pub fn record_enforcement_event(
    sink: &dyn AuditSink,
    user_id: UserId,
    marketplace: Marketplace,
    tier: TierKey,
    job_id: Option<JobId>,
    decided_at: Timestamp,
    decision: &EnforcementDecision,
) -> Result<(), AuditError> {
    let event =
        EnforcementEvent::from_decision(user_id, marketplace, tier, job_id, decided_at, decision);
    sink.record(&event)
}
