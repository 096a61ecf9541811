// crates/scrape-warden-core/src/lib.rs
// ============================================================================
// Module: Scrape Warden Core Library
// Description: Admission-control and budget-enforcement engine for scrapers.
// Purpose: Decide per prospective scrape action whether to run, degrade, or block.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Scrape Warden Core is a pure, synchronous decision engine. Callers supply a
//! tenant tier, a requested scrape action, and rolling usage telemetry; the
//! engine returns an [`EnforcementDecision`] that is deterministic, auditable,
//! and replayable from its inputs.
//! Invariants:
//! - Missing or malformed configuration always resolves to the blocking
//!   outcome (fail closed), never to unmetered scraping.
//! - Degrading only steps the action ladder down; no path produces an action
//!   more expensive than the caller requested.
//! - The engine performs no I/O and never reads wall-clock time; hosts supply
//!   timestamps and apply telemetry increments through the interface seams.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::action::ActionKind;
pub use core::action::EnforcementMode;
pub use core::cost::CostModel;
pub use core::cost::ForecastKnobs;
pub use core::identifiers::CountryCode;
pub use core::identifiers::DayKey;
pub use core::identifiers::JobId;
pub use core::identifiers::Marketplace;
pub use core::identifiers::MarketplaceParseError;
pub use core::identifiers::UserId;
pub use core::tier::EntitlementsSnapshot;
pub use core::tier::TierKey;
pub use core::tier::TierParseError;
pub use core::time::Timestamp;
pub use core::usage::RecentTelemetry;
pub use core::usage::SnapshotInvalid;
pub use core::usage::TelemetryIncrement;
pub use core::usage::UsageSnapshot;
pub use interfaces::AuditError;
pub use interfaces::AuditSink;
pub use interfaces::ConfigProvider;
pub use interfaces::ConfigProviderError;
pub use interfaces::InMemoryTelemetryStore;
pub use interfaces::MemoryAuditSink;
pub use interfaces::TelemetryError;
pub use interfaces::TelemetryStore;
pub use runtime::audit::EnforcementEvent;
pub use runtime::audit::EnforcementOutcome;
pub use runtime::audit::record_enforcement_event;
pub use runtime::budget::BudgetGate;
pub use runtime::budget::BudgetProjection;
pub use runtime::budget::enforce_budget;
pub use runtime::delta::DeltaSignal;
pub use runtime::delta::compute_delta_signal;
pub use runtime::enforcer::DecisionAudit;
pub use runtime::enforcer::DecisionReason;
pub use runtime::enforcer::EnforcementDecision;
pub use runtime::enforcer::EnforcementInput;
pub use runtime::enforcer::evaluate_enforcement;
pub use runtime::guardrails::GuardrailDecision;
pub use runtime::guardrails::GuardrailOutcome;
pub use runtime::guardrails::GuardrailReason;
pub use runtime::guardrails::SuggestedAction;
pub use runtime::guardrails::ViolatedLimit;
pub use runtime::guardrails::evaluate_pricing_guardrails;
pub use runtime::killswitch::ConfigSource;
pub use runtime::killswitch::KillSwitchCode;
pub use runtime::killswitch::KillSwitchConfig;
pub use runtime::killswitch::KillSwitchVerdict;
pub use runtime::killswitch::MarketplaceSwitches;
pub use runtime::killswitch::WorkerClass;
pub use runtime::killswitch::evaluate_kill_switch;
pub use runtime::tuning::BackoffLevel;
pub use runtime::tuning::DegradeBias;
pub use runtime::tuning::MarketplaceTuning;
pub use runtime::tuning::PerTier;
pub use runtime::tuning::ProxyProfile;
pub use runtime::tuning::ResolvedTuning;
pub use runtime::tuning::RetryPolicy;
pub use runtime::tuning::TuningKillSwitch;
pub use runtime::tuning::TuningTelemetry;
pub use runtime::tuning::resolve_tuning;
pub use runtime::tuning::resolve_tuning_with;
