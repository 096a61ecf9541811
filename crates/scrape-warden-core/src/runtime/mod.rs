// crates/scrape-warden-core/src/runtime/mod.rs
// ============================================================================
// Module: Scrape Warden Runtime
// Description: Decision functions: guardrails, budget, enforcement, tuning.
// Purpose: Evaluate admission-control decisions from validated core inputs.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! Runtime decision functions. Every function here is pure and synchronous:
//! validated snapshots in, decision data out, with structured reason codes
//! instead of errors for expected policy outcomes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod budget;
pub mod delta;
pub mod enforcer;
pub mod guardrails;
pub mod killswitch;
pub mod tuning;
