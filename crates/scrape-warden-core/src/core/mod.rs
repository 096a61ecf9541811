// crates/scrape-warden-core/src/core/mod.rs
// ============================================================================
// Module: Scrape Warden Core Types
// Description: Identifiers, tiers, telemetry, actions, cost model, and time.
// Purpose: Define the data model consumed by the runtime decision functions.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Leaf data model for the enforcement engine. Types here carry no behavior
//! beyond construction, validation, and table lookups; all decision logic
//! lives in [`crate::runtime`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod action;
pub mod cost;
pub mod identifiers;
pub mod tier;
pub mod time;
pub mod usage;
