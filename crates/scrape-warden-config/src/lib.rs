// crates/scrape-warden-config/src/lib.rs
// ============================================================================
// Module: Scrape Warden Config Library
// Description: Canonical config model, validation, and refreshable providers.
// Purpose: Single source of truth for scrape-warden.toml semantics.
// Dependencies: scrape-warden-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! `scrape-warden-config` defines the canonical configuration model for
//! Scrape Warden deployments: kill switches, per-marketplace tuning
//! overrides, and forecast knobs, loaded from a TOML file with strict,
//! fail-closed validation.
//!
//! Providers are explicit and injectable. [`FileConfigProvider`] caches the
//! parsed config and flips its provenance to fallback whenever the backing
//! file cannot be loaded; stale data is never served as authoritative.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod provider;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::WardenConfig;
pub use provider::FileConfigProvider;
pub use provider::StaticConfigProvider;
