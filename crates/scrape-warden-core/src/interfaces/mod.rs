// crates/scrape-warden-core/src/interfaces/mod.rs
// ============================================================================
// Module: Scrape Warden Interfaces
// Description: Backend-agnostic seams for telemetry, config, and audit.
// Purpose: Define the contract surfaces used by the enforcement engine.
// Dependencies: crate::core, crate::runtime, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the enforcement core integrates with external
//! systems without embedding backend details. Implementations must be
//! deterministic from the engine's perspective and fail closed on missing or
//! invalid data.
//!
//! Concurrency contract: the engine holds no lock across its
//! read-decide-write sequence. Telemetry stores must therefore support
//! atomic increment-by-amount — two concurrent evaluations seeing slightly
//! stale snapshots is an accepted, bounded overshoot on soft limits, but a
//! lost increment is a correctness violation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::PoisonError;

use thiserror::Error;

use crate::core::identifiers::DayKey;
use crate::core::identifiers::Marketplace;
use crate::core::identifiers::UserId;
use crate::core::tier::EntitlementsSnapshot;
use crate::core::tier::TierKey;
use crate::core::usage::RecentTelemetry;
use crate::core::usage::TelemetryIncrement;
use crate::runtime::audit::EnforcementEvent;
use crate::runtime::killswitch::ConfigSource;
use crate::runtime::killswitch::KillSwitchConfig;
use crate::runtime::tuning::MarketplaceTuning;

// ============================================================================
// SECTION: Telemetry Store
// ============================================================================

/// Telemetry store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Store I/O error.
    #[error("telemetry store io error: {0}")]
    Io(String),
    /// Store data is invalid.
    #[error("telemetry store invalid data: {0}")]
    Invalid(String),
}

/// Rolling-counter store keyed by (user, marketplace, day).
///
/// Implementations must apply increments atomically (increment-by-amount,
/// not read-modify-write); the engine never holds a lock across its
/// read-decide-write sequence.
pub trait TelemetryStore {
    /// Loads the telemetry bucket, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError`] when loading fails.
    fn load(
        &self,
        user_id: UserId,
        marketplace: Marketplace,
        day: &DayKey,
    ) -> Result<Option<RecentTelemetry>, TelemetryError>;

    /// Atomically applies a counter increment to the bucket.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError`] when the increment cannot be applied.
    fn apply_increment(
        &self,
        user_id: UserId,
        marketplace: Marketplace,
        day: &DayKey,
        increment: &TelemetryIncrement,
    ) -> Result<(), TelemetryError>;
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Audit sink errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Sink write failed.
    #[error("audit sink write failed: {0}")]
    WriteFailed(String),
}

/// Sink for enforcement audit events.
pub trait AuditSink {
    /// Records one enforcement event.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] when the event cannot be persisted.
    fn record(&self, event: &EnforcementEvent) -> Result<(), AuditError>;
}

// ============================================================================
// SECTION: Config Provider
// ============================================================================

/// Config provider errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigProviderError {
    /// Refresh from the backing source failed.
    #[error("config refresh failed: {0}")]
    RefreshFailed(String),
}

/// Explicit, injectable configuration provider.
///
/// Providers are owned by the caller's composition root; there is no ambient
/// global cache. `kill_switches` returns the provenance alongside the config
/// so consumers can fail closed on fallback data.
pub trait ConfigProvider {
    /// Returns the kill-switch config and its provenance.
    fn kill_switches(&self) -> (KillSwitchConfig, ConfigSource);

    /// Returns the tuning entry for a marketplace.
    fn tuning(&self, marketplace: Marketplace) -> MarketplaceTuning;

    /// Returns the entitlements snapshot for a tier.
    fn entitlements(&self, tier: TierKey) -> EntitlementsSnapshot;

    /// Re-reads configuration from the backing source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigProviderError`] when the source is unavailable;
    /// implementations must flip provenance to fallback rather than serving
    /// stale data as authoritative.
    fn refresh(&self) -> Result<(), ConfigProviderError>;
}

// ============================================================================
// SECTION: In-Memory Reference Implementations
// ============================================================================

/// In-memory telemetry store for tests and embedders.
///
/// # Invariants
/// - Increments are applied under one mutex, satisfying the atomicity
///   contract within a single process.
#[derive(Debug, Default)]
pub struct InMemoryTelemetryStore {
    /// Buckets keyed by (user, marketplace, day).
    buckets: Mutex<BTreeMap<(UserId, Marketplace, String), RecentTelemetry>>,
}

impl InMemoryTelemetryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a bucket with telemetry (test helper).
    pub fn seed(
        &self,
        user_id: UserId,
        marketplace: Marketplace,
        day: &DayKey,
        telemetry: RecentTelemetry,
    ) {
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        buckets.insert((user_id, marketplace, day.as_str().to_string()), telemetry);
    }
}

impl TelemetryStore for InMemoryTelemetryStore {
    fn load(
        &self,
        user_id: UserId,
        marketplace: Marketplace,
        day: &DayKey,
    ) -> Result<Option<RecentTelemetry>, TelemetryError> {
        let buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(buckets.get(&(user_id, marketplace, day.as_str().to_string())).cloned())
    }

    fn apply_increment(
        &self,
        user_id: UserId,
        marketplace: Marketplace,
        day: &DayKey,
        increment: &TelemetryIncrement,
    ) -> Result<(), TelemetryError> {
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        let bucket = buckets
            .entry((user_id, marketplace, day.as_str().to_string()))
            .or_default();
        bucket.signal_checks_today =
            bucket.signal_checks_today.saturating_add(increment.signal_checks);
        bucket.partial_fetches_today =
            bucket.partial_fetches_today.saturating_add(increment.partial_fetches);
        bucket.full_scrapes_today =
            bucket.full_scrapes_today.saturating_add(increment.full_scrapes);
        bucket.proxy_gb_today += increment.proxy_gb_estimated;
        bucket.cost_usd_today += increment.cost_usd_estimated;
        Ok(())
    }
}

/// In-memory audit sink for tests and embedders.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    /// Recorded events, in arrival order.
    events: Mutex<Vec<EnforcementEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<EnforcementEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: &EnforcementEvent) -> Result<(), AuditError> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event.clone());
        Ok(())
    }
}
