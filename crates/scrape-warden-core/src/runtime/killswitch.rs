// crates/scrape-warden-core/src/runtime/killswitch.rs
// ============================================================================
// Module: Scrape Warden Kill Switch Evaluator
// Description: Provenance-gated operator kill switches for scraper classes.
// Purpose: Decide whether any scraping may run before budgets are consulted.
// Dependencies: serde, crate::core::{identifiers, time}
// ============================================================================

//! ## Overview
//! Kill switches are the operator's instant off-button: global, per
//! marketplace, and per worker class. Evaluation is provenance-gated: a
//! config that came from the fallback path (store unreachable, parse
//! failure) is never trusted — missing configuration means nothing runs,
//! not "everything enabled".

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::Marketplace;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Kill Switch Configuration
// ============================================================================

/// Per-marketplace enable flags.
///
/// # Invariants
/// - Within a db-provenance config, an absent flag defaults to enabled; the
///   fail-closed posture is owned by the provenance tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceSwitches {
    /// eBay scrapers enabled.
    pub ebay: bool,
    /// Facebook Marketplace scrapers enabled.
    pub facebook_marketplace: bool,
    /// Vinted scrapers enabled.
    pub vinted: bool,
    /// Gumtree scrapers enabled.
    pub gumtree: bool,
    /// Amazon scrapers enabled.
    pub amazon: bool,
    /// Craigslist scrapers enabled.
    pub craigslist: bool,
}

impl Default for MarketplaceSwitches {
    fn default() -> Self {
        Self {
            ebay: true,
            facebook_marketplace: true,
            vinted: true,
            gumtree: true,
            amazon: true,
            craigslist: true,
        }
    }
}

impl MarketplaceSwitches {
    /// Returns the flag for a marketplace.
    #[must_use]
    pub const fn enabled(&self, marketplace: Marketplace) -> bool {
        match marketplace {
            Marketplace::Ebay => self.ebay,
            Marketplace::FacebookMarketplace => self.facebook_marketplace,
            Marketplace::Vinted => self.vinted,
            Marketplace::Gumtree => self.gumtree,
            Marketplace::Amazon => self.amazon,
            Marketplace::Craigslist => self.craigslist,
        }
    }
}

/// Operator kill-switch configuration.
///
/// # Invariants
/// - Demo-mode fields are data for callers (the config crate validates the
///   expiry); [`evaluate_kill_switch`] does not consult them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KillSwitchConfig {
    /// Master flag: when false, no scraper of any kind runs.
    pub scrapers_enabled: bool,
    /// Per-marketplace flags.
    pub marketplaces: MarketplaceSwitches,
    /// Realtime worker class enabled.
    pub realtime_enabled: bool,
    /// Scheduled worker class enabled.
    pub scheduled_enabled: bool,
    /// Manual worker class enabled.
    pub manual_enabled: bool,
    /// Demo mode flag.
    pub demo_mode_enabled: bool,
    /// Demo mode expiry, when demo mode is bounded.
    pub demo_mode_expiry: Option<Timestamp>,
}

impl Default for KillSwitchConfig {
    fn default() -> Self {
        Self {
            scrapers_enabled: true,
            marketplaces: MarketplaceSwitches::default(),
            realtime_enabled: true,
            scheduled_enabled: true,
            manual_enabled: true,
            demo_mode_enabled: false,
            demo_mode_expiry: None,
        }
    }
}

// ============================================================================
// SECTION: Worker Classes and Provenance
// ============================================================================

/// Scraper worker class.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerClass {
    /// User-triggered realtime scrape.
    Realtime,
    /// Scheduler-triggered periodic scrape.
    Scheduled,
    /// Operator-triggered manual scrape.
    Manual,
}

impl fmt::Display for WorkerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Realtime => "realtime",
            Self::Scheduled => "scheduled",
            Self::Manual => "manual",
        };
        f.write_str(label)
    }
}

/// Provenance of a kill-switch config value.
///
/// # Invariants
/// - `Fallback` marks a config that did not come from the authoritative
///   store; it must never be treated as permissive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Loaded from the authoritative configuration store.
    Db,
    /// Built-in fallback used when the store was unavailable.
    Fallback,
}

// ============================================================================
// SECTION: Kill Switch Verdict
// ============================================================================

/// Reason code for a kill-switch verdict.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KillSwitchCode {
    /// All checks passed.
    Allowed,
    /// Config provenance was fallback; nothing may run.
    ConfigUnavailable,
    /// The master scrapers flag is off.
    ScrapersDisabled,
    /// The marketplace flag is off.
    MarketplaceDisabled,
    /// The worker-class flag is off.
    WorkerDisabled,
}

/// Kill-switch evaluation result.
///
/// # Invariants
/// - `allowed` is true exactly when `code` is [`KillSwitchCode::Allowed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillSwitchVerdict {
    /// Whether the worker may run.
    pub allowed: bool,
    /// Reason code for the verdict.
    pub code: KillSwitchCode,
}

impl KillSwitchVerdict {
    /// Builds a not-allowed verdict with the given code.
    const fn denied(code: KillSwitchCode) -> Self {
        Self {
            allowed: false,
            code,
        }
    }
}

// ============================================================================
// SECTION: Kill Switch Evaluation
// ============================================================================

/// Evaluates the kill switches for one (marketplace, worker class) pair.
///
/// Fallback provenance always yields `CONFIG_UNAVAILABLE` regardless of the
/// config contents. Otherwise checks run in order — master flag, marketplace
/// flag, worker-class flag — and the first violation wins.
#[must_use]
pub fn evaluate_kill_switch(
    config: &KillSwitchConfig,
    marketplace: Marketplace,
    worker_class: WorkerClass,
    source: ConfigSource,
) -> KillSwitchVerdict {
    if source == ConfigSource::Fallback {
        return KillSwitchVerdict::denied(KillSwitchCode::ConfigUnavailable);
    }
    if !config.scrapers_enabled {
        return KillSwitchVerdict::denied(KillSwitchCode::ScrapersDisabled);
    }
    if !config.marketplaces.enabled(marketplace) {
        return KillSwitchVerdict::denied(KillSwitchCode::MarketplaceDisabled);
    }
    let worker_enabled = match worker_class {
        WorkerClass::Realtime => config.realtime_enabled,
        WorkerClass::Scheduled => config.scheduled_enabled,
        WorkerClass::Manual => config.manual_enabled,
    };
    if !worker_enabled {
        return KillSwitchVerdict::denied(KillSwitchCode::WorkerDisabled);
    }
    KillSwitchVerdict {
        allowed: true,
        code: KillSwitchCode::Allowed,
    }
}
