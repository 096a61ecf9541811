// crates/scrape-warden-config/src/config.rs
// ============================================================================
// Module: Scrape Warden Configuration
// Description: TOML config model and strict fail-closed validation.
// Purpose: Parse and validate kill switches, tuning overrides, and knobs.
// Dependencies: scrape-warden-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with a hard size limit. Absent
//! sections fall back to built-in defaults, but a file that fails to read,
//! parse, or validate is rejected outright; the provider layer then serves
//! fallback provenance, which the kill-switch evaluator treats as
//! not-allowed. Config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use scrape_warden_core::ForecastKnobs;
use scrape_warden_core::KillSwitchConfig;
use scrape_warden_core::Marketplace;
use scrape_warden_core::MarketplaceTuning;
use scrape_warden_core::TierKey;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data, naming the offending field.
    #[error("invalid config: {0}")]
    Validation(String),
}

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Root configuration document.
///
/// # Invariants
/// - Absent sections deserialize to built-in defaults; an absent file is a
///   provider-level concern and yields fallback provenance, not defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct WardenConfig {
    /// Operator kill switches.
    pub kill_switches: KillSwitchConfig,
    /// Per-marketplace tuning overrides; absent marketplaces use the
    /// built-in table.
    pub tuning: BTreeMap<Marketplace, MarketplaceTuning>,
    /// Forecast knob overrides.
    pub forecast: ForecastKnobs,
}

impl WardenConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing, or validation fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Validation(
                "config file exceeds size limit".to_string(),
            ));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Validation("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_kill_switches(&self.kill_switches)?;
        for (marketplace, tuning) in &self.tuning {
            validate_tuning(*marketplace, tuning)?;
        }
        validate_forecast(&self.forecast)?;
        Ok(())
    }

    /// Returns the tuning entry for a marketplace, falling back to the
    /// built-in table.
    #[must_use]
    pub fn tuning_for(&self, marketplace: Marketplace) -> MarketplaceTuning {
        self.tuning
            .get(&marketplace)
            .cloned()
            .unwrap_or_else(|| MarketplaceTuning::default_for(marketplace))
    }
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Validates the kill-switch section.
fn validate_kill_switches(switches: &KillSwitchConfig) -> Result<(), ConfigError> {
    if let Some(expiry) = switches.demo_mode_expiry
        && !expiry.is_valid()
    {
        return Err(ConfigError::Validation(
            "kill_switches.demo_mode_expiry must be a positive unix-millis timestamp".to_string(),
        ));
    }
    Ok(())
}

/// Validates one tuning override entry.
fn validate_tuning(
    marketplace: Marketplace,
    tuning: &MarketplaceTuning,
) -> Result<(), ConfigError> {
    for tier in TierKey::ALL {
        let concurrency = tuning.default_concurrency_by_tier.get(tier);
        if concurrency == 0 {
            return Err(ConfigError::Validation(format!(
                "tuning.{marketplace}.default_concurrency_by_tier.{tier} must be at least 1"
            )));
        }
        let rps = tuning.max_rps_by_tier.get(tier);
        if !rps.is_finite() || rps <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "tuning.{marketplace}.max_rps_by_tier.{tier} must be a positive finite number"
            )));
        }
    }
    for code in &tuning.kill_switch.countries {
        let raw = code.as_str();
        let normalized = raw.len() == 2 && raw.chars().all(|c| c.is_ascii_uppercase());
        if !normalized {
            return Err(ConfigError::Validation(format!(
                "tuning.{marketplace}.kill_switch.countries entry {raw:?} must be an uppercase \
                 two-letter code"
            )));
        }
    }
    Ok(())
}

/// Validates the forecast knob section.
fn validate_forecast(knobs: &ForecastKnobs) -> Result<(), ConfigError> {
    for (field, value) in [
        ("full_scrape_base_prob", knobs.full_scrape_base_prob),
        ("partial_fetch_base_prob", knobs.partial_fetch_base_prob),
    ] {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "forecast.{field} must be within [0, 1]"
            )));
        }
    }
    for (field, value) in [
        ("full_scrape_slope", knobs.full_scrape_slope),
        ("partial_fetch_slope", knobs.partial_fetch_slope),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "forecast.{field} must be a non-negative finite number"
            )));
        }
    }
    if knobs.model_version.is_empty() {
        return Err(ConfigError::Validation(
            "forecast.model_version must not be empty".to_string(),
        ));
    }
    Ok(())
}
