// crates/scrape-warden-config/src/provider.rs
// ============================================================================
// Module: Scrape Warden Config Providers
// Description: File-backed and static implementations of the config seam.
// Purpose: Serve cached config with provenance that fails closed on errors.
// Dependencies: scrape-warden-core, crate::config
// ============================================================================

//! ## Overview
//! Providers are owned by the caller's composition root; there is no ambient
//! global cache. [`FileConfigProvider`] loads once at construction and again
//! on [`refresh`](scrape_warden_core::ConfigProvider::refresh). Any load
//! failure flips the served provenance to [`ConfigSource::Fallback`], which
//! the kill-switch evaluator maps to `CONFIG_UNAVAILABLE`; the last good
//! config is never served as authoritative.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::PoisonError;

use scrape_warden_core::ConfigProvider;
use scrape_warden_core::ConfigProviderError;
use scrape_warden_core::ConfigSource;
use scrape_warden_core::EntitlementsSnapshot;
use scrape_warden_core::KillSwitchConfig;
use scrape_warden_core::Marketplace;
use scrape_warden_core::MarketplaceTuning;
use scrape_warden_core::TierKey;

use crate::config::WardenConfig;

// ============================================================================
// SECTION: File Provider
// ============================================================================

/// Cached provider state: the active config and its provenance.
#[derive(Debug, Clone)]
struct ProviderState {
    /// Active configuration document.
    config: WardenConfig,
    /// Provenance of the active document.
    source: ConfigSource,
}

/// File-backed configuration provider.
///
/// # Invariants
/// - Provenance is [`ConfigSource::Db`] only while the most recent load from
///   the backing file succeeded; any failure flips it to
///   [`ConfigSource::Fallback`] until a successful refresh.
#[derive(Debug)]
pub struct FileConfigProvider {
    /// Backing TOML file path.
    path: PathBuf,
    /// Cached state behind a mutex; reads clone, refresh swaps.
    state: Mutex<ProviderState>,
}

impl FileConfigProvider {
    /// Creates a provider over a TOML file, attempting an initial load.
    ///
    /// A failed initial load still yields a provider; it serves built-in
    /// defaults under fallback provenance until [`ConfigProvider::refresh`]
    /// succeeds.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let state = match WardenConfig::load(&path) {
            Ok(config) => ProviderState {
                config,
                source: ConfigSource::Db,
            },
            Err(_) => ProviderState {
                config: WardenConfig::default(),
                source: ConfigSource::Fallback,
            },
        };
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    /// Returns the provenance of the currently served config.
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.lock().source
    }

    /// Returns a copy of the currently served config.
    #[must_use]
    pub fn config(&self) -> WardenConfig {
        self.lock().config.clone()
    }

    /// Locks the cached state, recovering from poisoning.
    fn lock(&self) -> std::sync::MutexGuard<'_, ProviderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConfigProvider for FileConfigProvider {
    fn kill_switches(&self) -> (KillSwitchConfig, ConfigSource) {
        let state = self.lock();
        (state.config.kill_switches.clone(), state.source)
    }

    fn tuning(&self, marketplace: Marketplace) -> MarketplaceTuning {
        self.lock().config.tuning_for(marketplace)
    }

    fn entitlements(&self, tier: TierKey) -> EntitlementsSnapshot {
        EntitlementsSnapshot::for_tier(tier)
    }

    fn refresh(&self) -> Result<(), ConfigProviderError> {
        match WardenConfig::load(&self.path) {
            Ok(config) => {
                let mut state = self.lock();
                state.config = config;
                state.source = ConfigSource::Db;
                Ok(())
            }
            Err(err) => {
                let mut state = self.lock();
                state.source = ConfigSource::Fallback;
                Err(ConfigProviderError::RefreshFailed(err.to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Static Provider
// ============================================================================

/// Fixed-config provider for tests and embedders.
#[derive(Debug, Clone)]
pub struct StaticConfigProvider {
    /// Served configuration document.
    config: WardenConfig,
    /// Served provenance.
    source: ConfigSource,
}

impl StaticConfigProvider {
    /// Creates a provider serving the given config as authoritative.
    #[must_use]
    pub const fn authoritative(config: WardenConfig) -> Self {
        Self {
            config,
            source: ConfigSource::Db,
        }
    }

    /// Creates a provider serving built-in defaults under fallback
    /// provenance.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            config: WardenConfig::default(),
            source: ConfigSource::Fallback,
        }
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn kill_switches(&self) -> (KillSwitchConfig, ConfigSource) {
        (self.config.kill_switches.clone(), self.source)
    }

    fn tuning(&self, marketplace: Marketplace) -> MarketplaceTuning {
        self.config.tuning_for(marketplace)
    }

    fn entitlements(&self, tier: TierKey) -> EntitlementsSnapshot {
        EntitlementsSnapshot::for_tier(tier)
    }

    fn refresh(&self) -> Result<(), ConfigProviderError> {
        Ok(())
    }
}
