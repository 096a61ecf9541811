// crates/scrape-warden-config/tests/provider_refresh.rs
// ============================================================================
// Module: Config Provider Tests
// Description: Validate provenance flips and recovery for file providers.
// Purpose: Ensure stale or broken config is never served as authoritative.
// ============================================================================

//! ## Overview
//! Exercises `FileConfigProvider` through its full lifecycle: healthy load,
//! corruption, fallback provenance, and recovery after repair.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;
use std::path::PathBuf;

use scrape_warden_config::FileConfigProvider;
use scrape_warden_config::StaticConfigProvider;
use scrape_warden_config::WardenConfig;
use scrape_warden_core::ConfigProvider;
use scrape_warden_core::ConfigSource;
use scrape_warden_core::KillSwitchCode;
use scrape_warden_core::Marketplace;
use scrape_warden_core::MarketplaceTuning;
use scrape_warden_core::TierKey;
use scrape_warden_core::WorkerClass;
use scrape_warden_core::evaluate_kill_switch;
use tempfile::TempDir;

type TestResult = Result<(), String>;

fn config_path(dir: &TempDir) -> PathBuf {
    dir.path().join("scrape-warden.toml")
}

fn write(path: &PathBuf, content: &str) -> TestResult {
    fs::write(path, content).map_err(|err| err.to_string())
}

#[test]
fn healthy_file_serves_db_provenance() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = config_path(&dir);
    write(&path, "[kill_switches]\nmanual_enabled = false\n")?;

    let provider = FileConfigProvider::new(&path);
    let (config, source) = provider.kill_switches();
    assert_eq!(source, ConfigSource::Db);
    assert!(!config.manual_enabled);
    assert!(config.scrapers_enabled);
    Ok(())
}

#[test]
fn missing_file_serves_fallback_that_blocks_everything() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let provider = FileConfigProvider::new(config_path(&dir));
    let (config, source) = provider.kill_switches();
    assert_eq!(source, ConfigSource::Fallback);

    // The defaults look permissive, but provenance gates them off.
    let verdict =
        evaluate_kill_switch(&config, Marketplace::Ebay, WorkerClass::Scheduled, source);
    assert!(!verdict.allowed);
    assert_eq!(verdict.code, KillSwitchCode::ConfigUnavailable);
    Ok(())
}

#[test]
fn corrupt_rewrite_flips_provenance_on_refresh() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = config_path(&dir);
    write(&path, "")?;

    let provider = FileConfigProvider::new(&path);
    assert_eq!(provider.source(), ConfigSource::Db);

    write(&path, "not toml [[[")?;
    assert!(provider.refresh().is_err());
    assert_eq!(provider.source(), ConfigSource::Fallback);
    Ok(())
}

#[test]
fn repairing_the_file_recovers_db_provenance() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = config_path(&dir);
    write(&path, "broken ===")?;

    let provider = FileConfigProvider::new(&path);
    assert_eq!(provider.source(), ConfigSource::Fallback);

    write(&path, "[kill_switches]\nscrapers_enabled = true\n")?;
    provider.refresh().map_err(|err| err.to_string())?;
    assert_eq!(provider.source(), ConfigSource::Db);
    Ok(())
}

#[test]
fn tuning_falls_back_to_the_built_in_table() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = config_path(&dir);
    write(&path, "")?;

    let provider = FileConfigProvider::new(&path);
    let tuning = provider.tuning(Marketplace::FacebookMarketplace);
    assert_eq!(tuning, MarketplaceTuning::default_for(Marketplace::FacebookMarketplace));
    Ok(())
}

#[test]
fn entitlements_are_the_static_tier_table() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = config_path(&dir);
    write(&path, "")?;

    let provider = FileConfigProvider::new(&path);
    let entitlements = provider.entitlements(TierKey::Pro);
    assert_eq!(entitlements.max_daily_runs, 160);
    assert_eq!(entitlements.tier, TierKey::Pro);
    Ok(())
}

#[test]
fn static_provider_serves_what_it_was_given() {
    let authoritative = StaticConfigProvider::authoritative(WardenConfig::default());
    let (_, source) = authoritative.kill_switches();
    assert_eq!(source, ConfigSource::Db);
    assert!(authoritative.refresh().is_ok());

    let fallback = StaticConfigProvider::fallback();
    let (_, source) = fallback.kill_switches();
    assert_eq!(source, ConfigSource::Fallback);
}
