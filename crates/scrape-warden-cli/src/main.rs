// crates/scrape-warden-cli/src/main.rs
// ============================================================================
// Module: Scrape Warden CLI Entry Point
// Description: Command dispatcher for enforcement, tuning, and config checks.
// Purpose: Provide an operator surface over the pure decision engine.
// Dependencies: clap, scrape-warden-config, scrape-warden-core, serde, thiserror
// ============================================================================

//! ## Overview
//! The Scrape Warden CLI wraps the decision engine for operators and replay
//! tooling: evaluate an enforcement request from JSON, resolve marketplace
//! tuning, compute listing delta signals, and validate configuration files.
//!
//! This binary is the only place wall-clock time is read; `--now` overrides
//! it so recorded decisions can be replayed bit-for-bit.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use scrape_warden_config::WardenConfig;
use scrape_warden_core::ActionKind;
use scrape_warden_core::CostModel;
use scrape_warden_core::CountryCode;
use scrape_warden_core::EnforcementInput;
use scrape_warden_core::JobId;
use scrape_warden_core::Marketplace;
use scrape_warden_core::RecentTelemetry;
use scrape_warden_core::TierKey;
use scrape_warden_core::Timestamp;
use scrape_warden_core::TuningTelemetry;
use scrape_warden_core::UserId;
use scrape_warden_core::compute_delta_signal;
use scrape_warden_core::evaluate_enforcement;
use scrape_warden_core::resolve_tuning_with;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "scrape-warden", version, about = "Admission control for marketplace scrapers")]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate one enforcement request from a JSON document.
    Evaluate(EvaluateCommand),
    /// Resolve tuning for a marketplace and tier.
    Tuning(TuningCommand),
    /// Compute the delta signal between two listing hash files.
    Delta(DeltaCommand),
    /// Validate a TOML configuration file.
    CheckConfig(CheckConfigCommand),
}

/// Arguments for the evaluate subcommand.
#[derive(Args, Debug)]
struct EvaluateCommand {
    /// Path to the enforcement request JSON document.
    #[arg(long)]
    input: PathBuf,
    /// Optional TOML config supplying forecast knobs.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Evaluation time as unix milliseconds (defaults to the wall clock).
    #[arg(long)]
    now: Option<i64>,
}

/// Arguments for the tuning subcommand.
#[derive(Args, Debug)]
struct TuningCommand {
    /// Marketplace key (for example `ebay`).
    #[arg(long)]
    marketplace: Marketplace,
    /// Tenant tier key (for example `pro`).
    #[arg(long)]
    tier: TierKey,
    /// Optional ISO-3166 alpha-2 country code.
    #[arg(long)]
    country: Option<String>,
    /// Proxy usage over quota, in `[0, 1]`.
    #[arg(long)]
    proxy_ratio: Option<f64>,
    /// Full scrapes over cap, in `[0, 1]`.
    #[arg(long)]
    full_ratio: Option<f64>,
    /// Optional TOML config supplying tuning overrides.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Arguments for the delta subcommand.
#[derive(Args, Debug)]
struct DeltaCommand {
    /// Newline-delimited current listing hashes.
    #[arg(long)]
    current: PathBuf,
    /// Newline-delimited last-seen listing hashes.
    #[arg(long)]
    last_seen: PathBuf,
}

/// Arguments for the check-config subcommand.
#[derive(Args, Debug)]
struct CheckConfigCommand {
    /// Path to the TOML config file.
    path: PathBuf,
}

// ============================================================================
// SECTION: Request Document
// ============================================================================

/// On-disk enforcement request: [`EnforcementInput`] with an optional `now`.
///
/// # Invariants
/// - `now` resolution order: `--now` flag, then this field, then the wall
///   clock.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EvaluateRequest {
    /// Tenant being evaluated.
    user_id: UserId,
    /// Tenant tier.
    tier: TierKey,
    /// Marketplace the action targets.
    marketplace: Marketplace,
    /// Action the dispatcher wants to run.
    requested: ActionKind,
    /// Optional job identifier for audit correlation.
    #[serde(default)]
    job_id: Option<JobId>,
    /// Optional evaluation time as unix milliseconds.
    #[serde(default)]
    now: Option<i64>,
    /// Rolling telemetry for the current day bucket.
    #[serde(default)]
    telemetry: RecentTelemetry,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            let _ = write_stderr_line(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Evaluate(command) => command_evaluate(&command),
        Commands::Tuning(command) => command_tuning(&command),
        Commands::Delta(command) => command_delta(&command),
        Commands::CheckConfig(command) => command_check_config(&command),
    }
}

// ============================================================================
// SECTION: Command Handlers
// ============================================================================

/// Runs the enforcer over a request document and prints the decision.
fn command_evaluate(command: &EvaluateCommand) -> CliResult<ExitCode> {
    let raw = read_file(&command.input)?;
    let request: EvaluateRequest = serde_json::from_str(&raw)
        .map_err(|err| CliError::new(format!("invalid request document: {err}")))?;

    let now = match command.now.or(request.now) {
        Some(millis) => Timestamp::from_unix_millis(millis),
        None => wall_clock_now()?,
    };
    let cost_model = match &command.config {
        Some(path) => CostModel::new(load_config(path)?.forecast),
        None => CostModel::default(),
    };

    let input = EnforcementInput {
        user_id: request.user_id,
        tier: request.tier,
        marketplace: request.marketplace,
        requested: request.requested,
        job_id: request.job_id,
        now,
        telemetry: request.telemetry,
    };
    let decision = evaluate_enforcement(&input, &cost_model);
    write_json(&decision)?;
    if decision.allowed {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

/// Resolves tuning for a marketplace and tier and prints it.
fn command_tuning(command: &TuningCommand) -> CliResult<ExitCode> {
    let tuning = match &command.config {
        Some(path) => load_config(path)?.tuning_for(command.marketplace),
        None => scrape_warden_core::MarketplaceTuning::default_for(command.marketplace),
    };
    let country = command.country.as_deref().map(CountryCode::new);
    let telemetry = match (command.proxy_ratio, command.full_ratio) {
        (None, None) => None,
        (proxy, full) => Some(TuningTelemetry {
            proxy_usage_ratio: proxy.unwrap_or(0.0),
            full_scrape_ratio: full.unwrap_or(0.0),
        }),
    };
    let resolved =
        resolve_tuning_with(&tuning, command.tier, country.as_ref(), telemetry.as_ref());
    write_json(&resolved)?;
    Ok(ExitCode::SUCCESS)
}

/// Computes and prints the delta signal between two hash files.
fn command_delta(command: &DeltaCommand) -> CliResult<ExitCode> {
    let current = read_hash_lines(&command.current)?;
    let last_seen = read_hash_lines(&command.last_seen)?;
    let signal = compute_delta_signal(&current, &last_seen);
    write_json(&signal)?;
    Ok(ExitCode::SUCCESS)
}

/// Validates a TOML config file, printing findings.
fn command_check_config(command: &CheckConfigCommand) -> CliResult<ExitCode> {
    match WardenConfig::load(&command.path) {
        Ok(_) => {
            write_stdout_line("config ok")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            write_stdout_line(&err.to_string())?;
            Ok(ExitCode::from(1))
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads the wall clock as a unix-millis timestamp.
fn wall_clock_now() -> CliResult<Timestamp> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| CliError::new(format!("system clock before unix epoch: {err}")))?;
    let millis = i64::try_from(elapsed.as_millis())
        .map_err(|_| CliError::new("system clock out of range"))?;
    Ok(Timestamp::from_unix_millis(millis))
}

/// Loads and validates a TOML config file.
fn load_config(path: &Path) -> CliResult<WardenConfig> {
    WardenConfig::load(path).map_err(|err| CliError::new(err.to_string()))
}

/// Reads a file to a string.
fn read_file(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|err| CliError::new(format!("cannot read {}: {err}", path.display())))
}

/// Reads newline-delimited hashes, dropping blank lines.
fn read_hash_lines(path: &Path) -> CliResult<Vec<String>> {
    let raw = read_file(path)?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Writes a value to stdout as pretty JSON.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("cannot render output: {err}")))?;
    write_stdout_line(&rendered)
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
        .map_err(|err| CliError::new(format!("stdout write failed: {err}")))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> CliResult<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
        .map_err(|err| CliError::new(format!("stderr write failed: {err}")))
}
