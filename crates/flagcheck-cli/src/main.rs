// crates/flagcheck-cli/src/main.rs
// ============================================================================
// Module: flagcheck CLI Entry Point
// Description: Command dispatcher for parameter checks and configuration tools.
// Purpose: Provide a localized CLI over the flagcheck resolver.
// Dependencies: clap, flagcheck-core, flagcheck-config, serde, thiserror.
// ============================================================================

//! ## Overview
//! The flagcheck CLI loads a `flagcheck.toml`, builds the standard parameter
//! registry for the configured environment, and runs one resolution pass.
//! All user-facing strings are routed through the message catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use flagcheck_cli::t;
use flagcheck_config::FlagCheckConfig;
use flagcheck_config::config_toml_example;
use flagcheck_core::InMemoryParameterStore;
use flagcheck_core::Mode;
use flagcheck_core::Outcome;
use flagcheck_core::ParamValue;
use flagcheck_core::PassReport;
use flagcheck_core::Verbosity;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "flagcheck", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one resolution pass over the configured parameters.
    Check(CheckCommand),
    /// Print the resolution order and each parameter's prerequisites.
    Order(OrderCommand),
    /// Print the built-in example configuration.
    Example,
}

/// Arguments for the check command.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Optional config file path (defaults to `flagcheck.toml` or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the configured resolution mode.
    #[arg(long, value_enum, value_name = "MODE")]
    mode: Option<ModeArg>,
    /// Report fatal violations only.
    #[arg(long, action = ArgAction::SetTrue)]
    quiet: bool,
    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for the order command.
#[derive(Args, Debug)]
struct OrderCommand {
    /// Optional config file path (defaults to `flagcheck.toml` or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Resolution mode selection.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum ModeArg {
    /// Any violation fails the pass.
    Strict,
    /// Repairable violations are clamped into range.
    AutoRepair,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Strict => Self::Strict,
            ModeArg::AutoRepair => Self::AutoRepair,
        }
    }
}

/// Report output formats.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

/// JSON payload of the check command.
#[derive(Serialize)]
struct CheckOutput<'a> {
    /// Pass report.
    report: &'a PassReport,
    /// Final values of the parameters the pass changed.
    changed: BTreeMap<&'a str, ParamValue>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing failures.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
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
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Parses arguments and dispatches the selected command.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Check(command) => command_check(&command),
        Commands::Order(command) => command_order(&command),
        Commands::Example => command_example(),
    }
}

/// Prints CLI help output.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes one resolution pass and prints its report.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let mut config = load_config(command.config.as_deref())?;
    if let Some(mode) = command.mode {
        config.resolver.mode = mode.into();
    }
    if command.quiet {
        config.resolver.verbosity = Verbosity::Quiet;
    }
    let resolver =
        config.resolver().map_err(|err| CliError::new(t!("config.build_failed", error = err)))?;
    let mut store =
        config.store().map_err(|err| CliError::new(t!("config.build_failed", error = err)))?;
    let report = resolver
        .resolve(&mut store)
        .map_err(|err| CliError::new(t!("check.resolve_failed", error = err)))?;

    match command.format {
        OutputFormat::Text => render_report_text(&report)?,
        OutputFormat::Json => render_report_json(&report, &store)?,
    }
    Ok(if report.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Renders the pass report in text form.
fn render_report_text(report: &PassReport) -> CliResult<()> {
    let mut output = String::new();
    for entry in &report.entries {
        let line = match &entry.outcome {
            Outcome::Accept => continue,
            Outcome::Repaired {
                value,
                reason,
            } => t!(
                "check.entry.repaired",
                parameter = entry.parameter,
                value = value,
                reason = reason
            ),
            Outcome::Normalized {
                target,
                value,
                note: Some(note),
            } => t!(
                "check.entry.normalized_note",
                parameter = entry.parameter,
                target = target,
                value = value,
                note = note
            ),
            Outcome::Normalized {
                target,
                value,
                note: None,
            } => t!(
                "check.entry.normalized",
                parameter = entry.parameter,
                target = target,
                value = value
            ),
            Outcome::Violation {
                violation,
            } => t!("check.entry.violation", parameter = entry.parameter, message = violation),
        };
        output.push_str(&line);
        output.push('\n');
    }
    let summary = match &report.failure {
        Some(failure) => t!(
            "check.summary.failed",
            mode = report.mode,
            parameter = failure.parameter,
            message = failure.message
        ),
        None => t!(
            "check.summary.ok",
            mode = report.mode,
            checked = report.entries.len(),
            changed = report.changes().count()
        ),
    };
    output.push_str(&summary);
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Renders the pass report and changed values as JSON.
fn render_report_json(report: &PassReport, store: &InMemoryParameterStore) -> CliResult<()> {
    let mut changed = BTreeMap::new();
    for entry in report.changes() {
        let target = match &entry.outcome {
            Outcome::Normalized {
                target, ..
            } => target,
            _ => &entry.parameter,
        };
        if let Some(stored) = store.entry(target.as_str()) {
            changed.insert(target.as_str(), stored.value.clone());
        }
    }
    let payload = CheckOutput {
        report,
        changed,
    };
    let json = serde_json::to_string_pretty(&payload)
        .map_err(|err| CliError::new(t!("check.serialize_failed", error = err)))?;
    write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Order Command
// ============================================================================

/// Prints the resolution order for the configured environment.
fn command_order(command: &OrderCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let resolver =
        config.resolver().map_err(|err| CliError::new(t!("config.build_failed", error = err)))?;
    let mut output = String::new();
    for (index, entry) in resolver.registry().entries().iter().enumerate() {
        let position = index + 1;
        let prerequisites = entry.prerequisites();
        let line = if prerequisites.is_empty() {
            t!("order.entry", position = position, parameter = entry.name())
        } else {
            let joined =
                prerequisites.iter().map(|name| name.as_str()).collect::<Vec<_>>().join(", ");
            t!(
                "order.entry.after",
                position = position,
                parameter = entry.name(),
                prerequisites = joined
            )
        };
        output.push_str(&line);
        output.push('\n');
    }
    write_stdout_bytes(output.as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Example Command
// ============================================================================

/// Prints the built-in example configuration.
fn command_example() -> CliResult<ExitCode> {
    write_stdout_bytes(config_toml_example().as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads configuration, mapping failures to a catalog message.
fn load_config(path: Option<&Path>) -> CliResult<FlagCheckConfig> {
    FlagCheckConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
