// api-probe-cli/src/main.rs
// ============================================================================
// Module: API Probe CLI Entry Point
// Description: Command dispatcher for configuration and probe workflows.
// Purpose: Provide a fail-fast CLI for config validation and single probes.
// Dependencies: api-probe-client, api-probe-config, clap, thiserror.
// ============================================================================

//! ## Overview
//! The API Probe CLI resolves the immutable execution settings and either
//! validates them (`config validate`) or dispatches a single probe against
//! the configured origin (`check`), mapping the probe outcome to the exit
//! code. A malformed configuration halts the run before any request is
//! dispatched. All user-facing strings are routed through the message
//! catalog. Security posture: inputs are untrusted and must be validated;
//! see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use api_probe_cli::t;
use api_probe_client::ProbeClient;
use api_probe_client::ProbeReport;
use api_probe_config::ConfigOverrides;
use api_probe_config::ExecutionConfig;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default probe path when `check` is invoked without `--path`.
const DEFAULT_CHECK_PATH: &str = "/";

// ============================================================================
// SECTION: CLI Definition
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "api-probe", disable_help_subcommand = true, disable_version_flag = true)]
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
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Dispatch a single probe against the configured origin.
    Check(CheckCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Resolve and validate the harness configuration.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to api-probe.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Optional config file path (defaults to api-probe.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Origin override applied ahead of file values and `BASE_URL`.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Probe path joined onto the configured origin.
    #[arg(long, value_name = "PATH")]
    path: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Terminal CLI error carrying a localized message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
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

/// Executes the CLI command dispatcher.
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
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Check(command) => command_check(&command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the `config validate` command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    ExecutionConfig::resolve_with(command.config.as_deref(), &ConfigOverrides::from_env())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes the `check` command: one probe, exit code by outcome.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let mut overrides = ConfigOverrides::from_env();
    if let Some(base_url) = &command.base_url {
        overrides.base_url = Some(base_url.clone());
    }
    let config = ExecutionConfig::resolve_with(command.config.as_deref(), &overrides)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let client = ProbeClient::new(&config)
        .map_err(|err| CliError::new(t!("check.client.init_failed", error = err)))?;
    let path = command.path.as_deref().unwrap_or(DEFAULT_CHECK_PATH);
    let report = client
        .probe(path)
        .map_err(|err| CliError::new(t!("check.request.failed", error = err)))?;

    write_stdout_line(&t!("check.report.target", base_url = config.base_url(), path = path))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    for line in report_lines(&report) {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(check_exit_code(&report))
}

/// Formats the report lines for one probe outcome.
fn report_lines(report: &ProbeReport) -> Vec<String> {
    let verdict = if report.is_success() {
        t!("check.result.pass")
    } else {
        t!("check.result.fail")
    };
    vec![
        t!("check.report.status", status = report.status),
        t!("check.report.elapsed", elapsed = report.elapsed_ms()),
        t!("check.report.bytes", bytes = report.body_bytes),
        verdict,
    ]
}

/// Maps a probe outcome to the process exit code.
fn check_exit_code(report: &ProbeReport) -> ExitCode {
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout, surfacing write failures to the caller.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr, surfacing write failures to the caller.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
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
