//! # vcdi CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vcdi_cli::decode::{run_decode, DecodeArgs};
use vcdi_cli::fixture::{run_fixture, FixtureArgs};
use vcdi_cli::run::{run_run, RunArgs};
use vcdi_client::config::config_path;

/// EdDSA Data Integrity conformance harness.
///
/// Drives issuer and verifier implementations over HTTP and reports a
/// pass / fail / skip matrix per rule set.
#[derive(Parser, Debug)]
#[command(name = "vcdi", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to the runner configuration (default: $VCDI_CONFIG, then
    /// config/runner.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run rule sets against the configured implementations.
    Run(RunArgs),

    /// Decode a multibase value and report its multicodec prefix.
    Decode(DecodeArgs),

    /// Print a generated credential fixture.
    Fixture(FixtureArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "vcdi starting");

    let result = match &cli.command {
        Commands::Run(args) => run_run(args, &config_path(cli.config.as_deref())),
        Commands::Decode(args) => run_decode(args),
        Commands::Fixture(args) => run_fixture(args),
    };

    ExitCode::from(exit_status(result))
}

/// Map a handler result to the process exit status. Harness errors are
/// reported once, through the tracing subscriber, and exit with 2.
fn exit_status(result: anyhow::Result<u8>) -> u8 {
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            2
        }
    }
}
