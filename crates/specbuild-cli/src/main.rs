//! # specbuild CLI entry point
//!
//! Parses command-line arguments, loads the build configuration, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use specbuild_cli::builder::{run_build, BuildArgs};
use specbuild_cli::logging::{init_logging, LogFormat};
use specbuild_cli::tester::{run_test, TestArgs};
use specbuild_core::BuildConfig;

/// Specification build toolchain.
///
/// Composes the JSON Schema embedded in the markdown specification, exports
/// the specification as HTML, and checks sample documents against the schema.
#[derive(Parser, Debug)]
#[command(name = "specbuild", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// Path to configuration file (defaults to specbuild.yaml in the project root).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Project root; relative paths in the configuration are resolved against it.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose the schema, write the build directory, and export HTML.
    Build(BuildArgs),

    /// Check sample documents against the composed schema.
    Test(TestArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_format);

    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    tracing::debug!(root = %root.display(), "resolved project root");

    let config = match BuildConfig::discover(&root, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    };

    let result = match cli.command {
        Commands::Build(args) => run_build(&args, &config, &root),
        Commands::Test(args) => run_test(&args, &config, &root),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
