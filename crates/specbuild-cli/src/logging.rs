//! Tracing subscriber setup for the `specbuild` binary.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event, for CI log collectors.
    Json,
}

/// Filter directive for a `-v` count.
pub fn level_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Call once, from `main`.
pub fn init_logging(verbose: u8, format: LogFormat) {
    let filter = EnvFilter::new(level_directive(verbose));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
