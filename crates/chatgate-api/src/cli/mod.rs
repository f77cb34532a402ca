//! CLI command definitions and dispatch for the `chatgate` binary.

pub mod config;
pub mod health;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Session-aware chat proxy in front of a conversational agent.
#[derive(Parser)]
#[command(name = "chatgate", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a TOML config file.
    #[arg(long, global = true, env = "CHATGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter implied by `--verbose` / `--quiet`.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "info,chatgate=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "8080", env = "CHATGATE_PORT")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "0.0.0.0", env = "CHATGATE_HOST")]
        host: String,
    },

    /// Probe the downstream agent once and report.
    Health,

    /// Print the effective configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
