// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `buildweb`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "buildweb",
    version,
    about = "Rebuild web assets and the backend binary, and keep the backend running.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project config file (TOML).
    #[arg(long, global = true, value_name = "PATH", default_value = "buildweb.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUILDWEB_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Build everything for development and keep the backend running.
    Run {
        /// Arguments for the backend binary; replaces `package.run_args`.
        #[arg(last = true, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Build production assets and binaries for every distribution target.
    Dist {
        /// Don't gate the binary builds on the test suite.
        #[arg(long)]
        skip_tests: bool,
    },

    /// Parse + validate the config and print a summary; runs nothing.
    Check,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
