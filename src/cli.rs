// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::types::WILDCARD_GROUP;

/// Command-line arguments for `fleetrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fleetrun",
    version,
    about = "Run an action across projects in dependency and priority order.",
    long_about = None
)]
pub struct CliArgs {
    /// Action to run (e.g. `build`, `test`).
    #[arg(value_name = "ACTION")]
    pub action: String,

    /// Group of the action to run. Projects without it fall back to `"*"`.
    #[arg(value_name = "GROUP", default_value = WILDCARD_GROUP)]
    pub group: String,

    /// Restrict the run to these projects (plus what they need).
    ///
    /// May be given several times. Default: every project.
    #[arg(long = "project", short = 'p', value_name = "NAME")]
    pub projects: Vec<String>,

    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Directory project working directories are resolved under.
    ///
    /// Overrides `[config].base_dir`. Default: the config file's directory.
    #[arg(long, value_name = "PATH")]
    pub base_dir: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FLEETRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Select and print the plan, but don't run any commands.
    #[arg(long)]
    pub dry_run: bool,

    /// Don't stream command output; only print the final report.
    #[arg(long, short = 'q')]
    pub quiet: bool,
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
