// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod output;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::ConfigFile;
use crate::dag::{RunRequest, WorkSet, select};
use crate::engine::execute;
use crate::errors::Result;
use crate::exec::{CommandInvoker, RemoteDirResolver};
use crate::output::{ConsolePrinter, OutputPrinter, RunSummary, render_report};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - selection and dependency closure
/// - printer, directory resolver and command invoker
/// - the tiered runtime
///
/// Returns whether every selected project succeeded.
pub async fn run(args: CliArgs) -> Result<bool> {
    let config_path = args.config.clone();
    let cfg = Arc::new(load_and_validate(&config_path)?);

    let request =
        RunRequest::new(&args.action, &args.group).with_projects(args.projects.iter().cloned());

    if args.dry_run {
        let work = select(&cfg, &request)?;
        print_dry_run(&request, &work);
        return Ok(true);
    }

    let base_dir = resolve_base_dir(&cfg, &config_path, args.base_dir.as_deref());
    debug!(base_dir = %base_dir.display(), "resolved base directory");

    let printer: Arc<dyn OutputPrinter> = if args.quiet {
        Arc::new(ConsolePrinter::quiet())
    } else {
        Arc::new(ConsolePrinter::new())
    };
    let resolver = Arc::new(RemoteDirResolver::new()?);
    let invoker = Arc::new(CommandInvoker::new(
        Arc::clone(&cfg),
        base_dir,
        resolver,
        Arc::clone(&printer),
    ));

    let records = execute(&cfg, &request, invoker, printer).await?;
    if records.is_empty() {
        warn!(
            action = %request.action,
            group = %request.group,
            "no project matched; nothing to run"
        );
    }

    print!("{}", render_report(&records));

    let summary = RunSummary::from_records(&records);
    info!(?summary, "run complete");
    Ok(summary.is_success())
}

/// Pick the directory projects are resolved under.
///
/// CLI flag first, then `[config].base_dir` (relative to the config file),
/// then the config file's own directory.
fn resolve_base_dir(cfg: &ConfigFile, config_path: &Path, cli_base: Option<&str>) -> PathBuf {
    if let Some(dir) = cli_base {
        return PathBuf::from(dir);
    }
    let root = config_root_dir(config_path);
    match &cfg.config.base_dir {
        Some(dir) => root.join(dir),
        None => root,
    }
}

/// Directory containing the config file, or "." for a bare filename.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Print the selected work items tier by tier without running anything.
fn print_dry_run(request: &RunRequest, work: &WorkSet) {
    println!("fleetrun dry-run");
    println!("  action = {}", request.action);
    println!("  group  = {}", request.group);
    println!();

    println!("work items ({}):", work.len());
    for tier in work.tiers() {
        println!("  priority {tier}:");
        for item in work.items().iter().filter(|i| i.priority == tier) {
            println!("    - {} [{}]", item.project, item.group);
            if !item.needs.is_empty() {
                println!("        needs: {:?}", item.needs);
            }
        }
    }

    debug!("dry-run complete (no execution)");
}
