// src/exec/backend.rs

//! Pluggable action invoker abstraction.
//!
//! The runtime talks to an `ActionInvoker` instead of spawning processes
//! itself. Production code uses [`CommandInvoker`]; tests provide their
//! own implementation that records calls and returns canned results.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::model::ConfigFile;
use crate::dag::WorkItem;
use crate::engine::OutcomeRecord;
use crate::exec::dir::DirResolver;
use crate::exec::task_runner::{CommandSpec, run_command};
use crate::output::OutputPrinter;

/// Future returned by [`ActionInvoker::invoke`]. It is `'static` so the
/// runtime can spawn it onto its own task.
pub type InvokeFuture = Pin<Box<dyn Future<Output = OutcomeRecord> + Send + 'static>>;

/// Trait abstracting how a single work item is executed.
///
/// Implementations never fail: spawn and runtime errors are reported in the
/// returned record's exit code, signal and stderr.
pub trait ActionInvoker: Send + Sync {
    fn invoke(&self, item: WorkItem) -> InvokeFuture;
}

/// Invoker that runs the configured command for the item's bound group in
/// the project's working directory.
pub struct CommandInvoker {
    config: Arc<ConfigFile>,
    base_dir: PathBuf,
    resolver: Arc<dyn DirResolver>,
    printer: Arc<dyn OutputPrinter>,
}

impl CommandInvoker {
    pub fn new(
        config: Arc<ConfigFile>,
        base_dir: impl Into<PathBuf>,
        resolver: Arc<dyn DirResolver>,
        printer: Arc<dyn OutputPrinter>,
    ) -> Self {
        Self {
            config,
            base_dir: base_dir.into(),
            resolver,
            printer,
        }
    }

    /// Working directory and command for `item`, or a message describing
    /// what is missing from the configuration.
    fn resolve(&self, item: &WorkItem) -> Result<CommandSpec, String> {
        let project = self
            .config
            .project(&item.project)
            .ok_or_else(|| format!("unknown project '{}'", item.project))?;
        let action = project.action(&item.action).ok_or_else(|| {
            format!(
                "project '{}' does not define action '{}'",
                item.project, item.action
            )
        })?;
        let command = action.command(&item.group).ok_or_else(|| {
            format!(
                "action '{}' of project '{}' has no group '{}'",
                item.action, item.project, item.group
            )
        })?;

        Ok(CommandSpec {
            cwd: self.resolver.resolve_dir(&self.base_dir, &project.remote),
            argv: command.to_vec(),
        })
    }
}

impl ActionInvoker for CommandInvoker {
    fn invoke(&self, item: WorkItem) -> InvokeFuture {
        let resolved = self.resolve(&item);
        let printer = Arc::clone(&self.printer);

        Box::pin(async move {
            match resolved {
                Ok(spec) => run_command(&item, spec, printer.as_ref()).await,
                Err(msg) => OutcomeRecord::failed_to_run(&item, msg),
            }
        })
    }
}
