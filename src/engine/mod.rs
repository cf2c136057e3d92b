// src/engine/mod.rs

//! Run orchestration for fleetrun.
//!
//! This module ties together:
//! - the scheduler (tiers, dependents, skips)
//! - the dedup registry held by the [`OutputPrinter`](crate::output::OutputPrinter)
//! - the action invoker that runs each work item
//!
//! The pure coordinator state machine lives in [`core`]; the async/IO shell
//! that spawns invocations and waits for them is implemented in [`runtime`].

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::model::ConfigFile;
use crate::dag::pending::SkippedItem;
use crate::dag::selection::{RunRequest, select};
use crate::dag::work_item::WorkItem;
use crate::errors::Result;
use crate::exec::ActionInvoker;
use crate::output::OutputPrinter;
use crate::types::{ProjectName, WorkKey};

/// Why a work item produced a record without running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A direct upstream did not succeed.
    SkippedBy(ProjectName),
    /// The same (project, action, group) had already begun in this run.
    Duplicate,
}

/// Result of one work item, whether it ran or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    pub project: ProjectName,
    pub action: String,
    pub group: String,
    pub stdout: String,
    pub stderr: String,
    /// Exit code of the process. `None` when it was killed by a signal or
    /// never ran.
    pub exit_code: Option<i32>,
    /// Signal that terminated the process, if any.
    pub signal: Option<i32>,
    /// Directory the command ran in.
    pub cwd: Option<PathBuf>,
    /// Command that was run, executable first.
    pub command: Vec<String>,
    pub skip: Option<SkipReason>,
}

impl OutcomeRecord {
    /// Empty record for `item`, to be filled in by an invoker.
    pub fn for_item(item: &WorkItem) -> Self {
        Self {
            project: item.project.clone(),
            action: item.action.clone(),
            group: item.group.clone(),
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            signal: None,
            cwd: None,
            command: Vec::new(),
            skip: None,
        }
    }

    /// Record for an item that could not be run at all.
    ///
    /// Uses exit code `-1`, so schedulers treat it like any other failure.
    pub fn failed_to_run(item: &WorkItem, error: impl Into<String>) -> Self {
        Self {
            exit_code: Some(-1),
            stderr: error.into(),
            ..Self::for_item(item)
        }
    }

    pub fn skipped_by(item: &WorkItem, upstream: impl Into<ProjectName>) -> Self {
        Self {
            skip: Some(SkipReason::SkippedBy(upstream.into())),
            ..Self::for_item(item)
        }
    }

    pub fn duplicate(item: &WorkItem) -> Self {
        Self {
            skip: Some(SkipReason::Duplicate),
            ..Self::for_item(item)
        }
    }

    pub fn key(&self) -> WorkKey {
        WorkKey::new(&self.project, &self.action, &self.group)
    }

    /// Ran and exited with code 0.
    pub fn succeeded(&self) -> bool {
        self.skip.is_none() && self.exit_code == Some(0)
    }

    pub fn was_skipped(&self) -> bool {
        self.skip.is_some()
    }

    pub fn skipped_by_project(&self) -> Option<&str> {
        match &self.skip {
            Some(SkipReason::SkippedBy(p)) => Some(p.as_str()),
            _ => None,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self.skip, Some(SkipReason::Duplicate))
    }
}

impl From<SkippedItem> for OutcomeRecord {
    fn from(skipped: SkippedItem) -> Self {
        OutcomeRecord::skipped_by(&skipped.item, skipped.skipped_by)
    }
}

/// Events flowing into the coordinator from invocation tasks.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// An invocation finished (successfully or not).
    Completed(OutcomeRecord),
}

pub mod core;
pub mod runtime;

pub use self::core::{CoreCommand, CoreRuntime, CoreStep};
pub use self::runtime::Runtime;

/// Select the work for `request` and run it to completion.
///
/// Configuration problems are returned before anything is spawned; process
/// failures are reported in the returned records.
pub async fn execute(
    cfg: &ConfigFile,
    request: &RunRequest,
    invoker: Arc<dyn ActionInvoker>,
    printer: Arc<dyn OutputPrinter>,
) -> Result<Vec<OutcomeRecord>> {
    let work = select(cfg, request)?;
    printer.init(work.items());

    let core = CoreRuntime::new(work, printer);
    Runtime::new(core, invoker).run().await
}
