// src/engine/core.rs

//! Pure coordinator state machine.
//!
//! `CoreRuntime` owns everything a run mutates: the scheduler's pending
//! pool and the calls into the dedup registry. It consumes [`RunEvent`]s
//! and produces:
//! - outcome records that are final (skips, duplicates, completions)
//! - commands describing which work items the IO shell must invoke
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for spawning
//! invocations and feeding their completions back in. Because every
//! mutation happens here, one event at a time, two completions can never
//! race on the same dependency set or both pass the dedup check.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dag::pending::SkippedItem;
use crate::dag::scheduler::Scheduler;
use crate::dag::work_item::{WorkItem, WorkSet};
use crate::engine::{OutcomeRecord, RunEvent};
use crate::output::OutputPrinter;
use crate::types::Priority;

/// Command produced by the core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Invoke the action for this item and report back a `RunEvent`.
    Invoke(WorkItem),
}

/// Decision returned by the core after a tier start or a single event.
#[derive(Debug, Clone, Default)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Records that are final as of this step.
    pub outcomes: Vec<OutcomeRecord>,
}

impl CoreStep {
    fn extend(&mut self, other: CoreStep) {
        self.commands.extend(other.commands);
        self.outcomes.extend(other.outcomes);
    }
}

pub struct CoreRuntime {
    scheduler: Scheduler,
    printer: Arc<dyn OutputPrinter>,
    /// Invocations handed out and not yet reported back.
    in_flight: usize,
    current_tier: Option<Priority>,
}

impl fmt::Debug for CoreRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreRuntime")
            .field("scheduler", &self.scheduler)
            .field("in_flight", &self.in_flight)
            .field("current_tier", &self.current_tier)
            .finish_non_exhaustive()
    }
}

impl CoreRuntime {
    pub fn new(work: WorkSet, printer: Arc<dyn OutputPrinter>) -> Self {
        Self {
            scheduler: Scheduler::new(work),
            printer,
            in_flight: 0,
            current_tier: None,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn current_tier(&self) -> Option<Priority> {
        self.current_tier
    }

    /// The current tier, and everything fanned out from it, has settled.
    pub fn tier_settled(&self) -> bool {
        self.in_flight == 0
    }

    /// Start the next priority tier.
    ///
    /// Must only be called once the previous tier has settled. Returns
    /// `None` when all tiers are done.
    pub fn begin_next_tier(&mut self) -> Option<CoreStep> {
        if !self.tier_settled() {
            warn!(
                in_flight = self.in_flight,
                "begin_next_tier called before the current tier settled; ignoring"
            );
            return Some(CoreStep::default());
        }

        let tier = self.scheduler.start_next_tier()?;
        self.current_tier = Some(tier.priority);
        Some(self.launch(tier.ready))
    }

    /// Handle a single event, returning what the IO shell should do next.
    pub fn step(&mut self, event: RunEvent) -> CoreStep {
        match event {
            RunEvent::Completed(record) => self.handle_completion(record),
        }
    }

    /// Records for whatever never became ready. Call after the last tier.
    pub fn finish(&mut self) -> Vec<OutcomeRecord> {
        self.scheduler
            .finish()
            .into_iter()
            .map(OutcomeRecord::from)
            .collect()
    }

    fn handle_completion(&mut self, record: OutcomeRecord) -> CoreStep {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.printer.finished_task(&record.project);

        let succeeded = record.succeeded();
        info!(
            project = %record.project,
            group = %record.group,
            exit_code = ?record.exit_code,
            signal = ?record.signal,
            succeeded,
            "work item finished"
        );

        let step = self.scheduler.step_completion(&record.project, succeeded);

        let mut out = CoreStep {
            commands: Vec::new(),
            outcomes: vec![record],
        };
        out.outcomes.extend(skip_records(step.newly_skipped));
        out.extend(self.launch(step.newly_ready));
        out
    }

    /// Pass `items` through the dedup registry and turn them into
    /// invocations or duplicate records.
    fn launch(&mut self, items: Vec<WorkItem>) -> CoreStep {
        let mut out = CoreStep::default();

        for item in items {
            let key = item.key();
            if self.printer.began_task(&key) {
                debug!(key = %key, priority = item.priority, "launching work item");
                self.in_flight += 1;
                out.commands.push(CoreCommand::Invoke(item));
            } else {
                info!(key = %key, "work item already began in this run; skipping duplicate");
                let cascade = self.scheduler.step_duplicate(&item.project);
                out.outcomes.push(OutcomeRecord::duplicate(&item));
                out.outcomes.extend(skip_records(cascade.newly_skipped));
            }
        }

        out
    }
}

fn skip_records(skipped: Vec<SkippedItem>) -> impl Iterator<Item = OutcomeRecord> {
    skipped.into_iter().map(OutcomeRecord::from)
}
