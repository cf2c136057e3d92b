// src/dag/scheduler.rs

use tracing::{debug, info, warn};

use crate::dag::pending::{PendingPool, SkippedItem};
use crate::dag::scheduler_step::SchedulerStep;
use crate::dag::selection::dangling_needs;
use crate::dag::work_item::{WorkItem, WorkSet};
use crate::types::Priority;

/// Items launched at the start of a priority tier.
#[derive(Debug, Clone)]
pub struct TierStart {
    pub priority: Priority,
    pub ready: Vec<WorkItem>,
}

/// Scheduler holds the per-run pending pool plus the tier cursor.
///
/// It is responsible for:
/// - walking the distinct priorities in ascending order
/// - handing out the items that are ready when a tier begins
/// - releasing dependents as soon as their last dependency succeeds
/// - skipping dependents of anything that did not succeed
///
/// It performs no IO and is driven by the engine one event at a time.
#[derive(Debug)]
pub struct Scheduler {
    pool: PendingPool,
    /// Distinct priorities present in the run, ascending.
    tiers: Vec<Priority>,
    /// Index into `tiers` of the next tier to start.
    next_tier: usize,
}

impl Scheduler {
    pub fn new(work: WorkSet) -> Self {
        let tiers = work.tiers();
        let dangling = dangling_needs(work.items());
        if !dangling.is_empty() {
            warn!(
                ?dangling,
                "work items need projects outside the run; they will be skipped"
            );
        }

        debug!(?tiers, items = work.len(), "scheduler: priority tiers");

        Self {
            pool: PendingPool::new(work),
            tiers,
            next_tier: 0,
        }
    }

    pub fn tiers(&self) -> &[Priority] {
        &self.tiers
    }

    /// Number of items neither launched nor skipped yet.
    pub fn pending_count(&self) -> usize {
        self.pool.len()
    }

    pub fn is_pending(&self, project: &str) -> bool {
        self.pool.contains(project)
    }

    /// Outstanding needs of a pending item.
    pub fn outstanding_needs(&self, project: &str) -> Option<Vec<String>> {
        self.pool
            .get(project)
            .map(|item| item.needs.iter().cloned().collect())
    }

    /// Whether every tier has been started.
    pub fn tiers_exhausted(&self) -> bool {
        self.next_tier >= self.tiers.len()
    }

    /// Begin the next priority tier.
    ///
    /// Returns `None` once every tier has been started. A tier may start
    /// with nothing ready (everything in it waits on other items).
    pub fn start_next_tier(&mut self) -> Option<TierStart> {
        let priority = *self.tiers.get(self.next_tier)?;
        self.next_tier += 1;

        let ready = self.pool.take_ready_in_tier(priority);
        info!(
            priority,
            ready = ready.len(),
            pending = self.pool.len(),
            "scheduler: starting priority tier"
        );

        Some(TierStart { priority, ready })
    }

    /// Handle the completion of a launched item.
    pub fn step_completion(&mut self, project: &str, succeeded: bool) -> SchedulerStep {
        if succeeded {
            let newly_ready = self.pool.complete(project);
            if !newly_ready.is_empty() {
                debug!(
                    project = %project,
                    unblocked = newly_ready.len(),
                    "scheduler: dependents unblocked"
                );
            }
            SchedulerStep {
                newly_ready,
                newly_skipped: Vec::new(),
            }
        } else {
            let newly_skipped = self.pool.skip_dependents(project);
            if !newly_skipped.is_empty() {
                warn!(
                    project = %project,
                    skipped = newly_skipped.len(),
                    "scheduler: skipping dependents of unsuccessful project"
                );
            }
            SchedulerStep {
                newly_ready: Vec::new(),
                newly_skipped,
            }
        }
    }

    /// Handle an item that was not run because its key had already begun.
    ///
    /// Its dependents cannot count on it having succeeded in this run, so
    /// they are skipped just like after a failure.
    pub fn step_duplicate(&mut self, project: &str) -> SchedulerStep {
        self.step_completion(project, false)
    }

    /// Skip everything still pending after the last tier.
    pub fn finish(&mut self) -> Vec<SkippedItem> {
        let stranded = self.pool.drain_stranded();
        if !stranded.is_empty() {
            warn!(
                stranded = stranded.len(),
                "scheduler: items never became ready; skipping"
            );
        }
        stranded
    }
}
