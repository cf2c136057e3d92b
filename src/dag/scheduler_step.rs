// src/dag/scheduler_step.rs

//! Step-by-step execution result types for the scheduler.

use crate::dag::pending::SkippedItem;
use crate::dag::work_item::WorkItem;

/// Structured result of a single scheduler "step".
#[derive(Debug, Clone, Default)]
pub struct SchedulerStep {
    /// Items whose last dependency just succeeded. They have left the
    /// pending pool and must be launched now.
    pub newly_ready: Vec<WorkItem>,
    /// Items skipped as a consequence of this step.
    pub newly_skipped: Vec<SkippedItem>,
}

impl SchedulerStep {
    pub fn is_empty(&self) -> bool {
        self.newly_ready.is_empty() && self.newly_skipped.is_empty()
    }
}
