// src/dag/mod.rs

//! Dependency graph, selection and scheduling.
//!
//! - [`graph`] orders the projects of one action topologically.
//! - [`selection`] turns a run request into the run's [`WorkItem`]s.
//! - [`pending`] holds the not-yet-launched items of a run.
//! - [`scheduler`] walks priority tiers and reacts to completions.
//! - [`scheduler_step`] defines the result type for scheduler steps.
//! - [`work_item`] defines the work item types.

pub mod graph;
pub mod pending;
pub mod scheduler;
pub mod scheduler_step;
pub mod selection;
pub mod work_item;

pub use graph::{ActionGraph, topological_order};
pub use pending::{PendingPool, SkippedItem};
pub use scheduler::{Scheduler, TierStart};
pub use scheduler_step::SchedulerStep;
pub use selection::{RunRequest, select, select_work_items};
pub use work_item::{WorkItem, WorkSet};
