// src/dag/work_item.rs

//! Work items: the unit the scheduler operates on.

use std::collections::BTreeSet;

use crate::types::{Priority, ProjectName, WorkKey};

/// One project's participation in a run.
///
/// There is at most one `WorkItem` per project in a run, so the project
/// name doubles as the item's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub project: ProjectName,
    pub action: String,
    /// Group this item runs: the requested group, or `"*"`.
    pub group: String,
    /// Projects that still have to succeed before this item may launch.
    ///
    /// Starts as the (possibly rewired) `needs` and shrinks as
    /// dependencies complete.
    pub needs: BTreeSet<ProjectName>,
    pub priority: Priority,
}

impl WorkItem {
    pub fn key(&self) -> WorkKey {
        WorkKey::new(&self.project, &self.action, &self.group)
    }

    pub fn is_ready(&self) -> bool {
        self.needs.is_empty()
    }
}

/// The work items selected for one run, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct WorkSet {
    items: Vec<WorkItem>,
}

impl WorkSet {
    pub fn new(items: Vec<WorkItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    pub fn get(&self, project: &str) -> Option<&WorkItem> {
        self.items.iter().find(|item| item.project == project)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct priorities, ascending.
    pub fn tiers(&self) -> Vec<Priority> {
        let mut tiers: Vec<Priority> = self.items.iter().map(|item| item.priority).collect();
        tiers.sort_unstable();
        tiers.dedup();
        tiers
    }

    pub fn into_items(self) -> Vec<WorkItem> {
        self.items
    }
}

impl IntoIterator for WorkSet {
    type Item = WorkItem;
    type IntoIter = std::vec::IntoIter<WorkItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
