// src/dag/pending.rs

//! The pending-work pool of a single run.

use std::collections::BTreeMap;

use tracing::debug;

use crate::dag::work_item::WorkItem;
use crate::types::{Priority, ProjectName};

/// A work item that will not run because something upstream did not
/// succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub item: WorkItem,
    /// The item's direct upstream that caused the skip.
    pub skipped_by: ProjectName,
}

/// Items that have not been launched or skipped yet, keyed by project.
///
/// Launching or skipping an item removes it from the pool, so an item can
/// leave the pool exactly once.
#[derive(Debug, Default)]
pub struct PendingPool {
    items: BTreeMap<ProjectName, WorkItem>,
}

impl PendingPool {
    pub fn new(items: impl IntoIterator<Item = WorkItem>) -> Self {
        let mut pool = BTreeMap::new();
        for item in items {
            // First occurrence wins, as in selection.
            pool.entry(item.project.clone()).or_insert(item);
        }
        Self { items: pool }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, project: &str) -> bool {
        self.items.contains_key(project)
    }

    pub fn get(&self, project: &str) -> Option<&WorkItem> {
        self.items.get(project)
    }

    /// Remove and return every item at `priority` whose outstanding needs
    /// are already empty.
    pub fn take_ready_in_tier(&mut self, priority: Priority) -> Vec<WorkItem> {
        let ready: Vec<ProjectName> = self
            .items
            .values()
            .filter(|item| item.priority == priority && item.is_ready())
            .map(|item| item.project.clone())
            .collect();

        self.remove_all(ready)
    }

    /// Record that `project` succeeded.
    ///
    /// Removes it from every pending item's outstanding needs and returns
    /// (removed from the pool) the items whose needs became empty as a
    /// result, whatever their tier.
    pub fn complete(&mut self, project: &str) -> Vec<WorkItem> {
        let mut unblocked = Vec::new();

        for item in self.items.values_mut() {
            if item.needs.remove(project) && item.is_ready() {
                debug!(
                    project = %item.project,
                    dependency = %project,
                    "last dependency satisfied"
                );
                unblocked.push(item.project.clone());
            }
        }

        self.remove_all(unblocked)
    }

    /// Skip every pending item that transitively needs `failed`.
    ///
    /// Each skipped item is attributed to its immediate upstream: an item
    /// two hops away is skipped by the item one hop away, not by `failed`.
    pub fn skip_dependents(&mut self, failed: &str) -> Vec<SkippedItem> {
        let mut skipped = Vec::new();
        let mut stack: Vec<ProjectName> = vec![failed.to_string()];

        while let Some(upstream) = stack.pop() {
            let dependents: Vec<ProjectName> = self
                .items
                .values()
                .filter(|item| item.needs.contains(&upstream))
                .map(|item| item.project.clone())
                .collect();

            for name in dependents {
                if let Some(item) = self.items.remove(&name) {
                    debug!(project = %name, skipped_by = %upstream, "skipping dependent");
                    stack.push(name);
                    skipped.push(SkippedItem {
                        item,
                        skipped_by: upstream.clone(),
                    });
                }
            }
        }

        skipped
    }

    /// Empty the pool, skipping whatever is left.
    ///
    /// Leftovers are items waiting on a project that is not part of the
    /// run; each is attributed to its first outstanding need.
    pub fn drain_stranded(&mut self) -> Vec<SkippedItem> {
        std::mem::take(&mut self.items)
            .into_values()
            .map(|item| {
                let skipped_by = item.needs.iter().next().cloned().unwrap_or_default();
                SkippedItem { item, skipped_by }
            })
            .collect()
    }

    fn remove_all(&mut self, names: Vec<ProjectName>) -> Vec<WorkItem> {
        names
            .into_iter()
            .filter_map(|name| self.items.remove(&name))
            .collect()
    }
}
