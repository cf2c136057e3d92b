// src/types.rs

//! Small shared types used across selection, scheduling and execution.

use std::fmt;

/// Canonical project name type.
pub type ProjectName = String;

/// Effective priority of a work item. Lower tiers run first.
pub type Priority = i32;

/// Group name that matches any requested group when the specific one is
/// absent from an action.
pub const WILDCARD_GROUP: &str = "*";

/// Key used by the dedup registry: one (project, action, group) may only
/// begin once per run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkKey {
    pub project: ProjectName,
    pub action: String,
    pub group: String,
}

impl WorkKey {
    pub fn new(
        project: impl Into<ProjectName>,
        action: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            action: action.into(),
            group: group.into(),
        }
    }
}

impl fmt::Display for WorkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}[{}]", self.project, self.action, self.group)
    }
}

/// Which stream of a subprocess a line of output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}
