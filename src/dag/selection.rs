// src/dag/selection.rs

//! Selection and dependency closure.
//!
//! Turns an (action, group, project subset) request into the exact set of
//! [`WorkItem`]s a run executes:
//!
//! 1. direct matches from the subset (bound to the group, or to `"*"`)
//! 2. everything they transitively `need`
//! 3. minus dependencies that cannot run the requested group
//! 4. with `needs` rewired through every project lacking the group

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info};

use crate::config::model::ConfigFile;
use crate::dag::graph::topological_order;
use crate::dag::work_item::{WorkItem, WorkSet};
use crate::errors::{FleetError, Result};
use crate::types::ProjectName;

/// What to run, before closure.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub action: String,
    pub group: String,
    /// Projects to start from. Empty means every configured project.
    pub projects: Vec<ProjectName>,
}

impl RunRequest {
    pub fn new(action: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            group: group.into(),
            projects: Vec::new(),
        }
    }

    pub fn with_projects<I, S>(mut self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ProjectName>,
    {
        self.projects = projects.into_iter().map(Into::into).collect();
        self
    }
}

/// A project found during closure, remembered in discovery order.
#[derive(Debug)]
struct Discovered {
    name: ProjectName,
    /// Whether the project came from the subset itself rather than from
    /// another project's `needs`.
    direct: bool,
}

/// Select the work items for `request`.
pub fn select(cfg: &ConfigFile, request: &RunRequest) -> Result<WorkSet> {
    let subset: Vec<ProjectName> = if request.projects.is_empty() {
        cfg.project_names().map(str::to_string).collect()
    } else {
        request.projects.clone()
    };
    select_work_items(cfg, &request.action, &request.group, &subset)
}

/// Compute the work items for running `group` of `action` over `subset`.
pub fn select_work_items(
    cfg: &ConfigFile,
    action: &str,
    group: &str,
    subset: &[ProjectName],
) -> Result<WorkSet> {
    let order = topological_order(cfg, action)?;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut discovered: Vec<Discovered> = Vec::new();

    for name in subset {
        let project = cfg
            .project(name)
            .ok_or_else(|| FleetError::UnknownProject(name.clone()))?;

        let Some(spec) = project.action(action) else {
            debug!(project = %name, action, "project does not define action; not selected");
            continue;
        };
        if spec.resolve_group(group).is_none() {
            debug!(project = %name, action, group, "no matching group or wildcard; not selected");
            continue;
        }
        if seen.insert(name.as_str()) {
            discovered.push(Discovered {
                name: name.clone(),
                direct: true,
            });
        }
    }

    let direct_count = discovered.len();
    for idx in 0..direct_count {
        let root = discovered[idx].name.clone();
        collect_needs(cfg, action, &root, &mut seen, &mut discovered)?;
    }

    // Projects that cannot run the requested group. Nobody waits on them;
    // the ones that only arrived through `needs` do not run at all.
    let lacking: HashSet<&str> = discovered
        .iter()
        .filter(|d| {
            cfg.action(&d.name, action)
                .is_some_and(|spec| !spec.has_group(group))
        })
        .map(|d| d.name.as_str())
        .collect();

    let mut items: Vec<WorkItem> = Vec::new();
    for d in discovered.iter() {
        let (project, spec) = match (cfg.project(&d.name), cfg.action(&d.name, action)) {
            (Some(project), Some(spec)) => (project, spec),
            _ => continue,
        };

        let bound = if d.direct {
            spec.resolve_group(group)
        } else if spec.has_group(group) {
            Some(group)
        } else {
            None
        };

        let Some(bound) = bound else {
            debug!(project = %d.name, action, group, "dependency lacks requested group; excluded");
            continue;
        };

        items.push(WorkItem {
            project: d.name.clone(),
            action: action.to_string(),
            group: bound.to_string(),
            needs: spec.needs.iter().cloned().collect(),
            priority: spec.effective_priority(project),
        });
    }

    // Reverse topological order: a project is rewired before anything it
    // needs, so multi-hop chains resolve in this single pass.
    for name in order.iter().rev() {
        if !lacking.contains(name.as_str()) {
            continue;
        }
        let Some(spec) = cfg.action(name, action) else {
            continue;
        };
        for item in items.iter_mut() {
            if item.needs.remove(name) {
                debug!(
                    project = %item.project,
                    through = %name,
                    replacement = ?spec.needs,
                    "rewiring needs through project lacking group"
                );
                item.needs.extend(spec.needs.iter().cloned());
            }
        }
    }

    info!(
        action,
        group,
        selected = items.len(),
        direct = direct_count,
        "selected work items"
    );

    Ok(WorkSet::new(items))
}

/// Depth-first walk of `root`'s `needs`, in declaration order, appending
/// every project not seen before.
fn collect_needs<'a>(
    cfg: &'a ConfigFile,
    action: &str,
    root: &str,
    seen: &mut HashSet<&'a str>,
    discovered: &mut Vec<Discovered>,
) -> Result<()> {
    let mut stack: Vec<&'a str> = needs_of(cfg, action, root)?.into_iter().rev().collect();

    while let Some(name) = stack.pop() {
        let (key, _) = cfg
            .projects()
            .get_key_value(name)
            .ok_or_else(|| FleetError::UnknownProject(name.to_string()))?;

        if !seen.insert(key.as_str()) {
            continue;
        }

        let needs = needs_of(cfg, action, key)?;
        discovered.push(Discovered {
            name: key.clone(),
            direct: false,
        });
        stack.extend(needs.into_iter().rev());
    }

    Ok(())
}

fn needs_of<'a>(cfg: &'a ConfigFile, action: &str, project: &str) -> Result<Vec<&'a str>> {
    let spec = cfg
        .project(project)
        .ok_or_else(|| FleetError::UnknownProject(project.to_string()))?
        .action(action)
        .ok_or_else(|| FleetError::MissingAction {
            project: project.to_string(),
            action: action.to_string(),
        })?;
    Ok(spec.needs.iter().map(|s| s.as_str()).collect())
}

/// Distinct project names referenced by `items`' outstanding needs that
/// are not themselves in the set. Empty for any set produced by
/// [`select_work_items`].
pub fn dangling_needs(items: &[WorkItem]) -> BTreeSet<ProjectName> {
    let present: HashSet<&str> = items.iter().map(|i| i.project.as_str()).collect();
    items
        .iter()
        .flat_map(|i| i.needs.iter())
        .filter(|n| !present.contains(n.as_str()))
        .cloned()
        .collect()
}
