// src/dag/graph.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, ProjectConfig};
use crate::errors::{FleetError, Result};

/// The `needs` graph of a single action.
///
/// Nodes are the projects that define the action; edges point from a
/// needed project to the project that needs it:
///
/// ```toml
/// [project.api.action.build]
/// needs = ["web"]
/// ```
///
/// adds the edge `web -> api`. Needs on projects that do not define the
/// action are not part of this graph; selection reports those.
#[derive(Debug, Clone)]
pub struct ActionGraph<'a> {
    action: &'a str,
    graph: DiGraphMap<&'a str, ()>,
}

impl<'a> ActionGraph<'a> {
    /// Build the graph for `action` from a project map.
    ///
    /// Nodes are inserted in map order, which keeps the topological order
    /// reproducible between runs.
    pub fn from_projects(projects: &'a BTreeMap<String, ProjectConfig>, action: &'a str) -> Self {
        let mut graph: DiGraphMap<&'a str, ()> = DiGraphMap::new();

        for (name, project) in projects.iter() {
            if project.action(action).is_some() {
                graph.add_node(name.as_str());
            }
        }

        for (name, project) in projects.iter() {
            let Some(spec) = project.action(action) else {
                continue;
            };
            for dep in spec.needs.iter() {
                if graph.contains_node(dep.as_str()) {
                    graph.add_edge(dep.as_str(), name.as_str(), ());
                }
            }
        }

        Self { action, graph }
    }

    pub fn from_config(cfg: &'a ConfigFile, action: &'a str) -> Self {
        Self::from_projects(cfg.projects(), action)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Projects ordered so that every needed project precedes the projects
    /// that need it.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        match toposort(&self.graph, None) {
            Ok(order) => Ok(order.into_iter().map(str::to_string).collect()),
            Err(cycle) => Err(FleetError::DagCycle(format!(
                "cycle detected in `needs` of action '{}' involving project '{}'",
                self.action,
                cycle.node_id()
            ))),
        }
    }
}

/// Topological order of every project defining `action`.
pub fn topological_order(cfg: &ConfigFile, action: &str) -> Result<Vec<String>> {
    ActionGraph::from_config(cfg, action).topological_order()
}
