// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{Priority, WILDCARD_GROUP};

/// Configuration exactly as deserialized from TOML, before validation.
///
/// ```toml
/// [config]
/// base_dir = "repos"
///
/// [project.web]
/// remote = "git@github.com:acme/web.git"
///
/// [project.web.action.build]
/// group."*" = ["npm", "run", "build"]
///
/// [project.api]
/// remote = "git@github.com:acme/api.git"
/// priority = 1
///
/// [project.api.action.build]
/// needs = ["web"]
/// group."*" = ["cargo", "build"]
/// group.release = ["cargo", "build", "--release"]
/// ```
///
/// Use `ConfigFile::try_from` (or [`crate::config::load_and_validate`]) to
/// obtain a validated [`ConfigFile`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// All projects from `[project.<name>]`, keyed by project name.
    ///
    /// A `BTreeMap` keeps iteration order stable, which the graph resolver
    /// and selection rely on for deterministic discovery.
    #[serde(default, rename = "project")]
    pub projects: BTreeMap<String, ProjectConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// Directory that project working directories are resolved under.
    ///
    /// Relative paths are interpreted relative to the config file. When
    /// unset, the config file's own directory is used.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

/// `[project.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Where the project lives (a git remote URL, or a local path).
    pub remote: String,

    /// Default priority for every action of this project.
    #[serde(default)]
    pub priority: Option<Priority>,

    /// Actions keyed by action name (`[project.<name>.action.<action>]`).
    #[serde(default, rename = "action")]
    pub actions: BTreeMap<String, ActionConfig>,
}

impl ProjectConfig {
    pub fn action(&self, name: &str) -> Option<&ActionConfig> {
        self.actions.get(name)
    }
}

/// `[project.<name>.action.<action>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionConfig {
    /// Overrides the project's default priority for this action.
    #[serde(default)]
    pub priority: Option<Priority>,

    /// Projects whose same-named action must succeed before this one runs.
    #[serde(default)]
    pub needs: Vec<String>,

    /// Command per group name. `"*"` is used when the requested group is
    /// missing.
    #[serde(default, rename = "group")]
    pub groups: BTreeMap<String, Vec<String>>,
}

impl ActionConfig {
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Group that a request for `group` binds to: the group itself if
    /// defined, else the wildcard, else nothing.
    pub fn resolve_group(&self, group: &str) -> Option<&str> {
        if let Some((name, _)) = self.groups.get_key_value(group) {
            Some(name.as_str())
        } else if let Some((name, _)) = self.groups.get_key_value(WILDCARD_GROUP) {
            Some(name.as_str())
        } else {
            None
        }
    }

    pub fn command(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(|c| c.as_slice())
    }

    /// Action override, else project default, else 0.
    pub fn effective_priority(&self, project: &ProjectConfig) -> Priority {
        self.priority.or(project.priority).unwrap_or(0)
    }
}

/// Validated configuration.
///
/// Constructed through `TryFrom<RawConfigFile>`, so every `needs` entry
/// names a declared project that defines the same action, every command is
/// non-empty and no action graph contains a cycle.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    projects: BTreeMap<String, ProjectConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        projects: BTreeMap<String, ProjectConfig>,
    ) -> Self {
        Self { config, projects }
    }

    pub fn projects(&self) -> &BTreeMap<String, ProjectConfig> {
        &self.projects
    }

    pub fn project(&self, name: &str) -> Option<&ProjectConfig> {
        self.projects.get(name)
    }

    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(|s| s.as_str())
    }

    /// The action spec for (`project`, `action`), if both exist.
    pub fn action(&self, project: &str, action: &str) -> Option<&ActionConfig> {
        self.projects.get(project)?.action(action)
    }
}
