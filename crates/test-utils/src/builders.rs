#![allow(dead_code)]

use std::collections::BTreeMap;

use fleetrun::config::{ActionConfig, ConfigFile, ConfigSection, ProjectConfig, RawConfigFile};
use fleetrun::errors::Result;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                projects: BTreeMap::new(),
            },
        }
    }

    pub fn with_project(mut self, name: &str, project: ProjectConfig) -> Self {
        self.config.projects.insert(name.to_string(), project);
        self
    }

    pub fn with_base_dir(mut self, dir: &str) -> Self {
        self.config.config.base_dir = Some(dir.into());
        self
    }

    /// Validate without panicking, for tests about validation errors.
    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ProjectConfig`.
pub struct ProjectBuilder {
    project: ProjectConfig,
}

impl ProjectBuilder {
    pub fn new(remote: &str) -> Self {
        Self {
            project: ProjectConfig {
                remote: remote.to_string(),
                priority: None,
                actions: BTreeMap::new(),
            },
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.project.priority = Some(priority);
        self
    }

    pub fn action(mut self, name: &str, action: ActionConfig) -> Self {
        self.project.actions.insert(name.to_string(), action);
        self
    }

    pub fn build(self) -> ProjectConfig {
        self.project
    }
}

/// Builder for `ActionConfig`.
pub struct ActionBuilder {
    action: ActionConfig,
}

impl ActionBuilder {
    pub fn new() -> Self {
        Self {
            action: ActionConfig::default(),
        }
    }

    pub fn group(mut self, name: &str, cmd: &[&str]) -> Self {
        self.action
            .groups
            .insert(name.to_string(), cmd.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Shorthand for a `"*"` group.
    pub fn wildcard(self, cmd: &[&str]) -> Self {
        self.group("*", cmd)
    }

    pub fn needs(mut self, project: &str) -> Self {
        self.action.needs.push(project.to_string());
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.action.priority = Some(priority);
        self
    }

    pub fn build(self) -> ActionConfig {
        self.action
    }
}

impl Default for ActionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One-liner for the common case: a project whose `action` has a single
/// `"*"` group echoing the project name, needing `needs`.
pub fn echo_project(name: &str, action: &str, needs: &[&str]) -> ProjectConfig {
    let mut a = ActionBuilder::new().wildcard(&["echo", name]);
    for dep in needs {
        a = a.needs(dep);
    }
    ProjectBuilder::new(&format!("git@example.com:acme/{name}.git"))
        .action(action, a.build())
        .build()
}
