// src/config/validate.rs

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::config::model::{ConfigFile, ProjectConfig, RawConfigFile};
use crate::dag::graph::ActionGraph;
use crate::errors::{FleetError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = FleetError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.projects))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_projects(cfg)?;
    validate_projects(cfg)?;
    validate_needs(cfg)?;
    validate_action_dags(&cfg.projects)?;
    Ok(())
}

fn ensure_has_projects(cfg: &RawConfigFile) -> Result<()> {
    if cfg.projects.is_empty() {
        return Err(FleetError::ConfigError(
            "config must contain at least one [project.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_projects(cfg: &RawConfigFile) -> Result<()> {
    for (name, project) in cfg.projects.iter() {
        if project.remote.trim().is_empty() {
            return Err(FleetError::ConfigError(format!(
                "project '{}' has an empty `remote`",
                name
            )));
        }

        for (action_name, action) in project.actions.iter() {
            if action.groups.is_empty() {
                return Err(FleetError::ConfigError(format!(
                    "action '{}' of project '{}' defines no groups",
                    action_name, name
                )));
            }
            for (group, cmd) in action.groups.iter() {
                if cmd.is_empty() || cmd[0].trim().is_empty() {
                    return Err(FleetError::ConfigError(format!(
                        "group '{}' of action '{}' in project '{}' has an empty command",
                        group, action_name, name
                    )));
                }
            }
        }
    }
    Ok(())
}

fn validate_needs(cfg: &RawConfigFile) -> Result<()> {
    for (name, project) in cfg.projects.iter() {
        for (action_name, action) in project.actions.iter() {
            let mut seen = HashSet::new();
            for dep in action.needs.iter() {
                if dep == name {
                    return Err(FleetError::ConfigError(format!(
                        "action '{}' of project '{}' cannot need itself",
                        action_name, name
                    )));
                }
                if !seen.insert(dep.as_str()) {
                    return Err(FleetError::ConfigError(format!(
                        "action '{}' of project '{}' lists '{}' more than once in `needs`",
                        action_name, name, dep
                    )));
                }
                let needed = cfg
                    .projects
                    .get(dep)
                    .ok_or_else(|| FleetError::UnknownProject(dep.clone()))?;
                if needed.action(action_name).is_none() {
                    return Err(FleetError::MissingAction {
                        project: dep.clone(),
                        action: action_name.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn validate_action_dags(projects: &BTreeMap<String, ProjectConfig>) -> Result<()> {
    let action_names: BTreeSet<&str> = projects
        .values()
        .flat_map(|p| p.actions.keys().map(|a| a.as_str()))
        .collect();

    for action in action_names {
        ActionGraph::from_projects(projects, action).topological_order()?;
    }
    Ok(())
}
