// src/exec/dir.rs

//! Working-directory resolution.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::errors::{FleetError, Result};

/// Maps a project's remote descriptor to the directory its commands run in.
pub trait DirResolver: Send + Sync {
    fn resolve_dir(&self, base: &Path, remote: &str) -> PathBuf;
}

/// Resolves remotes the way `git clone` names its target directory.
///
/// - `git@github.com:acme/web.git` -> `<base>/web`
/// - `https://example.com/acme/api/` -> `<base>/api`
/// - `./local/tool`, `/abs/path` -> joined onto `<base>` as a path
#[derive(Debug, Clone)]
pub struct RemoteDirResolver {
    repo_name: Regex,
}

impl RemoteDirResolver {
    pub fn new() -> Result<Self> {
        let repo_name = Regex::new(r"^(?:.*[/:])?([^/:]+?)(?:\.git)?/*$")
            .map_err(|e| FleetError::Other(e.into()))?;
        Ok(Self { repo_name })
    }

    /// Directory name `git clone` would pick for `remote`.
    pub fn repo_dir_name<'r>(&self, remote: &'r str) -> Option<&'r str> {
        self.repo_name
            .captures(remote.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|name| !name.is_empty())
    }
}

fn is_local_path(remote: &str) -> bool {
    remote.starts_with('.') || remote.starts_with('/') || Path::new(remote).is_absolute()
}

impl DirResolver for RemoteDirResolver {
    fn resolve_dir(&self, base: &Path, remote: &str) -> PathBuf {
        let remote = remote.trim();
        if is_local_path(remote) {
            return base.join(remote);
        }
        match self.repo_dir_name(remote) {
            Some(name) => base.join(name),
            None => base.join(remote),
        }
    }
}
