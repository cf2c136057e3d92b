// src/config/mod.rs

//! Configuration loading and validation for fleetrun.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate project references, commands and per-action DAGs (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, parse_and_validate};
pub use model::{ActionConfig, ConfigFile, ConfigSection, ProjectConfig, RawConfigFile};
