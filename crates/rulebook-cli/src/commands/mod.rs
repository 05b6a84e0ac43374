//! CLI command implementations.

pub mod compile;
pub mod init;
pub mod list_sections;
pub mod output;
pub mod validate;

use crate::config_resolver::ConfigSource;
use anyhow::Result;
use rulebook::Project;
use std::path::Path;

/// Opens the project at `path` with its resolved configuration.
pub fn open_project(path: &Path, source: &ConfigSource) -> Result<Project> {
    Ok(Project::new(path, source.load()?))
}
