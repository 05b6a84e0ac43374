//! Validate command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the validate command.
pub fn run(path: &Path, format: OutputFormat, source: &ConfigSource) -> Result<()> {
    let project = super::open_project(path, source)?;

    tracing::info!("Validating rules in {}", project.rules_dir().display());
    let report = project.validate().context("Validation could not run")?;

    super::output::print(&report, format)?;

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}
