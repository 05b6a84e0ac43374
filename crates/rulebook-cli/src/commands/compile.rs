//! Compile command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the compile command.
///
/// Findings are printed first; the document is only written when there are
/// no errors.
pub fn run(
    path: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    source: &ConfigSource,
) -> Result<()> {
    let project = super::open_project(path, source)?;

    let report = project.validate().context("Validation could not run")?;
    if report.has_errors() {
        super::output::print(&report, format)?;
        eprintln!("Compilation refused; nothing was written.");
        std::process::exit(1);
    }
    if !report.violations.is_empty() {
        super::output::print(&report, format)?;
    }

    let outcome = project.compile(output).context("Compilation failed")?;
    println!(
        "Compiled {} rule(s) in {} section(s) to {}",
        outcome.rule_count,
        outcome.section_count,
        outcome.output.display()
    );

    Ok(())
}
