//! List sections command implementation.

use anyhow::Result;
use std::path::Path;

use crate::config_resolver::ConfigSource;

/// Runs the list-sections command.
pub fn run(path: &Path, source: &ConfigSource) -> Result<()> {
    let project = super::open_project(path, source)?;

    // Descriptions come from the rules directory; show the bare table when
    // there is none yet.
    let table = match project.pipeline() {
        Ok(pipeline) => pipeline.sections().clone(),
        Err(e) => {
            tracing::debug!("{e}");
            project.section_table()?
        }
    };

    println!("{:<4} {:<12} {:<30} {:<12} Description", "#", "Prefix", "Name", "Impact");
    println!("{}", "-".repeat(80));
    for section in table.sections() {
        println!(
            "{:<4} {:<12} {:<30} {:<12} {}",
            section.ordinal,
            format!("{}-", section.prefix),
            section.name,
            section.impact.as_str(),
            section.description.as_deref().unwrap_or("")
        );
    }

    let origin = if project.config().sections.is_empty() {
        "built-in"
    } else {
        "configured"
    };
    println!("\n{} section(s), {origin} table", table.len());
    if let Some(p) = source.path() {
        println!("Config: {}", p.display());
    }

    Ok(())
}
