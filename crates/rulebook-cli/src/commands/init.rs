//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# rulebook configuration

[sources]
# Directory holding one `.md` file per rule
rules_dir = "rules"

# Project metadata (title, version, organization, date, abstract, references)
metadata = "metadata.json"

# Per-section descriptions, relative to rules_dir
sections_file = "_sections.md"

# Files in rules_dir that are not rules (names starting with `_` are always skipped)
reserved = ["_sections.md", "_template.md"]

[output]
document = "AGENTS.md"
test_cases = "test-cases.json"

# Replace the built-in section table by listing every section.
# Rule files are matched by file name prefix: `async-foo.md` -> `async`.
#
# [[sections]]
# prefix = "async"
# name = "Eliminating Waterfalls"
# ordinal = 1
# impact = "CRITICAL"
"#;

const CONFIG_FILE: &str = "rulebook.toml";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Add rule files under rules/ and a metadata.json");
    println!("  2. Run: rulebook validate");
    println!("  3. Run: rulebook compile");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    Ok(())
}
