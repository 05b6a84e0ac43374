//! Configuration lookup with a global fallback.
//!
//! Lookup order:
//!
//! 1. `--config` flag
//! 2. `{project}/rulebook.toml`, then `{project}/.rulebook.toml`
//! 3. `~/.rulebook/config.toml` (`$RULEBOOK_CONFIG_DIR` overrides the directory)
//! 4. built-in defaults

use anyhow::{Context, Result};
use rulebook::Config;
use std::path::{Path, PathBuf};

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Path of the config file, if one was found.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Loads the configuration this source points to.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Config::default());
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        }
        Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["rulebook.toml", ".rulebook.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Finds the configuration for a project directory.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with(project_dir, explicit, global_config_dir())
}

// Takes the global directory as a parameter so tests need no env vars.
fn resolve_with(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Default,
    }
}

/// Global config directory: `$RULEBOOK_CONFIG_DIR`, else `~/.rulebook/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("RULEBOOK_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".rulebook"))
}
