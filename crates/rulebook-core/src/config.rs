//! Configuration types for rulebook.

use crate::model::{ModelError, SectionDescriptor, SectionTable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration (`rulebook.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where inputs live.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Where outputs go.
    #[serde(default)]
    pub output: OutputConfig,

    /// Section table override. Empty means the built-in table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionDescriptor>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Returns the effective section table.
    ///
    /// # Errors
    ///
    /// Returns every table problem if the configured sections are invalid.
    pub fn section_table(&self) -> Result<SectionTable, ConfigError> {
        if self.sections.is_empty() {
            return Ok(SectionTable::builtin());
        }
        SectionTable::new(self.sections.clone()).map_err(ConfigError::Sections)
    }
}

/// Input locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Directory holding rule files.
    #[serde(default = "default_rules_dir")]
    pub rules_dir: PathBuf,

    /// Project metadata JSON.
    #[serde(default = "default_metadata")]
    pub metadata: PathBuf,

    /// Section-definitions file, relative to `rules_dir`.
    #[serde(default = "default_sections_file")]
    pub sections_file: PathBuf,

    /// File names in `rules_dir` that are not rules.
    #[serde(default = "default_reserved")]
    pub reserved: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            rules_dir: default_rules_dir(),
            metadata: default_metadata(),
            sections_file: default_sections_file(),
            reserved: default_reserved(),
        }
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Compiled document.
    #[serde(default = "default_document")]
    pub document: PathBuf,

    /// Extracted examples JSON.
    #[serde(default = "default_test_cases")]
    pub test_cases: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            document: default_document(),
            test_cases: default_test_cases(),
        }
    }
}

fn default_rules_dir() -> PathBuf {
    PathBuf::from("rules")
}

fn default_metadata() -> PathBuf {
    PathBuf::from("metadata.json")
}

fn default_sections_file() -> PathBuf {
    PathBuf::from("_sections.md")
}

fn default_reserved() -> Vec<String> {
    vec!["_sections.md".to_string(), "_template.md".to_string()]
}

fn default_document() -> PathBuf {
    PathBuf::from("AGENTS.md")
}

fn default_test_cases() -> PathBuf {
    PathBuf::from("test-cases.json")
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(rulebook::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(code(rulebook::config::parse))]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Configured section table is inconsistent.
    #[error("invalid [[sections]] table:\n{}", format_errors(.0))]
    #[diagnostic(code(rulebook::config::sections))]
    Sections(Vec<ModelError>),
}

fn format_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
