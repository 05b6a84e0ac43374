//! Project runner: wires configuration, the default checks, the pipeline
//! and atomic output writing.

use rulebook_checks::default_checks;
use rulebook_core::{
    extract_examples, write_atomic, Config, ConfigError, ExampleCase, ModelError, Pipeline,
    PipelineError, ProjectMetadata, SectionTable, ValidationReport,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from running a command against a project.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum RunError {
    /// Configuration is unusable.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// Discovery, parsing, validation or assembly failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Pipeline(#[from] PipelineError),

    /// Project metadata could not be read.
    #[error("Failed to read project metadata {path}: {source}")]
    #[diagnostic(code(rulebook::metadata::io))]
    MetadataIo {
        /// Metadata path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Project metadata is malformed.
    #[error("{path}: {source}")]
    #[diagnostic(code(rulebook::metadata::invalid))]
    Metadata {
        /// Metadata path.
        path: PathBuf,
        /// What was wrong.
        source: ModelError,
    },

    /// Extracted examples could not be serialized.
    #[error("Failed to serialize examples: {0}")]
    Json(#[from] serde_json::Error),

    /// Output could not be written.
    #[error("Failed to write {path}: {source}")]
    #[diagnostic(code(rulebook::output))]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

impl RunError {
    /// Validation report behind a refused compilation, if that is what
    /// happened.
    #[must_use]
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Pipeline(PipelineError::Invalid { report }) => Some(report),
            _ => None,
        }
    }
}

/// Result of a successful `compile`.
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    /// Validation report; may carry warnings.
    pub report: ValidationReport,
    /// Where the document was written.
    pub output: PathBuf,
    /// Number of sections rendered.
    pub section_count: usize,
    /// Number of rules rendered.
    pub rule_count: usize,
}

/// Result of a successful `extract-tests`.
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    /// Validation report; may carry warnings.
    pub report: ValidationReport,
    /// Where the JSON was written.
    pub output: PathBuf,
    /// Extracted examples in document order.
    pub cases: Vec<ExampleCase>,
}

/// A project directory together with its effective configuration.
///
/// Relative paths in the configuration resolve against `root`.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Creates a project rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Project directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Effective configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves a configured path against the project directory.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Rules directory.
    #[must_use]
    pub fn rules_dir(&self) -> PathBuf {
        self.resolve(&self.config.sources.rules_dir)
    }

    /// Project metadata file.
    #[must_use]
    pub fn metadata_path(&self) -> PathBuf {
        self.resolve(&self.config.sources.metadata)
    }

    /// Default compiled document path.
    #[must_use]
    pub fn document_path(&self) -> PathBuf {
        self.resolve(&self.config.output.document)
    }

    /// Default extracted-examples path.
    #[must_use]
    pub fn test_cases_path(&self) -> PathBuf {
        self.resolve(&self.config.output.test_cases)
    }

    /// Effective section table, before descriptions are merged.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured table is inconsistent.
    pub fn section_table(&self) -> Result<SectionTable, RunError> {
        Ok(self.config.section_table()?)
    }

    /// Builds a pipeline with every built-in check.
    ///
    /// # Errors
    ///
    /// Returns an error if the section table is invalid, the rules directory
    /// is missing, or the section-definitions file cannot be read.
    pub fn pipeline(&self) -> Result<Pipeline, RunError> {
        let sources = &self.config.sources;
        let mut builder = Pipeline::builder()
            .rules_dir(self.rules_dir())
            .sections(self.section_table()?)
            .sections_file(sources.sections_file.clone())
            .checks(default_checks());
        for name in &sources.reserved {
            builder = builder.reserve(name.clone());
        }
        Ok(builder.build()?)
    }

    /// Reads the project metadata record.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn metadata(&self) -> Result<ProjectMetadata, RunError> {
        let path = self.metadata_path();
        let content = std::fs::read_to_string(&path).map_err(|source| RunError::MetadataIo {
            path: path.clone(),
            source,
        })?;
        ProjectMetadata::from_json(&content).map_err(|source| RunError::Metadata { path, source })
    }

    /// Validates every rule file.
    ///
    /// # Errors
    ///
    /// Returns an error only when validation cannot run at all; schema
    /// problems are in the report.
    pub fn validate(&self) -> Result<ValidationReport, RunError> {
        Ok(self.pipeline()?.validate()?)
    }

    /// Validates, renders and atomically writes the document.
    ///
    /// Nothing is written unless every file parses, validation reports no
    /// errors and the metadata is readable.
    ///
    /// # Errors
    ///
    /// Returns an error if compilation is refused or any step fails; use
    /// [`RunError::report`] to get the blocking findings.
    pub fn compile(&self, output: Option<&Path>) -> Result<CompileOutcome, RunError> {
        let compilation = self.pipeline()?.compile()?;
        let metadata = self.metadata()?;
        let rendered = compilation.document.render(&metadata);

        let output = output.map_or_else(|| self.document_path(), Path::to_path_buf);
        write_atomic(&output, rendered.as_bytes()).map_err(|source| RunError::Write {
            path: output.clone(),
            source,
        })?;
        info!(
            "Compiled {} rule(s) into {}",
            compilation.document.rule_count(),
            output.display()
        );

        Ok(CompileOutcome {
            report: compilation.report,
            output,
            section_count: compilation.document.sections.len(),
            rule_count: compilation.document.rule_count(),
        })
    }

    /// Validates, then writes every labelled code example as JSON.
    ///
    /// # Errors
    ///
    /// Same gating as [`Project::compile`].
    pub fn extract_tests(&self, output: Option<&Path>) -> Result<ExtractOutcome, RunError> {
        let compilation = self.pipeline()?.compile()?;
        let cases = extract_examples(&compilation.document);
        debug!("Extracted {} example(s)", cases.len());

        let mut json = serde_json::to_string_pretty(&cases)?;
        json.push('\n');

        let output = output.map_or_else(|| self.test_cases_path(), Path::to_path_buf);
        write_atomic(&output, json.as_bytes()).map_err(|source| RunError::Write {
            path: output.clone(),
            source,
        })?;
        info!("Wrote {} example(s) to {}", cases.len(), output.display());

        Ok(ExtractOutcome {
            report: compilation.report,
            output,
            cases,
        })
    }
}
