//! Pipeline orchestrating discovery, parsing, validation and assembly.

use crate::assembler::{AssembleError, CompiledDocument};
use crate::check::{Check, CheckBox, CheckContext};
use crate::frontmatter::{self, ParseError, RuleDraft};
use crate::model::{ModelError, RuleRecord, SectionTable};
use crate::registry::{self, RegistryError};
use crate::types::{Location, Severity, ValidationReport, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Code reported for files whose metadata block cannot be parsed.
pub const PARSE_ERROR_CODE: &str = "RB000";

/// Name reported for files whose metadata block cannot be parsed.
pub const PARSE_ERROR_NAME: &str = "parse-error";

const RULE_EXTENSION: &str = "md";

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum PipelineError {
    /// IO error reading an input.
    #[error("Failed to read {path}: {source}")]
    #[diagnostic(code(rulebook::io))]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The rules directory does not exist.
    #[error("rules directory {0} does not exist")]
    #[diagnostic(code(rulebook::rules_dir))]
    MissingRulesDir(PathBuf),

    /// Invalid discovery pattern.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// A rule file could not be parsed; compilation cannot place it.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    /// Validation reported blocking errors; nothing was assembled.
    #[error("validation failed: {}", .report.status_line())]
    #[diagnostic(code(rulebook::invalid), help("run `rulebook validate` for the full report"))]
    Invalid {
        /// The full report, warnings included.
        report: ValidationReport,
    },

    /// A record could not be built from a draft that passed validation.
    #[error("{0}")]
    Model(#[from] ModelError),

    /// Grouping failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    /// Assembly invariant violated.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Assemble(#[from] AssembleError),
}

/// One discovered rule file after parsing.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name relative to the rules directory.
    pub file: PathBuf,
    /// Parsed draft, or why it could not be parsed.
    pub parsed: Result<RuleDraft, ParseError>,
}

/// Successful compilation.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Validation report; contains warnings only.
    pub report: ValidationReport,
    /// Grouped sections and table of contents.
    pub document: CompiledDocument,
}

/// Builder for configuring a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    rules_dir: Option<PathBuf>,
    checks: Vec<CheckBox>,
    sections: Option<SectionTable>,
    sections_file: Option<PathBuf>,
    reserved: Vec<String>,
}

impl PipelineBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory holding rule files.
    #[must_use]
    pub fn rules_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules_dir = Some(path.into());
        self
    }

    /// Adds a check. Checks run in the order they are added.
    #[must_use]
    pub fn check<C: Check + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Adds several boxed checks.
    #[must_use]
    pub fn checks<I>(mut self, checks: I) -> Self
    where
        I: IntoIterator<Item = CheckBox>,
    {
        self.checks.extend(checks);
        self
    }

    /// Sets the section table (default: built-in table).
    #[must_use]
    pub fn sections(mut self, table: SectionTable) -> Self {
        self.sections = Some(table);
        self
    }

    /// Sets the section-definitions file to read descriptions from.
    ///
    /// Relative paths resolve against the rules directory. A missing file is
    /// tolerated.
    #[must_use]
    pub fn sections_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sections_file = Some(path.into());
        self
    }

    /// Marks a file name in the rules directory as a non-rule file.
    #[must_use]
    pub fn reserve(mut self, name: impl Into<String>) -> Self {
        self.reserved.push(name.into());
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules directory does not exist or the
    /// section-definitions file exists but cannot be read.
    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let rules_dir = self.rules_dir.unwrap_or_else(|| PathBuf::from("rules"));
        if !rules_dir.is_dir() {
            return Err(PipelineError::MissingRulesDir(rules_dir));
        }

        let mut table = self.sections.unwrap_or_default();
        let mut reserved = self.reserved;
        if let Some(file) = self.sections_file {
            let path = rules_dir.join(file);
            // Whatever it is called, the definitions file is never a rule.
            if path.parent() == Some(rules_dir.as_path()) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    reserved.push(name.to_string());
                }
            }
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    let descriptions = registry::parse_section_descriptions(&content);
                    debug!(
                        "Loaded {} section description(s) from {}",
                        descriptions.len(),
                        path.display()
                    );
                    table = table.with_descriptions(&descriptions);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("No section definitions at {}", path.display());
                }
                Err(source) => return Err(PipelineError::Io { path, source }),
            }
        }

        Ok(Pipeline {
            rules_dir,
            checks: self.checks,
            table,
            reserved,
        })
    }
}

/// Runs parse → validate → group → assemble over a rules directory.
///
/// Use [`Pipeline::builder()`] to construct an instance.
pub struct Pipeline {
    rules_dir: PathBuf,
    checks: Vec<CheckBox>,
    table: SectionTable,
    reserved: Vec<String>,
}

impl Pipeline {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Directory holding rule files.
    #[must_use]
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Effective section table, descriptions merged.
    #[must_use]
    pub fn sections(&self) -> &SectionTable {
        &self.table
    }

    /// Lists rule files, sorted by file name.
    ///
    /// Reserved names and names starting with `_` are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn discover(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let escaped = glob::Pattern::escape(&self.rules_dir.to_string_lossy());
        let pattern = format!("{escaped}/*.{RULE_EXTENSION}");
        let mut files = Vec::new();

        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| PipelineError::Io {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;
            if !path.is_file() {
                continue;
            }
            if self.is_reserved(&path) {
                debug!("Skipping reserved file: {}", path.display());
                continue;
            }
            files.push(path);
        }

        // Directory listing order is not guaranteed.
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Reads and parses every rule file.
    ///
    /// Parse failures, including undecodable bytes, are kept per file; only
    /// IO failures abort.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery or reading fails.
    pub fn load(&self) -> Result<Vec<SourceFile>, PipelineError> {
        let files = self.discover()?;
        info!("Found {} rule file(s) in {}", files.len(), self.rules_dir.display());

        files
            .iter()
            .map(|path| -> Result<SourceFile, PipelineError> {
                let bytes = std::fs::read(path).map_err(|source| PipelineError::Io {
                    path: path.clone(),
                    source,
                })?;
                let file = path
                    .file_name()
                    .map_or_else(|| path.clone(), PathBuf::from);
                let parsed = frontmatter::parse_bytes(&file, &bytes);
                if let Err(e) = &parsed {
                    warn!("{e}");
                }
                Ok(SourceFile { file, parsed })
            })
            .collect()
    }

    /// Runs every check over already-loaded sources.
    ///
    /// Never stops early: each file gets every check, and a parse failure
    /// becomes one `RB000` error for that file.
    #[must_use]
    pub fn validate_sources(&self, sources: &[SourceFile]) -> ValidationReport {
        let mut report = ValidationReport::new();

        for source in sources {
            report.files_checked += 1;
            match &source.parsed {
                Ok(draft) => {
                    let ctx = CheckContext::new(&source.file, &self.table);
                    for check in &self.checks {
                        report.violations.extend(check.check(&ctx, draft));
                    }
                }
                Err(e) => {
                    let mut location = Location::new(&source.file);
                    if let Some(line) = e.kind.line() {
                        location = location.with_line(line);
                    }
                    report.violations.push(Violation::new(
                        PARSE_ERROR_CODE,
                        PARSE_ERROR_NAME,
                        Severity::Error,
                        location,
                        e.kind.to_string(),
                    ));
                }
            }
        }

        // Stable: keeps check order within a file.
        report
            .violations
            .sort_by(|a, b| a.location.file.cmp(&b.location.file));

        let (errors, warnings) = report.count_by_severity();
        info!(
            "Validation complete: {} error(s), {} warning(s) in {} file(s)",
            errors, warnings, report.files_checked
        );
        report
    }

    /// Loads and validates the rules directory.
    ///
    /// # Errors
    ///
    /// Returns an error only for IO/discovery failures; schema problems are
    /// in the report.
    pub fn validate(&self) -> Result<ValidationReport, PipelineError> {
        let sources = self.load()?;
        Ok(self.validate_sources(&sources))
    }

    /// Validates, then groups and assembles the document.
    ///
    /// Refuses to assemble anything when a file fails to parse or validation
    /// reports an error.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Parse`] for the first unparsable file,
    /// [`PipelineError::Invalid`] with the full report on schema errors, or
    /// an assembly error.
    pub fn compile(&self) -> Result<Compilation, PipelineError> {
        let sources = self.load()?;
        self.compile_sources(sources)
    }

    /// Same as [`Pipeline::compile`] over already-loaded sources.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::compile`].
    pub fn compile_sources(&self, sources: Vec<SourceFile>) -> Result<Compilation, PipelineError> {
        if let Some(err) = sources.iter().find_map(|s| s.parsed.as_ref().err()) {
            return Err(PipelineError::Parse(err.clone()));
        }

        let report = self.validate_sources(&sources);
        if report.has_errors() {
            return Err(PipelineError::Invalid { report });
        }

        let records = sources
            .into_iter()
            .filter_map(|s| s.parsed.ok())
            .map(|draft| RuleRecord::from_draft(draft, &self.table))
            .collect::<Result<Vec<_>, _>>()?;

        let sections = registry::group(&self.table, records)?;
        let document = CompiledDocument::new(sections)?;

        info!(
            "Assembled {} rule(s) in {} section(s)",
            document.rule_count(),
            document.sections.len()
        );

        Ok(Compilation { report, document })
    }

    fn is_reserved(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return true;
        };
        name.starts_with('_') || self.reserved.iter().any(|r| r == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RequireTitle;

    impl Check for RequireTitle {
        fn name(&self) -> &'static str {
            "require-title"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn check(&self, ctx: &CheckContext, draft: &RuleDraft) -> Vec<Violation> {
            if draft.frontmatter.title.is_none() {
                vec![self.violation(ctx, "no title".to_string())]
            } else {
                vec![]
            }
        }
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_builder_requires_rules_dir() {
        let result = Pipeline::builder().rules_dir("/nonexistent/rules").build();
        assert!(matches!(result, Err(PipelineError::MissingRulesDir(_))));
    }

    #[test]
    fn discover_skips_reserved_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "js-b.md", "");
        write(dir.path(), "async-a.md", "");
        write(dir.path(), "_template.md", "");
        write(dir.path(), "README.md", "");
        write(dir.path(), "notes.txt", "");

        let pipeline = Pipeline::builder()
            .rules_dir(dir.path())
            .reserve("README.md")
            .build()
            .unwrap();

        let names: Vec<String> = pipeline
            .discover()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["async-a.md", "js-b.md"]);
    }

    #[test]
    fn validate_collects_across_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "js-a.md", "---\nimpact: LOW\n---\n");
        write(dir.path(), "js-b.md", "---\ntitle: B\nimpact: LOW\n");
        write(dir.path(), "js-c.md", "---\nimpact: HIGH\n---\n");

        let pipeline = Pipeline::builder()
            .rules_dir(dir.path())
            .check(RequireTitle)
            .build()
            .unwrap();
        let report = pipeline.validate().unwrap();

        assert_eq!(report.files_checked, 3);
        let codes: Vec<(&str, String)> = report
            .violations
            .iter()
            .map(|v| (v.code.as_str(), v.location.file.display().to_string()))
            .collect();
        assert_eq!(
            codes,
            vec![
                ("T001", "js-a.md".to_string()),
                (PARSE_ERROR_CODE, "js-b.md".to_string()),
                ("T001", "js-c.md".to_string()),
            ]
        );
        assert!(report.violations.iter().all(|v| v.severity == Severity::Error));
    }

    #[test]
    fn compile_aborts_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "js-a.md", "---\ntitle: A\nimpact: LOW\n---\nbody\n");
        write(dir.path(), "js-b.md", "---\ntitle: B\nimpact: LOW\n");

        let pipeline = Pipeline::builder().rules_dir(dir.path()).build().unwrap();
        match pipeline.compile() {
            Err(PipelineError::Parse(e)) => assert_eq!(e.file, PathBuf::from("js-b.md")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn compile_refuses_invalid_corpus() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "js-a.md", "---\nimpact: LOW\n---\nbody\n");

        let pipeline = Pipeline::builder()
            .rules_dir(dir.path())
            .check(RequireTitle)
            .build()
            .unwrap();
        match pipeline.compile() {
            Err(PipelineError::Invalid { report }) => assert_eq!(report.by_code("T001").len(), 1),
            other => panic!("expected invalid corpus, got {other:?}"),
        }
    }

    #[test]
    fn compile_merges_section_descriptions() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "js-a.md", "---\ntitle: A\nimpact: LOW\n---\nbody\n");
        write(
            dir.path(),
            "_sections.md",
            "## 7. JavaScript Performance (js)\n\n**Description:** Micro-optimizations.\n",
        );

        let pipeline = Pipeline::builder()
            .rules_dir(dir.path())
            .sections_file("_sections.md")
            .build()
            .unwrap();
        let compilation = pipeline.compile().unwrap();

        let section = &compilation.document.sections[0];
        assert_eq!(section.descriptor.description.as_deref(), Some("Micro-optimizations."));
        assert_eq!(compilation.report.files_checked, 1);
    }

    #[test]
    fn sections_file_is_never_discovered_as_a_rule() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "js-a.md", "---\ntitle: A\nimpact: LOW\n---\nbody\n");
        write(
            dir.path(),
            "sections.md",
            "## 7. JavaScript Performance (js)\n\n**Description:** Hot paths.\n",
        );

        let pipeline = Pipeline::builder()
            .rules_dir(dir.path())
            .sections_file("sections.md")
            .check(RequireTitle)
            .build()
            .unwrap();

        let report = pipeline.validate().unwrap();
        assert_eq!(report.files_checked, 1);
        assert!(report.violations.is_empty());

        let compilation = pipeline.compile().unwrap();
        let section = &compilation.document.sections[0];
        assert_eq!(section.descriptor.description.as_deref(), Some("Hot paths."));
    }

    #[test]
    fn undecodable_file_does_not_hide_other_findings() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "async-a.md", "---\ntitle: A\nimpact: HIGH\n---\nbody\n");
        std::fs::write(dir.path().join("async-b.md"), b"---\ntitle: \xff\xfe\n---\n").unwrap();
        write(dir.path(), "misc-c.md", "---\nimpact: LOW\n---\nbody\n");

        let pipeline = Pipeline::builder()
            .rules_dir(dir.path())
            .check(RequireTitle)
            .build()
            .unwrap();
        let report = pipeline.validate().unwrap();

        assert_eq!(report.files_checked, 3);
        let found: Vec<(&str, String)> = report
            .violations
            .iter()
            .map(|v| (v.code.as_str(), v.location.to_string()))
            .collect();
        assert_eq!(
            found,
            vec![
                (PARSE_ERROR_CODE, "async-b.md:2".to_string()),
                ("T001", "misc-c.md".to_string()),
            ]
        );

        match pipeline.compile() {
            Err(PipelineError::Parse(e)) => {
                assert_eq!(e.kind, frontmatter::ParseErrorKind::InvalidUtf8 { line: 2 });
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
