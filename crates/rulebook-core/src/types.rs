//! Core types for check findings and validation reports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Severity level for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Non-blocking finding. Reported, never affects validity.
    Warning,
    /// Blocking finding. Any error makes the corpus invalid.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where a finding points to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File name of the rule document (relative to the rules directory).
    pub file: PathBuf,
    /// Line number (1-indexed), when the finding maps to a single line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Location {
    /// Creates a file-level location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            line: None,
        }
    }

    /// Attaches a line number.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.file.display()),
            None => write!(f, "{}", self.file.display()),
        }
    }
}

/// A single finding produced by a check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Check code (e.g., "RB002").
    pub code: String,
    /// Check name (e.g., "invalid-impact").
    pub check: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Originating file.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional hint for fixing the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Violation {
    /// Creates a new finding.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        check: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            check: check.into(),
            severity,
            location,
            message: message.into(),
            help: None,
        }
    }

    /// Adds a fix hint.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Returns true for blocking findings.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location, self.severity, self.code, self.message
        )
    }
}

/// Result of validating a rule corpus.
///
/// Findings are collected across every file; nothing short-circuits.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All findings, ordered by file then by check order.
    pub violations: Vec<Violation>,
    /// Number of rule files examined.
    pub files_checked: usize,
}

impl ValidationReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any blocking findings.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(Violation::is_error)
    }

    /// A corpus is valid when it has zero errors. Warnings never count.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Returns findings filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Returns all findings carrying the given check code.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.code == code).collect()
    }

    /// Counts findings as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self.violations.iter().filter(|v| v.is_error()).count();
        (errors, self.violations.len() - errors)
    }

    /// Groups findings by originating file, files in lexical order.
    #[must_use]
    pub fn by_file(&self) -> BTreeMap<&Path, Vec<&Violation>> {
        let mut grouped: BTreeMap<&Path, Vec<&Violation>> = BTreeMap::new();
        for v in &self.violations {
            grouped.entry(v.location.file.as_path()).or_default().push(v);
        }
        grouped
    }

    /// One-line pass/fail summary.
    #[must_use]
    pub fn status_line(&self) -> String {
        let (errors, warnings) = self.count_by_severity();
        let status = if self.is_valid() { "PASSED" } else { "FAILED" };
        format!(
            "{status}: {errors} error(s), {warnings} warning(s) in {} file(s)",
            self.files_checked
        )
    }

    /// Formats every finding grouped by file, one blank line after each file.
    ///
    /// The status line is not included; see [`ValidationReport::status_line`].
    #[must_use]
    pub fn format_findings(&self) -> String {
        let mut report = String::new();

        for (file, violations) in self.by_file() {
            let _ = writeln!(report, "{}", file.display());
            for v in violations {
                let line = v.location.line.map(|l| format!(":{l}")).unwrap_or_default();
                let _ = writeln!(
                    report,
                    "  {}{line} [{}] {}: {}",
                    v.severity, v.code, v.check, v.message
                );
                if let Some(help) = &v.help {
                    let _ = writeln!(report, "    = help: {help}");
                }
            }
            let _ = writeln!(report);
        }

        report
    }
}
