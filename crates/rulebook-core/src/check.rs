//! Check trait for schema validation of rule documents.

use crate::frontmatter::RuleDraft;
use crate::model::SectionTable;
use crate::types::{Location, Severity, Violation};
use std::path::Path;

/// Context provided to checks.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// File name of the document, relative to the rules directory.
    pub file: &'a Path,
    /// Section table the corpus is compiled against.
    pub sections: &'a SectionTable,
}

impl<'a> CheckContext<'a> {
    /// Creates a new check context.
    #[must_use]
    pub fn new(file: &'a Path, sections: &'a SectionTable) -> Self {
        Self { file, sections }
    }

    /// File-level location for findings.
    #[must_use]
    pub fn location(&self) -> Location {
        Location::new(self.file)
    }
}

/// A schema check run against every parsed rule document.
///
/// Checks never stop the run: each returns its findings and the pipeline
/// moves on to the next check and the next file.
///
/// # Example
///
/// ```ignore
/// use rulebook_core::{Check, CheckContext, RuleDraft, Severity, Violation};
///
/// pub struct NoEmptyBody;
///
/// impl Check for NoEmptyBody {
///     fn name(&self) -> &'static str { "no-empty-body" }
///     fn code(&self) -> &'static str { "RB100" }
///     fn default_severity(&self) -> Severity { Severity::Warning }
///
///     fn check(&self, ctx: &CheckContext, draft: &RuleDraft) -> Vec<Violation> {
///         if draft.body.trim().is_empty() {
///             vec![self.violation(ctx, "body is empty".to_string())]
///         } else {
///             vec![]
///         }
///     }
/// }
/// ```
pub trait Check: Send + Sync {
    /// Returns the kebab-case name of this check (e.g., "missing-title").
    fn name(&self) -> &'static str;

    /// Returns the check code (e.g., "RB001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this check verifies.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the severity of findings from this check.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks a single parsed document.
    fn check(&self, ctx: &CheckContext, draft: &RuleDraft) -> Vec<Violation>;

    /// Builds a file-level finding carrying this check's code, name and severity.
    fn violation(&self, ctx: &CheckContext, message: String) -> Violation {
        Violation::new(
            self.code(),
            self.name(),
            self.default_severity(),
            ctx.location(),
            message,
        )
    }
}

/// Type alias for boxed Check trait objects.
pub type CheckBox = Box<dyn Check>;
