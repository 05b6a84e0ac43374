//! Check that every rule carries a non-empty title.
//!
//! The title becomes the rule heading and its anchor, so a rule without one
//! cannot be placed in the document.

use rulebook_core::{Check, CheckContext, RuleDraft, Severity, Violation};

/// Check code for missing-title.
pub const CODE: &str = "RB001";

/// Check name for missing-title.
pub const NAME: &str = "missing-title";

/// Requires a non-empty `title`.
#[derive(Debug, Clone, Default)]
pub struct MissingTitle;

impl MissingTitle {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for MissingTitle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires a non-empty `title` in the metadata block"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &CheckContext, draft: &RuleDraft) -> Vec<Violation> {
        let message = match draft.frontmatter.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => return vec![],
            Some(_) => "`title` is empty",
            None => "missing `title`",
        };
        vec![self
            .violation(ctx, message.to_string())
            .with_help("Add `title: <display name>` to the metadata block")]
    }
}
