//! Warn when a rule has no tags.

use rulebook_core::{Check, CheckContext, RuleDraft, Severity, Violation};

/// Check code for missing-tags.
pub const CODE: &str = "RB004";

/// Check name for missing-tags.
pub const NAME: &str = "missing-tags";

/// Warns on an empty `tags` set.
#[derive(Debug, Clone, Default)]
pub struct MissingTags;

impl MissingTags {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for MissingTags {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Warns when `tags` is missing or empty"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &CheckContext, draft: &RuleDraft) -> Vec<Violation> {
        if draft.frontmatter.tags.is_empty() {
            vec![self
                .violation(ctx, "no tags".to_string())
                .with_help("Add `tags: a, b, c`")]
        } else {
            vec![]
        }
    }
}
