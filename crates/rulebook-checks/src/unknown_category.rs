//! Check that every rule file name starts with a known section prefix.

use rulebook_core::{Check, CheckContext, RuleDraft, Violation};

/// Check code for unknown-category.
pub const CODE: &str = "RB003";

/// Check name for unknown-category.
pub const NAME: &str = "unknown-category";

/// Requires the file name to resolve to a section of the table.
#[derive(Debug, Clone, Default)]
pub struct UnknownCategory;

impl UnknownCategory {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for UnknownCategory {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires the file name prefix to match a section"
    }

    fn check(&self, ctx: &CheckContext, draft: &RuleDraft) -> Vec<Violation> {
        if ctx.sections.category_for(&draft.source_id).is_some() {
            return vec![];
        }

        let known = ctx
            .sections
            .sections()
            .iter()
            .map(|s| format!("{}-", s.prefix))
            .collect::<Vec<_>>()
            .join(", ");
        vec![self
            .violation(
                ctx,
                format!("`{}` does not start with a known section prefix", draft.source_id),
            )
            .with_help(format!("Rename the file to start with one of: {known}"))]
    }
}
