//! Warn when a rule body lacks either a bad or a good example label.
//!
//! # Detected Patterns
//!
//! Case-insensitive substrings of the body:
//!
//! - `**incorrect` marks a bad example
//! - `**correct` marks a good example
//!
//! Both must be present.

use rulebook_core::{
    Check, CheckContext, RuleDraft, Severity, Violation, BAD_EXAMPLE_MARKER, GOOD_EXAMPLE_MARKER,
};

/// Check code for missing-example-pair.
pub const CODE: &str = "RB006";

/// Check name for missing-example-pair.
pub const NAME: &str = "missing-example-pair";

/// Warns when the body misses an incorrect or a correct example.
#[derive(Debug, Clone, Default)]
pub struct MissingExamplePair;

impl MissingExamplePair {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for MissingExamplePair {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Warns unless the body has both `**Incorrect` and `**Correct` examples"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &CheckContext, draft: &RuleDraft) -> Vec<Violation> {
        let body = draft.body.to_lowercase();
        let missing: Vec<&str> = [
            (BAD_EXAMPLE_MARKER, "**Incorrect"),
            (GOOD_EXAMPLE_MARKER, "**Correct"),
        ]
        .into_iter()
        .filter(|(marker, _)| !body.contains(marker))
        .map(|(_, label)| label)
        .collect();

        if missing.is_empty() {
            return vec![];
        }
        vec![self
            .violation(ctx, format!("missing {} example", missing.join(" and ")))
            .with_help("Label examples with `**Incorrect (...):**` and `**Correct (...):**`")]
    }
}
