//! Warn when a rule body has no fenced code block.

use rulebook_core::{Check, CheckContext, RuleDraft, Severity, Violation};

/// Check code for no-code-example.
pub const CODE: &str = "RB005";

/// Check name for no-code-example.
pub const NAME: &str = "no-code-example";

const FENCE: &str = "```";

/// Warns when the body contains no ```` ``` ```` fence.
#[derive(Debug, Clone, Default)]
pub struct NoCodeExample;

impl NoCodeExample {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for NoCodeExample {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Warns when the body has no fenced code example"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &CheckContext, draft: &RuleDraft) -> Vec<Violation> {
        if draft.body.contains(FENCE) {
            return vec![];
        }
        vec![self.violation(ctx, "body has no fenced code example".to_string())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulebook_core::{frontmatter, SectionTable};
    use std::path::Path;

    fn check_doc(content: &str) -> Vec<Violation> {
        let table = SectionTable::builtin();
        let file = Path::new("js-set-lookup.md");
        let draft = frontmatter::parse(file, content).expect("fixture should parse");
        NoCodeExample::new().check(&CheckContext::new(file, &table), &draft)
    }

    #[test]
    fn test_warns_without_fence() {
        let violations = check_doc("---\ntitle: T\n---\nUse a Set.\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
    }

    #[test]
    fn test_accepts_fence() {
        assert!(check_doc("---\ntitle: T\n---\n```js\nnew Set(xs)\n```\n").is_empty());
    }

    #[test]
    fn test_ignores_fence_in_frontmatter() {
        assert_eq!(check_doc("---\ntitle: ``` odd\n---\nplain\n").len(), 1);
    }
}
