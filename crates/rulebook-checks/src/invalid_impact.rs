//! Check that every rule declares a known impact tier.
//!
//! # Accepted values
//!
//! `CRITICAL`, `HIGH`, `MEDIUM-HIGH`, `MEDIUM`, `LOW-MEDIUM`, `LOW`
//! (exact, upper case).

use rulebook_core::{Check, CheckContext, ImpactTier, RuleDraft, Violation};

/// Check code for invalid-impact.
pub const CODE: &str = "RB002";

/// Check name for invalid-impact.
pub const NAME: &str = "invalid-impact";

/// Requires `impact` to be one of the enumerated tiers.
#[derive(Debug, Clone, Default)]
pub struct InvalidImpact;

impl InvalidImpact {
    /// Creates the check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Check for InvalidImpact {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires `impact` to be a known impact tier"
    }

    fn check(&self, ctx: &CheckContext, draft: &RuleDraft) -> Vec<Violation> {
        let message = match draft.frontmatter.impact.as_deref() {
            None => "missing `impact`".to_string(),
            Some(value) => match value.parse::<ImpactTier>() {
                Ok(_) => return vec![],
                Err(e) => e.to_string(),
            },
        };
        vec![self
            .violation(ctx, message)
            .with_help(format!("Use one of: {}", ImpactTier::expected_labels()))]
    }
}
