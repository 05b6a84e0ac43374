//! # rulebook-checks
//!
//! Built-in schema checks for rule documents.
//!
//! ## Available Checks
//!
//! | Code | Name | Severity | Description |
//! |------|------|----------|-------------|
//! | RB001 | `missing-title` | error | `title` present and non-empty |
//! | RB002 | `invalid-impact` | error | `impact` is a known tier |
//! | RB003 | `unknown-category` | error | file name prefix matches a section |
//! | RB004 | `missing-tags` | warning | `tags` non-empty |
//! | RB005 | `no-code-example` | warning | body has a fenced code block |
//! | RB006 | `missing-example-pair` | warning | body has `**Incorrect` and `**Correct` examples |
//!
//! `RB000` (`parse-error`) is reported by the pipeline itself for files whose
//! metadata block cannot be parsed.
//!
//! ## Usage
//!
//! ```ignore
//! use rulebook_core::Pipeline;
//!
//! let pipeline = Pipeline::builder()
//!     .rules_dir("./rules")
//!     .checks(rulebook_checks::default_checks())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod invalid_impact;
mod missing_example_pair;
mod missing_tags;
mod missing_title;
mod no_code_example;
mod unknown_category;

pub use invalid_impact::InvalidImpact;
pub use missing_example_pair::MissingExamplePair;
pub use missing_tags::MissingTags;
pub use missing_title::MissingTitle;
pub use no_code_example::NoCodeExample;
pub use unknown_category::UnknownCategory;

/// Re-export core types for convenience.
pub use rulebook_core::{Check, CheckBox, Severity, Violation};

/// Returns every built-in check, in reporting order.
///
/// Errors come first (title, impact, category), then warnings (tags, code
/// example, example pair).
#[must_use]
pub fn default_checks() -> Vec<CheckBox> {
    vec![
        Box::new(MissingTitle::new()),
        Box::new(InvalidImpact::new()),
        Box::new(UnknownCategory::new()),
        Box::new(MissingTags::new()),
        Box::new(NoCodeExample::new()),
        Box::new(MissingExamplePair::new()),
    ]
}
