//! # rulebook
//!
//! Compiles a directory of independently-authored rule documents into one
//! canonical reference document, and validates each rule against the
//! required schema before trusting it as input.
//!
//! This is the main facade crate that re-exports core functionality and the
//! built-in checks.
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use rulebook::{Config, Project};
//!
//! let project = Project::new(".", Config::default());
//!
//! let report = project.validate()?;
//! println!("{}", report.status_line());
//!
//! let outcome = project.compile(None)?;
//! println!("wrote {}", outcome.output.display());
//! ```
//!
//! ## Rule files
//!
//! ```markdown
//! ---
//! title: Promise.all() for Independent Operations
//! impact: CRITICAL
//! impactDescription: 2-10x improvement
//! tags: async, parallelization, promises
//! ---
//!
//! **Incorrect (sequential):** ...
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use rulebook_core::*;

/// Built-in schema checks.
pub mod checks {
    pub use rulebook_checks::*;
}

mod runner;

pub use runner::{CompileOutcome, ExtractOutcome, Project, RunError};
