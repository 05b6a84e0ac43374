//! # rulebook-core
//!
//! Core framework for compiling independently-authored rule documents into
//! one reference document.
//!
//! This crate provides:
//!
//! - [`frontmatter::parse`] for splitting a rule file into metadata and body
//! - [`Check`] trait for schema checks (built-in set in `rulebook-checks`)
//! - [`SectionTable`] and [`registry::group`] for deterministic grouping
//! - [`CompiledDocument`] for the table of contents and Markdown rendering
//! - [`Pipeline`] for orchestrating parse → validate → group → assemble
//!
//! ## Example
//!
//! ```ignore
//! use rulebook_core::{Pipeline, ProjectMetadata};
//!
//! let pipeline = Pipeline::builder()
//!     .rules_dir("./rules")
//!     .checks(rulebook_checks::default_checks())
//!     .build()?;
//!
//! let compilation = pipeline.compile()?;
//! let markdown = compilation.document.render(&metadata);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembler;
mod check;
mod config;
mod extract;
mod model;
mod output;
mod pipeline;
mod types;

pub mod frontmatter;
pub mod registry;

pub use assembler::{anchor, rendered_body, AssembleError, CompiledDocument, TocEntry, TocLevel};
pub use check::{Check, CheckBox, CheckContext};
pub use config::{Config, ConfigError, OutputConfig, SourcesConfig};
pub use extract::{
    examples_in_body, extract_examples, label_kind, BodyExample, ExampleCase, ExampleKind,
    BAD_EXAMPLE_MARKER, GOOD_EXAMPLE_MARKER,
};
pub use frontmatter::{Frontmatter, ParseError, ParseErrorKind, RuleDraft};
pub use model::{ImpactTier, ModelError, ProjectMetadata, RuleRecord, SectionDescriptor, SectionTable};
pub use output::write_atomic;
pub use pipeline::{
    Compilation, Pipeline, PipelineBuilder, PipelineError, SourceFile, PARSE_ERROR_CODE,
    PARSE_ERROR_NAME,
};
pub use registry::{RegistryError, Section};
pub use types::{Location, Severity, ValidationReport, Violation};
