//! Domain model: impact tiers, section descriptors and validated rule records.
//!
//! All invariants are enforced at construction time. A [`RuleRecord`] can
//! only be built from a draft whose title, impact and category are valid, so
//! the assembler never sees schema-invalid input.

use crate::frontmatter::RuleDraft;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// Severity/priority label attached to rules and sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImpactTier {
    /// `CRITICAL`
    #[serde(rename = "CRITICAL")]
    Critical,
    /// `HIGH`
    #[serde(rename = "HIGH")]
    High,
    /// `MEDIUM-HIGH`
    #[serde(rename = "MEDIUM-HIGH")]
    MediumHigh,
    /// `MEDIUM`
    #[serde(rename = "MEDIUM")]
    Medium,
    /// `LOW-MEDIUM`
    #[serde(rename = "LOW-MEDIUM")]
    LowMedium,
    /// `LOW`
    #[serde(rename = "LOW")]
    Low,
}

impl ImpactTier {
    /// Every tier, most severe first.
    pub const ALL: [Self; 6] = [
        Self::Critical,
        Self::High,
        Self::MediumHigh,
        Self::Medium,
        Self::LowMedium,
        Self::Low,
    ];

    /// Returns the canonical label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::MediumHigh => "MEDIUM-HIGH",
            Self::Medium => "MEDIUM",
            Self::LowMedium => "LOW-MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Comma-separated list of accepted labels, for messages.
    #[must_use]
    pub fn expected_labels() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ImpactTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImpactTier {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| ModelError::InvalidImpact {
                value: value.to_string(),
            })
    }
}

/// Static configuration for one section of the compiled document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    /// Category key matched against rule file names.
    pub prefix: String,
    /// Human-readable section name.
    pub name: String,
    /// Position in the document (1-based, unique).
    pub ordinal: u32,
    /// Tier shown in the section header.
    pub impact: ImpactTier,
    /// Optional prose merged from the section-definitions file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SectionDescriptor {
    /// Creates a descriptor without description.
    #[must_use]
    pub fn new(prefix: &str, name: &str, ordinal: u32, impact: ImpactTier) -> Self {
        Self {
            prefix: prefix.to_string(),
            name: name.to_string(),
            ordinal,
            impact,
            description: None,
        }
    }

    /// Display label used for the heading and TOC entry (`"1. Name"`).
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}. {}", self.ordinal, self.name)
    }

    /// Whether a source id belongs to this section (`prefix` or `prefix-*`).
    #[must_use]
    pub fn matches(&self, source_id: &str) -> bool {
        source_id
            .strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
    }
}

/// Immutable, validated table of section descriptors ordered by ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTable {
    sections: Vec<SectionDescriptor>,
}

impl SectionTable {
    /// Creates a table from descriptors.
    ///
    /// # Errors
    ///
    /// Returns every problem found: empty prefixes, ordinal 0, duplicate
    /// prefixes and duplicate ordinals.
    pub fn new(mut sections: Vec<SectionDescriptor>) -> Result<Self, Vec<ModelError>> {
        let mut errors = Vec::new();
        let mut prefixes = HashSet::new();
        let mut ordinals = HashSet::new();

        for s in &sections {
            if s.prefix.is_empty() {
                errors.push(ModelError::EmptyPrefix { ordinal: s.ordinal });
            }
            if s.ordinal == 0 {
                errors.push(ModelError::ZeroOrdinal {
                    prefix: s.prefix.clone(),
                });
            }
            if !prefixes.insert(s.prefix.clone()) {
                errors.push(ModelError::DuplicatePrefix {
                    prefix: s.prefix.clone(),
                });
            }
            if !ordinals.insert(s.ordinal) {
                errors.push(ModelError::DuplicateOrdinal { ordinal: s.ordinal });
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        sections.sort_by_key(|s| s.ordinal);
        Ok(Self { sections })
    }

    /// The built-in eight-section table.
    #[must_use]
    pub fn builtin() -> Self {
        use ImpactTier::{Critical, High, Low, LowMedium, Medium, MediumHigh};
        let sections = vec![
            SectionDescriptor::new("async", "Eliminating Waterfalls", 1, Critical),
            SectionDescriptor::new("bundle", "Bundle Size Optimization", 2, Critical),
            SectionDescriptor::new("server", "Server-Side Performance", 3, High),
            SectionDescriptor::new("client", "Client-Side Data Fetching", 4, MediumHigh),
            SectionDescriptor::new("rerender", "Re-render Optimization", 5, Medium),
            SectionDescriptor::new("rendering", "Rendering Performance", 6, Medium),
            SectionDescriptor::new("js", "JavaScript Performance", 7, LowMedium),
            SectionDescriptor::new("advanced", "Advanced Patterns", 8, Low),
        ];
        // Already sorted with unique keys.
        Self { sections }
    }

    /// Returns a copy with descriptions merged in by ordinal.
    ///
    /// Ordinals with no entry keep their current description.
    #[must_use]
    pub fn with_descriptions(mut self, descriptions: &BTreeMap<u32, String>) -> Self {
        for s in &mut self.sections {
            if let Some(text) = descriptions.get(&s.ordinal) {
                s.description = Some(text.clone());
            }
        }
        self
    }

    /// Descriptors in ordinal order.
    #[must_use]
    pub fn sections(&self) -> &[SectionDescriptor] {
        &self.sections
    }

    /// Looks up a descriptor by exact prefix.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&SectionDescriptor> {
        self.sections.iter().find(|s| s.prefix == prefix)
    }

    /// Resolves the category of a source id by longest matching prefix.
    #[must_use]
    pub fn category_for(&self, source_id: &str) -> Option<&SectionDescriptor> {
        self.sections
            .iter()
            .filter(|s| s.matches(source_id))
            .max_by_key(|s| s.prefix.len())
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Default for SectionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A parsed and schema-valid rule document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRecord {
    /// File name without extension.
    pub source_id: String,
    /// Non-empty display title.
    pub title: String,
    /// Impact tier of this rule.
    pub impact: ImpactTier,
    /// Short explanation of the impact.
    pub impact_description: Option<String>,
    /// Tags, possibly empty.
    pub tags: BTreeSet<String>,
    /// Text after the metadata block.
    pub body: String,
    /// Prefix of the section this rule belongs to.
    pub category: String,
}

impl RuleRecord {
    /// Builds a record from a parsed draft, resolving its category.
    ///
    /// # Errors
    ///
    /// Returns the first of missing title, invalid impact or unknown
    /// category. Use the check set for a full report.
    pub fn from_draft(draft: RuleDraft, table: &SectionTable) -> Result<Self, ModelError> {
        let RuleDraft {
            source_id,
            frontmatter,
            body,
        } = draft;

        let title = frontmatter
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ModelError::MissingTitle {
                source_id: source_id.clone(),
            })?;

        let impact = frontmatter
            .impact
            .as_deref()
            .ok_or(ModelError::MissingImpact)?
            .parse::<ImpactTier>()?;

        let category = table
            .category_for(&source_id)
            .map(|s| s.prefix.clone())
            .ok_or_else(|| ModelError::UnknownCategory {
                source_id: source_id.clone(),
            })?;

        Ok(Self {
            source_id,
            title,
            impact,
            impact_description: frontmatter.impact_description,
            tags: frontmatter.tags,
            body,
            category,
        })
    }
}

/// Project-level metadata rendered into the document header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Document title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Version string.
    pub version: String,
    /// Owning organization.
    pub organization: String,
    /// Caller-supplied date, rendered verbatim.
    pub date: String,
    /// Abstract paragraph(s).
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Reference URLs for the closing block.
    #[serde(default)]
    pub references: Vec<String>,
}

fn default_title() -> String {
    "Rulebook".to_string()
}

impl ProjectMetadata {
    /// Parses metadata from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a required field is missing.
    pub fn from_json(content: &str) -> Result<Self, ModelError> {
        serde_json::from_str(content).map_err(|e| ModelError::Metadata {
            message: e.to_string(),
        })
    }
}

/// Model construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Impact value outside the enumerated set.
    #[error("invalid impact `{value}`, expected one of: {}", ImpactTier::expected_labels())]
    InvalidImpact {
        /// The offending value.
        value: String,
    },

    /// Impact key absent.
    #[error("missing impact")]
    MissingImpact,

    /// Title absent or blank.
    #[error("{source_id}: missing title")]
    MissingTitle {
        /// Rule the title is missing from.
        source_id: String,
    },

    /// No descriptor prefix matches the source id.
    #[error("{source_id}: no section matches this file name prefix")]
    UnknownCategory {
        /// The unmatched source id.
        source_id: String,
    },

    /// Descriptor with an empty prefix.
    #[error("section {ordinal} has an empty prefix")]
    EmptyPrefix {
        /// Ordinal of the offending descriptor.
        ordinal: u32,
    },

    /// Descriptor with ordinal 0.
    #[error("section `{prefix}` has ordinal 0, ordinals start at 1")]
    ZeroOrdinal {
        /// Prefix of the offending descriptor.
        prefix: String,
    },

    /// Two descriptors share a prefix.
    #[error("duplicate section prefix `{prefix}`")]
    DuplicatePrefix {
        /// The repeated prefix.
        prefix: String,
    },

    /// Two descriptors share an ordinal.
    #[error("duplicate section ordinal {ordinal}")]
    DuplicateOrdinal {
        /// The repeated ordinal.
        ordinal: u32,
    },

    /// Project metadata could not be decoded.
    #[error("invalid project metadata: {message}")]
    Metadata {
        /// Decoder message.
        message: String,
    },
}
