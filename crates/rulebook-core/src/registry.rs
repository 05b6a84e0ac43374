//! Section registry: groups validated records into ordered sections.

use crate::model::{RuleRecord, SectionDescriptor, SectionTable};
use std::collections::BTreeMap;
use tracing::debug;

/// One section of the compiled document with its rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Static descriptor, including any merged description.
    pub descriptor: SectionDescriptor,
    /// Rules ordered by `source_id`.
    pub rules: Vec<RuleRecord>,
}

/// Grouping errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum RegistryError {
    /// A record's category has no descriptor in the table.
    #[error("{source_id}: category `{category}` is not in the section table")]
    #[diagnostic(code(rulebook::unknown_category))]
    UnknownCategory {
        /// Offending record.
        source_id: String,
        /// Its category.
        category: String,
    },
}

/// Groups records by category.
///
/// Sections come out in ordinal order and records in lexical `source_id`
/// order, whatever order the records were supplied in. Sections without
/// records are omitted.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownCategory`] if a record's category is not
/// a prefix in `table`.
pub fn group(table: &SectionTable, records: Vec<RuleRecord>) -> Result<Vec<Section>, RegistryError> {
    let mut by_prefix: BTreeMap<String, Vec<RuleRecord>> = BTreeMap::new();

    for record in records {
        if table.get(&record.category).is_none() {
            return Err(RegistryError::UnknownCategory {
                source_id: record.source_id,
                category: record.category,
            });
        }
        by_prefix.entry(record.category.clone()).or_default().push(record);
    }

    let sections = table
        .sections()
        .iter()
        .filter_map(|descriptor| {
            let mut rules = by_prefix.remove(&descriptor.prefix)?;
            rules.sort_by(|a, b| a.source_id.cmp(&b.source_id));
            debug!("Section {}: {} rule(s)", descriptor.label(), rules.len());
            Some(Section {
                descriptor: descriptor.clone(),
                rules,
            })
        })
        .collect();

    Ok(sections)
}

/// Parses per-section descriptions from the section-definitions file.
///
/// Recognised layout:
///
/// ```text
/// ## 1. Eliminating Waterfalls (async)
///
/// **Impact:** CRITICAL
/// **Description:** Waterfalls are the #1 performance killer.
/// ```
///
/// Descriptions are keyed by the ordinal of the nearest preceding heading.
/// Headings without a description are absent from the map.
#[must_use]
pub fn parse_section_descriptions(content: &str) -> BTreeMap<u32, String> {
    let mut descriptions = BTreeMap::new();
    let mut current: Option<u32> = None;

    for line in content.lines() {
        let line = line.trim();
        if let Some(heading) = line.strip_prefix("## ") {
            current = heading
                .split_once('.')
                .and_then(|(n, _)| n.trim().parse().ok());
            continue;
        }
        let Some(ordinal) = current else {
            continue;
        };
        if let Some(text) = line.strip_prefix("**Description:**") {
            let text = text.trim();
            if !text.is_empty() {
                descriptions.insert(ordinal, text.to_string());
            }
        }
    }

    descriptions
}
