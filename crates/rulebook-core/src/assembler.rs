//! Document assembly: table of contents, anchors and Markdown rendering.

use crate::model::{ImpactTier, ProjectMetadata, RuleRecord, SectionDescriptor};
use crate::registry::Section;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Turns a heading label into a URL-safe anchor.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single `-` and strips leading/trailing `-`. Every anchor in a document,
/// in the TOC and on headings, comes from this function.
#[must_use]
pub fn anchor(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_dash = false;
    for ch in label.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Nesting level of a TOC entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TocLevel {
    /// A section heading.
    Section,
    /// A rule heading inside a section.
    Rule,
}

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Section or rule.
    pub level: TocLevel,
    /// `"1"` for sections, `"1.2"` for rules.
    pub number: String,
    /// Text the anchor is derived from.
    pub label: String,
    /// Link target, equal to `anchor(label)`.
    pub anchor: String,
    /// Impact tier shown next to the entry.
    pub impact: ImpactTier,
}

/// Assembly invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum AssembleError {
    /// Two headings produce the same anchor.
    #[error("anchor `{anchor}` is generated by both `{first}` and `{second}`")]
    #[diagnostic(
        code(rulebook::anchor_collision),
        help("rule titles must be unique once punctuation and case are ignored")
    )]
    AnchorCollision {
        /// The shared anchor.
        anchor: String,
        /// Label that produced it first.
        first: String,
        /// Label that collided with it.
        second: String,
    },

    /// A heading label without any alphanumeric character.
    #[error("heading `{label}` produces an empty anchor")]
    #[diagnostic(code(rulebook::empty_anchor))]
    EmptyAnchor {
        /// The label.
        label: String,
    },
}

/// Grouped sections plus their table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDocument {
    /// Sections in ordinal order, rules in `source_id` order.
    pub sections: Vec<Section>,
    /// One entry per section and per rule, in document order.
    pub toc: Vec<TocEntry>,
}

impl CompiledDocument {
    /// Builds the table of contents for grouped sections.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError`] if two headings share an anchor or a heading
    /// has no anchor at all.
    pub fn new(sections: Vec<Section>) -> Result<Self, AssembleError> {
        let mut toc = Vec::new();
        let mut seen: HashMap<String, String> = HashMap::new();

        let mut push = |entry: TocEntry| -> Result<(), AssembleError> {
            if entry.anchor.is_empty() {
                return Err(AssembleError::EmptyAnchor { label: entry.label });
            }
            if let Some(first) = seen.insert(entry.anchor.clone(), entry.label.clone()) {
                return Err(AssembleError::AnchorCollision {
                    anchor: entry.anchor,
                    first,
                    second: entry.label,
                });
            }
            toc.push(entry);
            Ok(())
        };

        for section in &sections {
            let d = &section.descriptor;
            push(TocEntry {
                level: TocLevel::Section,
                number: d.ordinal.to_string(),
                label: d.label(),
                anchor: section_anchor(d),
                impact: d.impact,
            })?;
            for (idx, rule) in section.rules.iter().enumerate() {
                push(TocEntry {
                    level: TocLevel::Rule,
                    number: rule_number(d, idx),
                    label: rule.title.clone(),
                    anchor: rule_anchor(rule),
                    impact: rule.impact,
                })?;
            }
        }

        Ok(Self { sections, toc })
    }

    /// Number of rules across all sections.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.sections.iter().map(|s| s.rules.len()).sum()
    }

    /// Iterates rules in document order with their `"1.2"` numbers.
    pub fn numbered_rules(&self) -> impl Iterator<Item = (String, &Section, &RuleRecord)> {
        self.sections.iter().flat_map(|section| {
            section
                .rules
                .iter()
                .enumerate()
                .map(move |(idx, rule)| (rule_number(&section.descriptor, idx), section, rule))
        })
    }

    /// Renders the table of contents as a nested Markdown list.
    #[must_use]
    pub fn render_toc(&self) -> String {
        let mut out = String::new();
        for entry in &self.toc {
            match entry.level {
                TocLevel::Section => {
                    let _ = writeln!(
                        out,
                        "- [{}](#{}) — **{}**",
                        entry.label, entry.anchor, entry.impact
                    );
                }
                TocLevel::Rule => {
                    let _ = writeln!(
                        out,
                        "  - {} [{}](#{})",
                        entry.number, entry.label, entry.anchor
                    );
                }
            }
        }
        out
    }

    /// Renders the whole document.
    ///
    /// Output depends only on the sections and `meta`; rendering twice gives
    /// byte-identical text.
    #[must_use]
    pub fn render(&self, meta: &ProjectMetadata) -> String {
        let mut blocks: Vec<String> = Vec::new();

        blocks.push(format!(
            "# {}\n\n**Version {}**  \n{}  \n{}",
            meta.title, meta.version, meta.organization, meta.date
        ));
        blocks.push(format!("## Abstract\n\n{}", meta.abstract_text.trim()));
        blocks.push(format!(
            "## Table of Contents\n\n{}",
            self.render_toc().trim_end()
        ));
        blocks.push("---".to_string());

        for section in &self.sections {
            let d = &section.descriptor;
            blocks.push(heading(&section_anchor(d), 2, &d.label()));
            blocks.push(format!("**Impact: {}**", d.impact));
            if let Some(description) = d.description.as_deref().map(str::trim) {
                if !description.is_empty() {
                    blocks.push(description.to_string());
                }
            }

            for (idx, rule) in section.rules.iter().enumerate() {
                let title = format!("{} {}", rule_number(d, idx), rule.title);
                blocks.push(heading(&rule_anchor(rule), 3, &title));
                blocks.push(impact_line(rule));
                let body = rendered_body(&rule.body);
                if !body.trim().is_empty() {
                    blocks.push(body.to_string());
                }
            }

            blocks.push("---".to_string());
        }

        if !meta.references.is_empty() {
            let mut refs = String::from("## References\n");
            for (idx, url) in meta.references.iter().enumerate() {
                let _ = write!(refs, "\n{}. [{url}]({url})", idx + 1);
            }
            blocks.push(refs);
        }

        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }
}

/// Body text as it appears in the document: leading and trailing line
/// breaks removed, everything else verbatim.
#[must_use]
pub fn rendered_body(body: &str) -> &str {
    body.trim_matches(['\n', '\r'])
}

fn section_anchor(d: &SectionDescriptor) -> String {
    anchor(&d.label())
}

fn rule_anchor(rule: &RuleRecord) -> String {
    anchor(&rule.title)
}

fn rule_number(d: &SectionDescriptor, idx: usize) -> String {
    format!("{}.{}", d.ordinal, idx + 1)
}

fn heading(anchor: &str, depth: usize, text: &str) -> String {
    format!("<a id=\"{anchor}\"></a>\n\n{} {text}", "#".repeat(depth))
}

fn impact_line(rule: &RuleRecord) -> String {
    match rule.impact_description.as_deref() {
        Some(description) => format!("**Impact: {} ({description})**", rule.impact),
        None => format!("**Impact: {}**", rule.impact),
    }
}
