//! Extraction of labelled bad/good code examples from rule bodies.
//!
//! Rule bodies pair a bold label with the fenced block right below it:
//!
//! ````text
//! **Incorrect (sequential, 3 round trips):**
//!
//! ```typescript
//! const user = await fetchUser()
//! ```
//! ````

use crate::assembler::CompiledDocument;
use serde::Serialize;

/// Lowercase marker that opens a bad-example label.
pub const BAD_EXAMPLE_MARKER: &str = "**incorrect";

/// Lowercase marker that opens a good-example label.
pub const GOOD_EXAMPLE_MARKER: &str = "**correct";

const FENCE: &str = "```";

/// Whether an example shows what to avoid or what to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExampleKind {
    /// Labelled `**Incorrect...`.
    Bad,
    /// Labelled `**Correct...`.
    Good,
}

/// One extracted code example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleCase {
    /// Rule number in the compiled document (e.g. `"1.2"`).
    pub rule_id: String,
    /// Source file identifier.
    pub source_id: String,
    /// Rule title.
    pub rule_title: String,
    /// Section display name.
    pub section: String,
    /// Bad or good.
    pub kind: ExampleKind,
    /// Label text without the bold markers and trailing colon.
    pub label: String,
    /// Fence info string, empty if none.
    pub language: String,
    /// Code inside the fence.
    pub code: String,
}

/// Example found in a single body, before rule context is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyExample {
    /// Bad or good.
    pub kind: ExampleKind,
    /// Cleaned label.
    pub label: String,
    /// Fence info string.
    pub language: String,
    /// Code inside the fence.
    pub code: String,
}

/// Extracts every labelled example from every rule in document order.
#[must_use]
pub fn extract_examples(doc: &CompiledDocument) -> Vec<ExampleCase> {
    doc.numbered_rules()
        .flat_map(|(number, section, rule)| {
            examples_in_body(&rule.body)
                .into_iter()
                .map(move |ex| ExampleCase {
                    rule_id: number.clone(),
                    source_id: rule.source_id.clone(),
                    rule_title: rule.title.clone(),
                    section: section.descriptor.name.clone(),
                    kind: ex.kind,
                    label: ex.label,
                    language: ex.language,
                    code: ex.code,
                })
        })
        .collect()
}

/// Finds labelled examples in one body.
///
/// A fenced block counts only when a bad/good label precedes it; markers
/// inside fenced blocks are ignored.
#[must_use]
pub fn examples_in_body(body: &str) -> Vec<BodyExample> {
    let mut examples = Vec::new();
    let mut pending: Option<(ExampleKind, String)> = None;
    let mut lines = body.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim();

        if let Some(info) = trimmed.strip_prefix(FENCE) {
            let mut code = Vec::new();
            for inner in lines.by_ref() {
                if inner.trim() == FENCE {
                    break;
                }
                code.push(inner);
            }
            if let Some((kind, label)) = pending.take() {
                examples.push(BodyExample {
                    kind,
                    label,
                    language: info.trim().to_string(),
                    code: code.join("\n"),
                });
            }
            continue;
        }

        if let Some(kind) = label_kind(trimmed) {
            pending = Some((kind, clean_label(trimmed)));
        }
    }

    examples
}

/// Classifies a bold label line.
#[must_use]
pub fn label_kind(line: &str) -> Option<ExampleKind> {
    let lower = line.to_lowercase();
    if lower.starts_with(BAD_EXAMPLE_MARKER) {
        Some(ExampleKind::Bad)
    } else if lower.starts_with(GOOD_EXAMPLE_MARKER) {
        Some(ExampleKind::Good)
    } else {
        None
    }
}

fn clean_label(line: &str) -> String {
    line.trim_matches('*')
        .trim()
        .trim_end_matches(':')
        .trim_end()
        .to_string()
}
