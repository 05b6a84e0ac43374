//! Frontmatter parsing for rule documents.
//!
//! A rule document starts with a `---` delimited block of `key: value`
//! lines, followed by a free-form body:
//!
//! ```text
//! ---
//! title: Promise.all() for Independent Operations
//! impact: CRITICAL
//! impactDescription: 2-10x improvement
//! tags: async, parallelization, promises
//! ---
//!
//! ## Promise.all() for Independent Operations
//! ...
//! ```

use miette::Diagnostic;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

const MARKER: &str = "---";

/// Typed metadata block of a rule document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    /// `title`
    pub title: Option<String>,
    /// `impact`, kept as raw text so checks can report the offending value.
    pub impact: Option<String>,
    /// `impactDescription`
    pub impact_description: Option<String>,
    /// `tags`
    pub tags: BTreeSet<String>,
    /// Keys this parser does not interpret.
    pub extra: BTreeMap<String, String>,
}

/// A parsed, not yet validated, rule document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDraft {
    /// File name without extension.
    pub source_id: String,
    /// Metadata block.
    pub frontmatter: Frontmatter,
    /// Everything after the closing marker, verbatim.
    pub body: String,
}

/// What went wrong while splitting a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// The first line is not `---`.
    #[error("missing opening `---` marker")]
    MissingOpeningMarker,

    /// The metadata block never closes.
    #[error("missing closing `---` marker")]
    MissingClosingMarker,

    /// The block contains no `key: value` lines.
    #[error("metadata block is empty")]
    EmptyBlock,

    /// A line inside the block is not `key: value`.
    #[error("line {line}: expected `key: value`, found `{content}`")]
    MalformedLine {
        /// 1-indexed line number.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// The file is not valid UTF-8.
    #[error("line {line}: file is not valid UTF-8")]
    InvalidUtf8 {
        /// 1-indexed line holding the first invalid byte.
        line: usize,
    },

    /// A `- item` line without a key to attach it to.
    #[error("line {line}: list item without a preceding key")]
    DanglingListItem {
        /// 1-indexed line number.
        line: usize,
    },
}

impl ParseErrorKind {
    /// Line the problem was found on, if it maps to one.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MissingOpeningMarker => Some(1),
            Self::MalformedLine { line, .. }
            | Self::DanglingListItem { line }
            | Self::InvalidUtf8 { line } => Some(*line),
            Self::MissingClosingMarker | Self::EmptyBlock => None,
        }
    }
}

/// A rule document whose metadata block could not be split.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
#[error("failed to parse {}: {kind}", .file.display())]
#[diagnostic(
    code(rulebook::parse),
    help("rule files must start with a `---` block of `key: value` lines closed by `---`")
)]
pub struct ParseError {
    /// Offending file.
    pub file: PathBuf,
    /// Failure detail.
    pub kind: ParseErrorKind,
}

/// Parses a rule document.
///
/// `file` is used for the draft's `source_id` (its stem) and for error
/// reporting only; nothing is read from disk.
///
/// # Errors
///
/// Returns [`ParseError`] if the metadata block is absent, unbalanced or
/// contains a malformed line.
pub fn parse(file: &Path, content: &str) -> Result<RuleDraft, ParseError> {
    let fail = |kind| ParseError {
        file: file.to_path_buf(),
        kind,
    };

    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let first = lines.next().unwrap_or_default();
    if first.trim_end() != MARKER {
        return Err(fail(ParseErrorKind::MissingOpeningMarker));
    }
    let mut consumed = first.len();

    let mut block = Vec::new();
    let mut closed = false;
    for (idx, line) in lines.enumerate() {
        consumed += line.len();
        if line.trim_end() == MARKER {
            closed = true;
            break;
        }
        // Line 1 is the opening marker.
        block.push((idx + 2, line.trim_end_matches(['\n', '\r'])));
    }

    if !closed {
        return Err(fail(ParseErrorKind::MissingClosingMarker));
    }

    let frontmatter = parse_block(&block).map_err(fail)?;

    Ok(RuleDraft {
        source_id: source_id(file),
        frontmatter,
        body: content[consumed..].to_string(),
    })
}

/// Decodes raw file contents as UTF-8, then [`parse`]s them.
///
/// # Errors
///
/// Returns [`ParseErrorKind::InvalidUtf8`] pointing at the line of the
/// first bad byte, or any error from [`parse`].
pub fn parse_bytes(file: &Path, bytes: &[u8]) -> Result<RuleDraft, ParseError> {
    match std::str::from_utf8(bytes) {
        Ok(content) => parse(file, content),
        Err(e) => {
            let valid = &bytes[..e.valid_up_to()];
            let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
            Err(ParseError {
                file: file.to_path_buf(),
                kind: ParseErrorKind::InvalidUtf8 { line },
            })
        }
    }
}

/// Derives the stable identifier of a rule file: its name without extension.
#[must_use]
pub fn source_id(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn parse_block(block: &[(usize, &str)]) -> Result<Frontmatter, ParseErrorKind> {
    let mut fields: Vec<(String, FieldValue)> = Vec::new();

    for &(line_no, line) in block {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let list_item = if trimmed == "-" {
            Some("")
        } else {
            trimmed.strip_prefix("- ")
        };
        if let Some(item) = list_item {
            let Some((_, value)) = fields.last_mut() else {
                return Err(ParseErrorKind::DanglingListItem { line: line_no });
            };
            value.push_item(unquote(item.trim()));
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            return Err(ParseErrorKind::MalformedLine {
                line: line_no,
                content: trimmed.to_string(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ParseErrorKind::MalformedLine {
                line: line_no,
                content: trimmed.to_string(),
            });
        }
        fields.push((key.to_string(), FieldValue::Scalar(unquote(value.trim()))));
    }

    if fields.is_empty() {
        return Err(ParseErrorKind::EmptyBlock);
    }

    let mut fm = Frontmatter::default();
    for (key, value) in fields {
        match key.as_str() {
            "title" => fm.title = Some(value.into_scalar()),
            "impact" => fm.impact = Some(value.into_scalar()),
            "impactDescription" => fm.impact_description = Some(value.into_scalar()),
            "tags" => fm.tags = value.into_tags(),
            _ => {
                fm.extra.insert(key, value.into_scalar());
            }
        }
    }
    fm.impact_description = fm.impact_description.filter(|d| !d.is_empty());

    Ok(fm)
}

/// A key's raw value: inline text, optionally followed by block list items.
#[derive(Debug)]
enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    fn push_item(&mut self, item: String) {
        match self {
            Self::List(items) => items.push(item),
            Self::Scalar(s) => {
                let mut items = Vec::new();
                if !s.is_empty() {
                    items.push(std::mem::take(s));
                }
                items.push(item);
                *self = Self::List(items);
            }
        }
    }

    fn into_scalar(self) -> String {
        match self {
            Self::Scalar(s) => s,
            Self::List(items) => items.join(", "),
        }
    }

    fn into_tags(self) -> BTreeSet<String> {
        let items = match self {
            Self::Scalar(s) => {
                let inner = s
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .unwrap_or(s.as_str());
                inner.split(',').map(|t| unquote(t.trim())).collect()
            }
            Self::List(items) => items,
        };
        items.into_iter().filter(|t| !t.is_empty()).collect()
    }
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(content: &str) -> Result<RuleDraft, ParseError> {
        parse(Path::new("async-parallel.md"), content)
    }

    #[test]
    fn parses_all_known_keys() {
        let draft = parse_str(
            "---\ntitle: Promise.all() for Independent Operations\nimpact: CRITICAL\nimpactDescription: 2-10x improvement\ntags: async, parallelization, promises\n---\n\nBody text\n",
        )
        .unwrap();

        assert_eq!(draft.source_id, "async-parallel");
        let fm = &draft.frontmatter;
        assert_eq!(fm.title.as_deref(), Some("Promise.all() for Independent Operations"));
        assert_eq!(fm.impact.as_deref(), Some("CRITICAL"));
        assert_eq!(fm.impact_description.as_deref(), Some("2-10x improvement"));
        let tags: Vec<&str> = fm.tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["async", "parallelization", "promises"]);
        assert_eq!(draft.body, "\nBody text\n");
    }

    #[test]
    fn title_may_contain_colons() {
        let draft = parse_str("---\ntitle: Cache: the easy way\nimpact: LOW\n---\n").unwrap();
        assert_eq!(draft.frontmatter.title.as_deref(), Some("Cache: the easy way"));
        assert_eq!(draft.body, "");
    }

    #[test]
    fn strips_quotes_and_bom() {
        let draft = parse_str("\u{feff}---\ntitle: \"Quoted: title\"\nimpact: 'HIGH'\n---\nx").unwrap();
        assert_eq!(draft.frontmatter.title.as_deref(), Some("Quoted: title"));
        assert_eq!(draft.frontmatter.impact.as_deref(), Some("HIGH"));
        assert_eq!(draft.body, "x");
    }

    #[test]
    fn tags_accept_bracket_and_block_lists() {
        let bracket = parse_str("---\ntitle: T\ntags: [b, a, \"b\"]\n---\n").unwrap();
        let tags: Vec<&str> = bracket.frontmatter.tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["a", "b"]);

        let block = parse_str("---\ntitle: T\ntags:\n  - react\n  - memo\nimpact: LOW\n---\n").unwrap();
        let tags: Vec<&str> = block.frontmatter.tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["memo", "react"]);
        assert_eq!(block.frontmatter.impact.as_deref(), Some("LOW"));
    }

    #[test]
    fn empty_tags_value_gives_empty_set() {
        let draft = parse_str("---\ntitle: T\ntags:\n---\n").unwrap();
        assert!(draft.frontmatter.tags.is_empty());
        let draft = parse_str("---\ntitle: T\ntags: []\n---\n").unwrap();
        assert!(draft.frontmatter.tags.is_empty());
    }

    #[test]
    fn keeps_unknown_keys_and_skips_comments() {
        let draft = parse_str("---\n# authoring note\ntitle: T\n\nauthor: someone\n---\n").unwrap();
        assert_eq!(draft.frontmatter.extra.get("author").map(String::as_str), Some("someone"));
    }

    #[test]
    fn body_is_kept_verbatim_including_later_markers() {
        let draft = parse_str("---\ntitle: T\n---\nline 1\n\n---\n\n```ts\ncode\n```\n").unwrap();
        assert_eq!(draft.body, "line 1\n\n---\n\n```ts\ncode\n```\n");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let draft = parse_str("---\r\ntitle: T\r\nimpact: LOW\r\n---\r\nbody\r\n").unwrap();
        assert_eq!(draft.frontmatter.title.as_deref(), Some("T"));
        assert_eq!(draft.body, "body\r\n");
    }

    #[test]
    fn missing_opening_marker() {
        let err = parse_str("title: T\n---\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingOpeningMarker);
        assert_eq!(err.file, PathBuf::from("async-parallel.md"));
    }

    #[test]
    fn missing_closing_marker_names_file() {
        let err = parse_str("---\ntitle: T\nimpact: HIGH\n\nBody without close\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingClosingMarker);
        assert!(err.to_string().contains("async-parallel.md"));
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let err = parse_str("---\ntitle: T\njust words\n---\n").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::MalformedLine {
                line: 3,
                content: "just words".to_string(),
            }
        );
        assert_eq!(err.kind.line(), Some(3));
    }

    #[test]
    fn empty_block_and_dangling_items_fail() {
        assert_eq!(parse_str("---\n---\n").unwrap_err().kind, ParseErrorKind::EmptyBlock);
        assert_eq!(
            parse_str("---\n- orphan\n---\n").unwrap_err().kind,
            ParseErrorKind::DanglingListItem { line: 2 }
        );
    }

    #[test]
    fn empty_input_is_missing_opening_marker() {
        assert_eq!(parse_str("").unwrap_err().kind, ParseErrorKind::MissingOpeningMarker);
    }

    #[test]
    fn invalid_utf8_reports_line() {
        let err = parse_bytes(Path::new("async-b.md"), b"---\ntitle: T\nimpact: \xff\xfe\n---\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidUtf8 { line: 3 });
        assert_eq!(err.file, PathBuf::from("async-b.md"));

        let draft = parse_bytes(Path::new("async-b.md"), "---\ntitle: Caf\u{e9}\n---\n".as_bytes()).unwrap();
        assert_eq!(draft.frontmatter.title.as_deref(), Some("Caf\u{e9}"));
    }
}
