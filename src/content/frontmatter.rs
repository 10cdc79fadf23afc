//! Front-matter parsing
//!
//! A document may start with a metadata block:
//!
//! ```text
//! ---
//! title: "Hello"
//! tags: ["a", "b"]
//! ---
//! Body text
//! ```
//!
//! Parsing never fails. Anything the parser cannot make sense of is kept in
//! the body or dropped with a [`ParseWarning`].

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::MarkdownRenderer;

const DELIMITER: &str = "---";

/// Key whose bracketed value is parsed as a list
const TAGS_KEY: &str = "tags";

/// A front-matter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Text(String),
    List(Vec<String>),
}

impl MetaValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            MetaValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetaValue::List(items) => Some(items),
            MetaValue::Text(_) => None,
        }
    }
}

/// Recoverable problems found while parsing front-matter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseWarning {
    #[error("line {line}: no ':' separator, skipped")]
    MissingColon { line: usize, text: String },

    #[error("line {line}: empty key, skipped")]
    EmptyKey { line: usize },

    #[error("opening '---' has no closing delimiter, treated as body")]
    UnterminatedBlock,

    #[error("line {line}: tag list is not valid JSON, split on commas")]
    MalformedTagList { line: usize, value: String },

    #[error("line {line}: duplicate key '{key}', last value wins")]
    DuplicateKey { line: usize, key: String },
}

/// A Markdown document split into metadata and body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// Metadata in the order it was written
    pub metadata: IndexMap<String, MetaValue>,

    /// Raw Markdown after the metadata block
    pub body: String,

    pub warnings: Vec<ParseWarning>,
}

impl ParsedDocument {
    /// Parse a raw document
    pub fn parse(input: &str) -> Self {
        let raw = input.strip_prefix('\u{feff}').unwrap_or(input);

        let mut segments = raw.split_inclusive('\n');
        let opens_block = segments
            .next()
            .is_some_and(|first| first.ends_with('\n') && is_delimiter(first));

        if !opens_block {
            return Self::without_front_matter(input, Vec::new());
        }

        let mut offset = raw.find('\n').map(|i| i + 1).unwrap_or(raw.len());
        let mut block_lines = Vec::new();
        let mut body_start = None;

        for segment in segments {
            let line_start = offset;
            offset += segment.len();
            if is_delimiter(segment) {
                body_start = Some(offset);
                break;
            }
            block_lines.push(&raw[line_start..offset]);
        }

        let Some(body_start) = body_start else {
            return Self::without_front_matter(input, vec![ParseWarning::UnterminatedBlock]);
        };

        let mut doc = Self {
            metadata: IndexMap::new(),
            body: raw[body_start..].to_string(),
            warnings: Vec::new(),
        };

        // Line 1 is the opening delimiter
        for (i, line) in block_lines.iter().enumerate() {
            doc.parse_line(line.trim_end_matches(['\n', '\r']), i + 2);
        }

        doc
    }

    fn without_front_matter(raw: &str, warnings: Vec<ParseWarning>) -> Self {
        Self {
            metadata: IndexMap::new(),
            body: raw.to_string(),
            warnings,
        }
    }

    fn parse_line(&mut self, line: &str, line_no: usize) {
        if line.trim().is_empty() {
            return;
        }

        let Some((key, value)) = line.split_once(':') else {
            self.warnings.push(ParseWarning::MissingColon {
                line: line_no,
                text: line.to_string(),
            });
            return;
        };

        let key = key.trim();
        if key.is_empty() {
            self.warnings.push(ParseWarning::EmptyKey { line: line_no });
            return;
        }

        let value = strip_quotes(value.trim());

        let value = if key == TAGS_KEY && value.starts_with('[') && value.ends_with(']') {
            match parse_json_list(value) {
                Some(items) => MetaValue::List(items),
                None => {
                    self.warnings.push(ParseWarning::MalformedTagList {
                        line: line_no,
                        value: value.to_string(),
                    });
                    MetaValue::List(split_list(value))
                }
            }
        } else {
            MetaValue::Text(value.to_string())
        };

        if self.metadata.insert(key.to_string(), value).is_some() {
            self.warnings.push(ParseWarning::DuplicateKey {
                line: line_no,
                key: key.to_string(),
            });
        }
    }

    /// Text value for `key`
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(MetaValue::as_text)
    }

    /// List value for `key`
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.metadata.get(key).and_then(MetaValue::as_list)
    }

    /// Title from the metadata, if present and non-empty
    pub fn title(&self) -> Option<&str> {
        self.get_text("title").filter(|t| !t.is_empty())
    }

    /// Tags, only when written as a list
    pub fn tags(&self) -> Vec<String> {
        self.get_list(TAGS_KEY).map(<[String]>::to_vec).unwrap_or_default()
    }

    /// Render the body to HTML
    pub fn render_html(&self, renderer: &MarkdownRenderer) -> String {
        renderer.render(&self.body)
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == DELIMITER
}

/// Strip one layer of matching single or double quotes
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parse `["a", "b"]` as JSON, stringifying scalar elements
fn parse_json_list(value: &str) -> Option<Vec<String>> {
    let items: Vec<Value> = serde_json::from_str(value).ok()?;
    Some(
        items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
    )
}

/// Fallback for `[a, 'b', "c"]`: split on commas and trim quotes from each element
fn split_list(value: &str) -> Vec<String> {
    value[1..value.len() - 1]
        .split(',')
        .map(|item| {
            let item = item.trim();
            let item = item.strip_prefix(['"', '\'']).unwrap_or(item);
            let item = item.strip_suffix(['"', '\'']).unwrap_or(item);
            item.to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_front_matter() {
        let doc = ParsedDocument::parse("---\ntitle: Test\ntags: [\"a\",\"b\"]\n---\nBody text");
        assert_eq!(doc.get_text("title"), Some("Test"));
        assert_eq!(doc.tags(), vec!["a", "b"]);
        assert_eq!(doc.body, "Body text");
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_no_closing_delimiter() {
        let raw = "---\ntitle: Test\nBody without end";
        let doc = ParsedDocument::parse(raw);
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, raw);
        assert_eq!(doc.warnings, vec![ParseWarning::UnterminatedBlock]);
    }

    #[test]
    fn test_no_front_matter() {
        let raw = "# Just Markdown\n\n---\n\nwith a rule";
        let doc = ParsedDocument::parse(raw);
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, raw);
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_empty_block() {
        let doc = ParsedDocument::parse("---\n---\nBody");
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_split_on_first_colon_and_strip_quotes() {
        let raw = "---\ntitle: \"Rust: the good parts\"\nlink: https://example.com\nquote: 'it''s'\n---\n";
        let doc = ParsedDocument::parse(raw);
        assert_eq!(doc.get_text("title"), Some("Rust: the good parts"));
        assert_eq!(doc.get_text("link"), Some("https://example.com"));
        assert_eq!(doc.get_text("quote"), Some("it''s"));
        assert_eq!(doc.body, "");
    }

    #[test]
    fn test_only_one_layer_of_quotes() {
        let doc = ParsedDocument::parse("---\ntitle: \"'quoted'\"\nodd: \"mismatch'\n---\n");
        assert_eq!(doc.get_text("title"), Some("'quoted'"));
        assert_eq!(doc.get_text("odd"), Some("\"mismatch'"));
    }

    #[test]
    fn test_malformed_tag_list_falls_back_to_split() {
        let doc = ParsedDocument::parse("---\ntags: [rust, 'web', \"cli\"]\n---\nbody");
        assert_eq!(doc.tags(), vec!["rust", "web", "cli"]);
        assert!(matches!(
            doc.warnings.as_slice(),
            [ParseWarning::MalformedTagList { line: 2, .. }]
        ));
    }

    #[test]
    fn test_brackets_only_special_for_tags() {
        let doc = ParsedDocument::parse("---\naliases: [a, b]\ntags: plain\n---\n");
        assert_eq!(doc.get_text("aliases"), Some("[a, b]"));
        assert_eq!(doc.get_text("tags"), Some("plain"));
        assert!(doc.tags().is_empty());
    }

    #[test]
    fn test_unknown_keys_kept_in_order() {
        let doc = ParsedDocument::parse("---\nzeta: 1\ntitle: T\nalpha: 2\n---\n");
        let keys: Vec<&str> = doc.metadata.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "title", "alpha"]);
    }

    #[test]
    fn test_bad_lines_are_skipped_with_warnings() {
        let raw = "---\ntitle: First\nno colon here\n: empty key\n\ntitle: Second\n---\nBody";
        let doc = ParsedDocument::parse(raw);
        assert_eq!(doc.get_text("title"), Some("Second"));
        assert_eq!(doc.metadata.len(), 1);
        assert_eq!(
            doc.warnings,
            vec![
                ParseWarning::MissingColon {
                    line: 3,
                    text: "no colon here".to_string()
                },
                ParseWarning::EmptyKey { line: 4 },
                ParseWarning::DuplicateKey {
                    line: 6,
                    key: "title".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = ParsedDocument::parse("---\r\ntitle: Windows\r\n---\r\nBody\r\n");
        assert_eq!(doc.get_text("title"), Some("Windows"));
        assert_eq!(doc.body, "Body\r\n");
    }

    #[test]
    fn test_leading_bom() {
        let doc = ParsedDocument::parse("\u{feff}---\ntitle: Marked\n---\nBody");
        assert_eq!(doc.get_text("title"), Some("Marked"));
        assert_eq!(doc.body, "Body");

        // Without a complete block the body is the input untouched
        let raw = "\u{feff}---\ntitle: Marked\nno end";
        assert_eq!(ParsedDocument::parse(raw).body, raw);
        let raw = "\u{feff}# Plain";
        assert_eq!(ParsedDocument::parse(raw).body, raw);
    }

    #[test]
    fn test_render_body() {
        let doc = ParsedDocument::parse("---\ntitle: T\n---\n# Heading\n");
        let html = doc.render_html(&MarkdownRenderer::new());
        assert!(html.contains("<h1>Heading</h1>"));
    }
}
