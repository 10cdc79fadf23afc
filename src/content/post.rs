//! Post model and post index parsing

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::LoadError;

/// Field names accepted for the post identifier, in priority order
const IDENTIFIER_KEYS: [&str; 3] = ["file", "identifier", "id"];

/// A blog post as listed in the post index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// File name of the post, unique across the index
    pub identifier: String,

    /// Post title
    pub title: String,

    /// Publication date as written in the index
    pub date: String,

    /// Post tags, in display order
    pub tags: Vec<String>,

    /// Post category
    pub category: Option<String>,

    /// Short summary shown in the list view
    pub excerpt: String,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(identifier: &str, title: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            title: title.to_string(),
            date: String::new(),
            tags: Vec::new(),
            category: None,
            excerpt: String::new(),
        }
    }

    /// Whether the post carries exactly this tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Case-insensitive substring match against title, excerpt, tags and category.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.excerpt.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
            || self
                .category
                .as_ref()
                .is_some_and(|c| c.to_lowercase().contains(needle))
    }
}

/// Result of parsing the post index
#[derive(Debug, Default)]
pub struct PostIndex {
    pub posts: Vec<Post>,
    /// Entries that were skipped or repaired
    pub warnings: Vec<String>,
}

impl PostIndex {
    /// Parse the post index body.
    ///
    /// An empty body or `null` is an empty index. Anything that is not a JSON
    /// array is a parse error; individual bad entries only produce warnings.
    pub fn parse(resource: &str, body: &str, untitled: &str) -> Result<Self, LoadError> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(body)
            .map_err(|e| LoadError::parse(resource, format!("invalid JSON: {}", e)))?;

        let entries = match value {
            Value::Null => return Ok(Self::default()),
            Value::Array(entries) => entries,
            other => {
                return Err(LoadError::parse(
                    resource,
                    format!("expected an array of posts, found {}", json_type(&other)),
                ))
            }
        };

        let mut index = Self::default();
        let mut seen = HashSet::new();

        for (i, entry) in entries.iter().enumerate() {
            let Some(record) = entry.as_object() else {
                index
                    .warnings
                    .push(format!("entry {}: expected an object, found {}", i, json_type(entry)));
                continue;
            };

            let Some(post) = post_from_record(record, untitled) else {
                index
                    .warnings
                    .push(format!("entry {}: missing file identifier", i));
                continue;
            };

            if !seen.insert(post.identifier.clone()) {
                index.warnings.push(format!(
                    "entry {}: duplicate identifier {:?}, keeping the first",
                    i, post.identifier
                ));
                continue;
            }

            index.posts.push(post);
        }

        Ok(index)
    }
}

/// Build a post from an index record, filling defaults for missing fields
fn post_from_record(record: &Map<String, Value>, untitled: &str) -> Option<Post> {
    let identifier = IDENTIFIER_KEYS
        .iter()
        .find_map(|key| record.get(*key).and_then(scalar_string))
        .filter(|id| !id.trim().is_empty())?;

    let title = record
        .get("title")
        .and_then(scalar_string)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| untitled.to_string());

    let tags = match record.get("tags") {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_string).collect(),
        Some(Value::String(tag)) if !tag.trim().is_empty() => vec![tag.trim().to_string()],
        _ => Vec::new(),
    };

    let category = record
        .get("category")
        .and_then(scalar_string)
        .filter(|c| !c.trim().is_empty());

    Some(Post {
        identifier,
        title,
        date: record.get("date").and_then(scalar_string).unwrap_or_default(),
        tags,
        category,
        excerpt: record
            .get("excerpt")
            .and_then(scalar_string)
            .unwrap_or_default(),
    })
}

/// Strings pass through, numbers and booleans are stringified, anything else is absent
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
