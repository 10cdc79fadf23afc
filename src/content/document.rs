//! Single post detail model

use indexmap::IndexMap;
use serde::Serialize;

use super::{MarkdownRenderer, MetaValue, ParseWarning, ParsedDocument};

/// A post file ready for the detail view
#[derive(Debug, Clone, Serialize)]
pub struct PostDocument {
    pub identifier: String,
    pub title: String,
    pub date: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub description: Option<String>,

    /// Rendered body
    pub html: String,

    /// Every front-matter field, including ones not lifted above
    pub metadata: IndexMap<String, MetaValue>,

    #[serde(skip)]
    pub warnings: Vec<ParseWarning>,
}

impl PostDocument {
    /// Build the detail model from a parsed post file
    pub fn from_parsed(
        identifier: &str,
        doc: ParsedDocument,
        renderer: &MarkdownRenderer,
        untitled: &str,
    ) -> Self {
        let html = doc.render_html(renderer);
        let text = |key: &str| {
            doc.get_text(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            identifier: identifier.to_string(),
            title: doc
                .title()
                .map(str::to_string)
                .unwrap_or_else(|| untitled.to_string()),
            date: text("date").unwrap_or_default(),
            tags: doc.tags(),
            category: text("category"),
            description: text("description"),
            html,
            metadata: doc.metadata,
            warnings: doc.warnings,
        }
    }
}
