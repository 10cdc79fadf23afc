//! Presentation adapter - turns repository and filter state into view models
//!
//! Nothing here touches a display surface. The models keep "still loading",
//! "could not load" and "loaded, nothing matches" apart so a front-end can
//! show each one differently.

mod render;

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::{LoadError, LoadState, Post, PostDocument};
use crate::helpers::{format_post_date, post_link};

pub use render::{render_detail, render_list, render_tag_filters};

/// A post in the list view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCard {
    pub title: String,
    /// Display date, or the raw value when it cannot be parsed
    pub date: String,
    pub tags: Vec<String>,
    pub excerpt: String,
    pub href: String,
}

impl PostCard {
    pub fn from_post(post: &Post, config: &SiteConfig) -> Self {
        Self {
            title: post.title.clone(),
            date: format_post_date(&post.date, &config.date_format),
            tags: post.tags.clone(),
            excerpt: post.excerpt.clone(),
            href: post_link(&config.post_view, &post.identifier),
        }
    }
}

/// What the post list should show
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ListView {
    Loading,
    Unavailable(String),
    NoResults,
    Posts(Vec<PostCard>),
}

impl ListView {
    /// Build the list view from the repository state and the visible set
    pub fn build(state: &LoadState, visible: &[&Post], config: &SiteConfig) -> Self {
        match state {
            LoadState::NotLoaded | LoadState::Loading => ListView::Loading,
            LoadState::Failed(e) => ListView::Unavailable(unavailable_message(e)),
            LoadState::Loaded if visible.is_empty() => ListView::NoResults,
            LoadState::Loaded => ListView::Posts(
                visible
                    .iter()
                    .map(|post| PostCard::from_post(post, config))
                    .collect(),
            ),
        }
    }
}

fn unavailable_message(error: &LoadError) -> String {
    match error {
        LoadError::Transport {
            status: Some(status),
            ..
        } => format!("Posts could not be loaded (HTTP {}).", status),
        LoadError::Transport { .. } => "Posts could not be loaded.".to_string(),
        LoadError::Parse { .. } => "The post index is damaged and could not be read.".to_string(),
    }
}

/// What the detail page should show
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum DetailView {
    Loading,
    NotFound(String),
    Post(Box<PostDocument>),
}

impl DetailView {
    /// No `file` parameter was given
    pub fn missing_file() -> Self {
        DetailView::NotFound("No post file was specified.".to_string())
    }

    pub fn from_result(result: Result<PostDocument, LoadError>) -> Self {
        match result {
            Ok(doc) => DetailView::Post(Box::new(doc)),
            Err(e) => {
                tracing::warn!("Failed to load post: {}", e);
                DetailView::NotFound("The post could not be loaded.".to_string())
            }
        }
    }

    /// Title and description for the page head
    pub fn page_meta(&self, config: &SiteConfig) -> PageMeta {
        match self {
            DetailView::Post(doc) => {
                let title = format!("{} - {}", doc.title, config.title);
                let description = doc.description.clone().unwrap_or_else(|| title.clone());
                PageMeta { title, description }
            }
            DetailView::Loading | DetailView::NotFound(_) => PageMeta {
                title: config.title.clone(),
                description: config.description.clone(),
            },
        }
    }
}

/// Page head metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
}
