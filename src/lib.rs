//! mdblog: a Markdown blog reader
//!
//! Loads a post index and individual Markdown posts, filters the post list
//! by tag and search query, and builds list and detail views for a
//! front-end to display.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod search;
pub mod view;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{Fetch, LoadError, MarkdownRenderer, PostDocument, PostRepository};
use search::{
    DisabledStore, FileStore, FilterCommand, FilterEngine, KeyValueStore, SearchHistory,
};
use view::{DetailView, ListView};

/// One reading session: configuration, loaded posts, filter state and history
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    repository: PostRepository,
    engine: FilterEngine,
    history: SearchHistory,
    renderer: MarkdownRenderer,
}

impl Blog {
    /// Create a session from a directory containing an optional `_config.yml`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let source = content::source::source_for(&config, &base_dir)?;
        let store: Box<dyn KeyValueStore> = if config.history.enable {
            Box::new(FileStore::new(base_dir.join(&config.history.file)))
        } else {
            Box::new(DisabledStore)
        };

        Ok(Self::with_parts(config, base_dir, source, store))
    }

    /// Create a session from explicit parts
    pub fn with_parts(
        config: config::SiteConfig,
        base_dir: PathBuf,
        source: Box<dyn Fetch>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let repository = PostRepository::new(source, &config);
        let history = SearchHistory::new(store, config.history.max_items);

        Self {
            config,
            base_dir,
            repository,
            engine: FilterEngine::default(),
            history,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load (or reload) the post index and reapply the current filters
    pub async fn refresh(&mut self) -> Result<(), LoadError> {
        let result = self.repository.load().await;
        // On failure the repository is already empty
        self.engine.replace_posts(self.repository.posts());
        result.map(|_| ())
    }

    /// Apply a filter command and return the updated list view
    pub fn apply(&mut self, command: FilterCommand) -> ListView {
        self.engine.apply(command);
        self.list_view()
    }

    pub fn list_view(&self) -> ListView {
        ListView::build(
            &self.repository.state(),
            &self.engine.visible(),
            &self.config,
        )
    }

    /// Load the post named by the `file` parameter of a detail page query string
    pub async fn open_post(&self, query: &str) -> DetailView {
        match helpers::file_param(query) {
            Some(identifier) => self.open_identifier(&identifier).await,
            None => DetailView::missing_file(),
        }
    }

    /// Load a post by identifier
    pub async fn open_identifier(&self, identifier: &str) -> DetailView {
        tracing::info!("Loading post {}", identifier);
        DetailView::from_result(self.load_document(identifier).await)
    }

    async fn load_document(&self, identifier: &str) -> Result<PostDocument, LoadError> {
        let doc = self.repository.load_document(identifier).await?;
        Ok(PostDocument::from_parsed(
            identifier,
            doc,
            &self.renderer,
            &self.config.untitled,
        ))
    }

    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    pub fn repository(&self) -> &PostRepository {
        &self.repository
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }
}
