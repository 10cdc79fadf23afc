//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,

    // Resources
    /// Base URL (`http(s)://...`) or local directory holding the blog files
    pub source: String,
    /// Post index resource, relative to `source`
    pub index: String,
    /// Directory of individual Markdown posts, relative to `source`
    pub pages_dir: String,
    /// Detail page used when building post links
    pub post_view: String,
    pub timeout_secs: u64,

    // Writing
    /// Title used when a post has none
    pub untitled: String,
    pub date_format: String,

    #[serde(default)]
    pub history: HistoryConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),

            source: ".".to_string(),
            index: "posts.json".to_string(),
            pages_dir: "pages".to_string(),
            post_view: "post-view".to_string(),
            timeout_secs: 10,

            untitled: "Untitled".to_string(),
            date_format: "YYYY-MM-DD".to_string(),

            history: HistoryConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Whether resources are fetched over HTTP rather than read from disk
    pub fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    /// Path of an individual post resource, relative to `source`
    pub fn page_path(&self, identifier: &str) -> String {
        let dir = self.pages_dir.trim_matches('/');
        if dir.is_empty() {
            identifier.to_string()
        } else {
            format!("{}/{}", dir, identifier.trim_start_matches('/'))
        }
    }
}

/// Search history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enable: bool,
    /// Store file, relative to the base directory
    pub file: String,
    pub max_items: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enable: true,
            file: ".mdblog/storage.json".to_string(),
            max_items: 10,
        }
    }
}
