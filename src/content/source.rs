//! Resource sources - fetch the post index and post files over HTTP or from disk

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::config::SiteConfig;
use crate::helpers::encode_component;

/// Errors raised while loading a resource
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The resource could not be fetched or returned a non-success status
    #[error("Failed to fetch {resource}: {reason}")]
    Transport {
        resource: String,
        status: Option<u16>,
        reason: String,
    },

    /// The resource body could not be interpreted
    #[error("Malformed {resource}: {reason}")]
    Parse { resource: String, reason: String },
}

impl LoadError {
    pub fn transport(resource: &str, status: Option<u16>, reason: impl Into<String>) -> Self {
        LoadError::Transport {
            resource: resource.to_string(),
            status,
            reason: reason.into(),
        }
    }

    pub fn parse(resource: &str, reason: impl Into<String>) -> Self {
        LoadError::Parse {
            resource: resource.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, LoadError::Transport { .. })
    }

    /// HTTP status of a transport failure, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            LoadError::Transport { status, .. } => *status,
            LoadError::Parse { .. } => None,
        }
    }
}

/// A place text resources can be fetched from
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the resource at `path` and return its body as text
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError>;

    /// Human-readable location, used in logs
    fn describe(&self) -> String;
}

/// Fetches resources relative to a base URL
pub struct HttpSource {
    client: reqwest::Client,
    base: reqwest::Url,
}

impl HttpSource {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, LoadError> {
        // Url::join drops the last segment unless the base ends with a slash
        let base = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base = reqwest::Url::parse(&base)
            .map_err(|e| LoadError::transport(&base, None, format!("invalid base URL: {}", e)))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::transport(base.as_str(), None, e.to_string()))?;

        Ok(Self { client, base })
    }

    /// Resolve `path` against the base URL.
    ///
    /// Each segment is percent-encoded, so `%`, `#` and `?` in file names stay literal
    /// and an encoded `%2e%2e` cannot climb out of the base.
    fn url_for(&self, path: &str) -> Result<reqwest::Url, LoadError> {
        let encoded = path
            .trim_start_matches('/')
            .split('/')
            .map(encode_component)
            .collect::<Vec<_>>()
            .join("/");
        self.base
            .join(&encoded)
            .map_err(|e| LoadError::transport(path, None, format!("invalid path: {}", e)))
    }
}

#[async_trait]
impl Fetch for HttpSource {
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError> {
        let url = self.url_for(path)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::transport(path, None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::transport(
                path,
                Some(status.as_u16()),
                format!("HTTP {}", status),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| LoadError::transport(path, Some(status.as_u16()), e.to_string()))
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

/// Reads resources relative to a root directory
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl Fetch for FileSource {
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError> {
        let full = self.root.join(path.trim_start_matches('/'));
        tracing::debug!("Reading {:?}", full);

        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| LoadError::transport(path, None, e.to_string()))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Pick the source matching the configuration
pub fn source_for(config: &SiteConfig, base_dir: &Path) -> Result<Box<dyn Fetch>, LoadError> {
    if config.is_remote() {
        let source = HttpSource::new(&config.source, Duration::from_secs(config.timeout_secs))?;
        Ok(Box::new(source))
    } else {
        let root = Path::new(&config.source);
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            base_dir.join(root)
        };
        Ok(Box::new(FileSource::new(root)))
    }
}
