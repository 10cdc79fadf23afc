//! Post repository - loads and holds the post set from the post index

use percent_encoding::percent_decode_str;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::source::{Fetch, LoadError};
use super::{ParsedDocument, Post, PostIndex};
use crate::config::SiteConfig;

/// Where the repository is in its load lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// No load has been started yet
    NotLoaded,
    /// A load is in flight
    Loading,
    /// The last applied load succeeded (the set may still be empty)
    Loaded,
    /// The last applied load failed; the post set is empty
    Failed(LoadError),
}

#[derive(Debug)]
struct Inner {
    state: LoadState,
    posts: Vec<Post>,
}

/// Holds the post set loaded from the post index
pub struct PostRepository {
    source: Box<dyn Fetch>,
    config: SiteConfig,
    /// Ticket of the most recently started load
    latest_ticket: AtomicU64,
    inner: RwLock<Inner>,
}

impl PostRepository {
    pub fn new(source: Box<dyn Fetch>, config: &SiteConfig) -> Self {
        Self {
            source,
            config: config.clone(),
            latest_ticket: AtomicU64::new(0),
            inner: RwLock::new(Inner {
                state: LoadState::NotLoaded,
                posts: Vec::new(),
            }),
        }
    }

    /// Fetch the post index and replace the held post set.
    ///
    /// On failure the held set is emptied. When several loads overlap, only
    /// the most recently started one is applied; the others still return
    /// their own outcome but leave the repository untouched.
    pub async fn load(&self) -> Result<Vec<Post>, LoadError> {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.write().state = LoadState::Loading;

        tracing::info!(
            "Loading post index {} from {}",
            self.config.index,
            self.source.describe()
        );

        let result = match self.source.fetch_text(&self.config.index).await {
            Ok(body) => PostIndex::parse(&self.config.index, &body, &self.config.untitled),
            Err(e) => Err(e),
        };

        let mut inner = self.write();
        if ticket != self.latest_ticket.load(Ordering::SeqCst) {
            tracing::debug!("Discarding result of superseded load #{}", ticket);
            return result.map(|index| index.posts);
        }

        match result {
            Ok(index) => {
                for warning in &index.warnings {
                    tracing::warn!("{}: {}", self.config.index, warning);
                }
                tracing::info!("Loaded {} posts", index.posts.len());
                inner.posts = index.posts;
                inner.state = LoadState::Loaded;
                Ok(inner.posts.clone())
            }
            Err(e) => {
                tracing::warn!("Failed to load posts: {}", e);
                inner.posts.clear();
                inner.state = LoadState::Failed(e.clone());
                Err(e)
            }
        }
    }

    /// Reload the post index, replacing the held set wholesale
    pub async fn refresh(&self) -> Result<Vec<Post>, LoadError> {
        self.load().await
    }

    /// Fetch and parse a single post file
    pub async fn load_document(&self, identifier: &str) -> Result<ParsedDocument, LoadError> {
        let path = self.config.page_path(identifier);
        if identifier.trim().is_empty() || escapes_pages_dir(identifier) {
            return Err(LoadError::transport(
                &path,
                None,
                "identifier does not name a post file",
            ));
        }

        let raw = self.source.fetch_text(&path).await?;
        let doc = ParsedDocument::parse(&raw);
        for warning in &doc.warnings {
            tracing::warn!("{}: {}", path, warning);
        }

        Ok(doc)
    }

    pub fn state(&self) -> LoadState {
        self.read().state.clone()
    }

    /// Snapshot of the held post set
    pub fn posts(&self) -> Vec<Post> {
        self.read().posts.clone()
    }

    /// Look up a loaded post by identifier
    pub fn get(&self, identifier: &str) -> Option<Post> {
        self.read()
            .posts
            .iter()
            .find(|p| p.identifier == identifier)
            .cloned()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Whether any segment of `identifier` is `..`, literally or percent-encoded
fn escapes_pages_dir(identifier: &str) -> bool {
    identifier
        .split(['/', '\\'])
        .any(|part| part == ".." || percent_decode_str(part).decode_utf8_lossy() == "..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers fetches from a queue, each after its own delay
    struct ScriptedSource {
        replies: Mutex<VecDeque<(u64, Result<String, LoadError>)>>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<(u64, Result<String, LoadError>)>) -> Box<Self> {
            Box::new(Self {
                replies: Mutex::new(replies.into()),
            })
        }
    }

    #[async_trait]
    impl Fetch for ScriptedSource {
        async fn fetch_text(&self, path: &str) -> Result<String, LoadError> {
            let reply = self.replies.lock().unwrap().pop_front();
            let (delay, result) = reply.unwrap_or_else(|| {
                (0, Err(LoadError::transport(path, Some(404), "HTTP 404")))
            });
            tokio::time::sleep(Duration::from_millis(delay)).await;
            result
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    const TWO_POSTS: &str = r#"[
        {"file": "hello.md", "title": "Hello World", "tags": ["go"]},
        {"file": "bye.md", "title": "Goodbye", "tags": ["rust"]}
    ]"#;

    fn repo(replies: Vec<(u64, Result<String, LoadError>)>) -> PostRepository {
        PostRepository::new(ScriptedSource::new(replies), &SiteConfig::default())
    }

    #[tokio::test]
    async fn test_starts_not_loaded() {
        let repo = repo(vec![]);
        assert_eq!(repo.state(), LoadState::NotLoaded);
        assert!(repo.posts().is_empty());
    }

    #[tokio::test]
    async fn test_load_success() {
        let repo = repo(vec![(0, Ok(TWO_POSTS.to_string()))]);
        let posts = repo.load().await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(repo.state(), LoadState::Loaded);
        assert_eq!(repo.get("bye.md").unwrap().title, "Goodbye");
        assert!(repo.get("missing.md").is_none());
    }

    #[tokio::test]
    async fn test_empty_index_is_loaded_not_failed() {
        let repo = repo(vec![(0, Ok("null".to_string()))]);
        assert!(repo.load().await.unwrap().is_empty());
        assert_eq!(repo.state(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_failure_clears_stale_posts() {
        let repo = repo(vec![
            (0, Ok(TWO_POSTS.to_string())),
            (0, Err(LoadError::transport("posts.json", Some(500), "HTTP 500"))),
        ]);

        repo.load().await.unwrap();
        assert_eq!(repo.posts().len(), 2);

        let err = repo.refresh().await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), Some(500));
        assert!(repo.posts().is_empty());
        assert!(matches!(repo.state(), LoadState::Failed(LoadError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_malformed_body_fails_with_parse_error() {
        let repo = repo(vec![(0, Ok("<html>oops</html>".to_string()))]);
        let err = repo.load().await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(matches!(repo.state(), LoadState::Failed(LoadError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_stale_load_does_not_overwrite_newer() {
        let newer = r#"[{"file": "new.md", "title": "New"}]"#;
        let repo = repo(vec![
            (60, Ok(TWO_POSTS.to_string())),
            (5, Ok(newer.to_string())),
        ]);

        let (first, second) = tokio::join!(repo.load(), repo.load());

        // The slow first load still reports its own result
        assert_eq!(first.unwrap().len(), 2);
        assert_eq!(second.unwrap().len(), 1);

        let posts = repo.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].identifier, "new.md");
        assert_eq!(repo.state(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_load_document() {
        let repo = repo(vec![(0, Ok("---\ntitle: Doc\n---\nBody".to_string()))]);
        let doc = repo.load_document("doc.md").await.unwrap();
        assert_eq!(doc.title(), Some("Doc"));
        assert_eq!(doc.body, "Body");
    }

    #[tokio::test]
    async fn test_load_document_rejects_traversal() {
        let repo = repo(vec![]);
        let err = repo.load_document("../secret.md").await.unwrap_err();
        assert!(err.is_transport());
        assert!(repo.load_document("").await.is_err());
    }

    #[tokio::test]
    async fn test_load_document_rejects_encoded_traversal() {
        let repo = repo(vec![(0, Ok("secret".to_string()))]);
        for identifier in ["%2e%2e/secret.md", "%2E%2E/secret.md", "a/.%2e/secret.md"] {
            let err = repo.load_document(identifier).await.unwrap_err();
            assert!(err.to_string().contains("does not name a post file"));
        }

        let doc = repo.load_document("c#-notes.md").await.unwrap();
        assert_eq!(doc.body, "secret");
    }
}
