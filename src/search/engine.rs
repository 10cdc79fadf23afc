//! Tag filter and search query over the loaded post set

use serde::Serialize;
use std::collections::BTreeMap;

use crate::content::Post;

/// Tag value meaning "no tag filter"
pub const ALL_TAGS: &str = "all";

/// The active tag filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    /// Exact, case-sensitive tag
    Tag(String),
}

impl TagFilter {
    pub fn passes(&self, post: &Post) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Tag(tag) => post.has_tag(tag),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TagFilter::All => ALL_TAGS,
            TagFilter::Tag(tag) => tag,
        }
    }
}

impl From<&str> for TagFilter {
    fn from(tag: &str) -> Self {
        if tag == ALL_TAGS {
            TagFilter::All
        } else {
            TagFilter::Tag(tag.to_string())
        }
    }
}

/// A state change requested by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCommand {
    SetTagFilter(TagFilter),
    SetQuery(String),
    ClearQuery,
}

/// A tag and the number of loaded posts carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Summary of the current search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub query: String,
    pub total_results: usize,
    pub has_results: bool,
}

/// Combines the active tag filter and search query into the visible post set.
///
/// Both dimensions are reapplied together on every change, so the visible
/// set is always `posts ∩ tag ∩ query`, in the order the posts were loaded.
#[derive(Debug, Default)]
pub struct FilterEngine {
    posts: Vec<Post>,
    tag: TagFilter,
    /// Trimmed and lowercased
    query: String,
    /// Indexes into `posts`
    visible: Vec<usize>,
}

impl FilterEngine {
    pub fn new(posts: Vec<Post>) -> Self {
        let mut engine = Self {
            posts,
            ..Self::default()
        };
        engine.recompute();
        engine
    }

    /// Replace the post set (after a reload), keeping tag and query
    pub fn replace_posts(&mut self, posts: Vec<Post>) -> Vec<&Post> {
        self.posts = posts;
        self.recompute();
        self.visible()
    }

    pub fn set_tag(&mut self, tag: &str) -> Vec<&Post> {
        self.apply(FilterCommand::SetTagFilter(TagFilter::from(tag)))
    }

    pub fn set_query(&mut self, query: &str) -> Vec<&Post> {
        self.apply(FilterCommand::SetQuery(query.to_string()))
    }

    /// Reset the query, keeping the tag filter
    pub fn clear(&mut self) -> Vec<&Post> {
        self.apply(FilterCommand::ClearQuery)
    }

    /// Apply a command and return the resulting visible set
    pub fn apply(&mut self, command: FilterCommand) -> Vec<&Post> {
        match command {
            FilterCommand::SetTagFilter(tag) => self.tag = tag,
            FilterCommand::SetQuery(query) => self.query = query.trim().to_lowercase(),
            FilterCommand::ClearQuery => self.query.clear(),
        }
        self.recompute();
        self.visible()
    }

    fn recompute(&mut self) {
        let tag = &self.tag;
        let query = self.query.as_str();

        self.visible = self
            .posts
            .iter()
            .enumerate()
            .filter(|(_, post)| tag.passes(post))
            .filter(|(_, post)| query.is_empty() || post.matches_query(query))
            .map(|(i, _)| i)
            .collect();

        tracing::debug!(
            "Filter tag={:?} query={:?}: {} of {} posts visible",
            tag.as_str(),
            query,
            self.visible.len(),
            self.posts.len()
        );
    }

    /// The current visible set
    pub fn visible(&self) -> Vec<&Post> {
        self.visible.iter().map(|&i| &self.posts[i]).collect()
    }

    pub fn all_posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn active_tag(&self) -> &TagFilter {
        &self.tag
    }

    pub fn active_query(&self) -> &str {
        &self.query
    }

    /// Every tag across all posts with its post count, sorted by tag
    pub fn tag_counts(&self) -> Vec<TagCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for post in &self.posts {
            // A tag listed twice on one post still counts that post once
            let mut seen = Vec::with_capacity(post.tags.len());
            for tag in &post.tags {
                if !seen.contains(&tag) {
                    seen.push(tag);
                    *counts.entry(tag.as_str()).or_insert(0) += 1;
                }
            }
        }

        counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect()
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            query: self.query.clone(),
            total_results: self.visible.len(),
            has_results: !self.visible.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(identifier: &str, title: &str, tags: &[&str]) -> Post {
        let mut post = Post::new(identifier, title);
        post.tags = tags.iter().map(|t| t.to_string()).collect();
        post
    }

    fn sample() -> Vec<Post> {
        vec![
            post("hello.md", "Hello World", &["go"]),
            post("bye.md", "Goodbye", &["rust"]),
        ]
    }

    fn ids(posts: Vec<&Post>) -> Vec<String> {
        posts.into_iter().map(|p| p.identifier.clone()).collect()
    }

    fn blog() -> Vec<Post> {
        let mut posts = vec![
            post("a.md", "Async Rust", &["rust", "async"]),
            post("b.md", "Go channels", &["go"]),
            post("c.md", "Rusty tools", &["tools"]),
            post("d.md", "Notes", &["Rust"]),
        ];
        posts[1].excerpt = "Comparing with rust futures".to_string();
        posts[3].category = Some("Rustacean".to_string());
        posts
    }

    #[test]
    fn test_example_scenarios() {
        let mut engine = FilterEngine::new(sample());
        assert_eq!(ids(engine.set_query("hello")), vec!["hello.md"]);

        let mut engine = FilterEngine::new(sample());
        assert_eq!(ids(engine.set_tag("rust")), vec!["bye.md"]);

        let mut engine = FilterEngine::new(sample());
        engine.set_tag("rust");
        assert!(engine.set_query("hello").is_empty());
    }

    #[test]
    fn test_new_engine_shows_everything() {
        let engine = FilterEngine::new(blog());
        assert_eq!(engine.visible().len(), 4);
        assert_eq!(engine.active_tag(), &TagFilter::All);
        assert_eq!(engine.active_query(), "");
    }

    #[test]
    fn test_tag_and_query_commute() {
        let tags = ["all", "rust", "go", "Rust", "missing"];
        let queries = ["", "rust", "GO", "  notes ", "zzz"];

        for tag in tags {
            for query in queries {
                let mut a = FilterEngine::new(blog());
                a.set_tag(tag);
                let first = ids(a.set_query(query));

                let mut b = FilterEngine::new(blog());
                b.set_query(query);
                let second = ids(b.set_tag(tag));

                assert_eq!(first, second, "tag={:?} query={:?}", tag, query);
            }
        }
    }

    #[test]
    fn test_clear_equals_empty_query() {
        let mut engine = FilterEngine::new(blog());
        engine.set_tag("rust");
        engine.set_query("async");

        let cleared = ids(engine.clear());
        let empty = ids(engine.set_query(""));
        assert_eq!(cleared, empty);
        assert_eq!(cleared, vec!["a.md"]);
        assert_eq!(engine.active_tag(), &TagFilter::Tag("rust".to_string()));
    }

    #[test]
    fn test_all_tag_filters_only_by_query() {
        let mut engine = FilterEngine::new(blog());
        engine.set_tag("go");
        engine.set_query("rust");

        // "rust" matches titles, an excerpt, tags and a category
        assert_eq!(ids(engine.set_tag("all")), vec!["a.md", "b.md", "c.md", "d.md"]);
    }

    #[test]
    fn test_query_is_trimmed_and_lowercased() {
        let mut engine = FilterEngine::new(blog());
        assert_eq!(ids(engine.set_query("  CHANNELS ")), vec!["b.md"]);
        assert_eq!(engine.active_query(), "channels");
    }

    #[test]
    fn test_tag_match_is_exact() {
        let mut engine = FilterEngine::new(blog());
        assert_eq!(ids(engine.set_tag("Rust")), vec!["d.md"]);
        assert_eq!(ids(engine.set_tag("rus")), Vec::<String>::new());
    }

    #[test]
    fn test_unknown_tag_is_empty_not_error() {
        let mut engine = FilterEngine::new(blog());
        assert!(engine.set_tag("nope").is_empty());
        assert!(!engine.stats().has_results);
    }

    #[test]
    fn test_repeated_calls_are_idempotent() {
        let mut engine = FilterEngine::new(blog());
        let once = ids(engine.set_query("rust"));
        let twice = ids(engine.set_query("rust"));
        engine.set_query("r");
        engine.set_query("ru");
        let last = ids(engine.set_query("rust"));
        assert_eq!(once, twice);
        assert_eq!(once, last);
    }

    #[test]
    fn test_preserves_load_order() {
        let mut engine = FilterEngine::new(blog());
        assert_eq!(ids(engine.set_query("s")), vec!["a.md", "b.md", "c.md", "d.md"]);

        // "c.md" has no "n" anywhere, the rest keep their relative order
        assert_eq!(ids(engine.set_query("n")), vec!["a.md", "b.md", "d.md"]);
        assert_eq!(ids(engine.set_query("o")), vec!["b.md", "c.md", "d.md"]);

        engine.set_tag("tools");
        assert_eq!(ids(engine.set_query("")), vec!["c.md"]);
    }

    #[test]
    fn test_commands() {
        let mut engine = FilterEngine::new(blog());
        engine.apply(FilterCommand::SetTagFilter(TagFilter::Tag("go".to_string())));
        assert_eq!(
            ids(engine.apply(FilterCommand::SetQuery("Futures".to_string()))),
            vec!["b.md"]
        );
        assert_eq!(ids(engine.apply(FilterCommand::ClearQuery)), vec!["b.md"]);
    }

    #[test]
    fn test_replace_posts_keeps_filter_state() {
        let mut engine = FilterEngine::new(blog());
        engine.set_tag("go");
        assert!(engine.set_query("world").is_empty());

        assert_eq!(ids(engine.replace_posts(sample())), vec!["hello.md"]);

        assert!(engine.replace_posts(Vec::new()).is_empty());
        assert_eq!(engine.active_tag().as_str(), "go");
        assert_eq!(engine.active_query(), "world");
    }

    #[test]
    fn test_tag_counts() {
        let mut posts = blog();
        posts[0].tags.push("rust".to_string());
        let engine = FilterEngine::new(posts);

        let counts: Vec<(String, usize)> = engine
            .tag_counts()
            .into_iter()
            .map(|c| (c.tag, c.count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("Rust".to_string(), 1),
                ("async".to_string(), 1),
                ("go".to_string(), 1),
                ("rust".to_string(), 1),
                ("tools".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_stats() {
        let mut engine = FilterEngine::new(blog());
        engine.set_query("Rust");
        let stats = engine.stats();
        assert_eq!(stats.query, "rust");
        assert_eq!(stats.total_results, 4);
        assert!(stats.has_results);
    }
}
