//! Content module - posts, the post index, front-matter and Markdown

mod document;
mod frontmatter;
mod markdown;
mod post;
pub mod repository;
pub mod source;

pub use document::PostDocument;
pub use frontmatter::{MetaValue, ParseWarning, ParsedDocument};
pub use markdown::MarkdownRenderer;
pub use post::{Post, PostIndex};
pub use repository::{LoadState, PostRepository};
pub use source::{Fetch, FileSource, HttpSource, LoadError};
