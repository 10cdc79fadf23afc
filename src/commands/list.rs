//! List posts, optionally filtered by tag and search query

use anyhow::Result;

use crate::search::{FilterCommand, TagFilter};
use crate::view::{render_list, ListView};
use crate::Blog;

/// Load the post index and print the visible posts
pub async fn run(
    blog: &mut Blog,
    tag: Option<&str>,
    query: Option<&str>,
    html: bool,
) -> Result<()> {
    if let Err(e) = blog.refresh().await {
        tracing::debug!("Refresh failed: {:?}", e);
    }

    if let Some(tag) = tag {
        blog.apply(FilterCommand::SetTagFilter(TagFilter::from(tag)));
    }
    let view = match query {
        Some(query) => {
            blog.history().save(query);
            blog.apply(FilterCommand::SetQuery(query.to_string()))
        }
        None => blog.list_view(),
    };

    if html {
        println!("{}", render_list(&view, blog.engine().active_query()));
        return Ok(());
    }

    match view {
        ListView::Loading => println!("Loading posts..."),
        ListView::Unavailable(message) => anyhow::bail!(message),
        ListView::NoResults => println!("No posts found."),
        ListView::Posts(cards) => {
            let stats = blog.engine().stats();
            if stats.query.is_empty() {
                println!("Posts ({}):", stats.total_results);
            } else {
                println!("Posts matching {:?} ({}):", stats.query, stats.total_results);
            }
            for card in cards {
                let tags = if card.tags.is_empty() {
                    String::new()
                } else {
                    format!(" #{}", card.tags.join(" #"))
                };
                println!("  {} - {}{} [{}]", card.date, card.title, tags, card.href);
            }
        }
    }

    Ok(())
}
