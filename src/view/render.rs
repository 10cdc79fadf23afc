//! HTML fragments for the list and detail views

use super::{DetailView, ListView, PostCard};
use crate::config::SiteConfig;
use crate::helpers::{format_post_date, highlight_terms, html_escape};
use crate::search::{TagCount, TagFilter, ALL_TAGS};

/// Render the post list. Matches of `query` in titles and excerpts are marked.
pub fn render_list(view: &ListView, query: &str) -> String {
    match view {
        ListView::Loading => r#"<div class="posts-loading">Loading posts...</div>"#.to_string(),
        ListView::Unavailable(message) => format!(
            r#"<div class="posts-error"><p>{}</p></div>"#,
            html_escape(message)
        ),
        ListView::NoResults => r#"<div class="no-posts"><p>No posts found.</p></div>"#.to_string(),
        ListView::Posts(cards) => {
            let cards: String = cards.iter().map(|card| render_card(card, query)).collect();
            format!(r#"<div class="posts-list">{}</div>"#, cards)
        }
    }
}

fn render_card(card: &PostCard, query: &str) -> String {
    format!(
        r#"<a href="{href}" class="post-card"><h2 class="post-title">{title}</h2><div class="post-meta"><span class="post-date">{date}</span><div class="post-tags">{tags}</div></div><p class="post-excerpt">{excerpt}</p><span class="post-read-more">Read more →</span></a>"#,
        href = html_escape(&card.href),
        title = highlight_terms(&card.title, query),
        date = html_escape(&card.date),
        tags = render_tags(&card.tags),
        excerpt = highlight_terms(&card.excerpt, query),
    )
}

fn render_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!(r#"<span class="post-tag">{}</span>"#, html_escape(tag)))
        .collect()
}

/// Render the tag filter buttons, "all" first, marking the active one
pub fn render_tag_filters(counts: &[TagCount], active: &TagFilter) -> String {
    let button = |filter: &str, label: String| {
        let class = if active.as_str() == filter {
            "filter-btn active"
        } else {
            "filter-btn"
        };
        format!(
            r#"<button class="{}" data-filter="{}">{}</button>"#,
            class,
            html_escape(filter),
            label
        )
    };

    let mut html = button(ALL_TAGS, "All".to_string());
    for count in counts {
        html.push_str(&button(
            &count.tag,
            format!("{} ({})", html_escape(&count.tag), count.count),
        ));
    }

    format!(r#"<div class="tag-filter">{}</div>"#, html)
}

/// Render the detail page body
pub fn render_detail(view: &DetailView, config: &SiteConfig) -> String {
    match view {
        DetailView::Loading => r#"<div class="post-loading">Loading post...</div>"#.to_string(),
        DetailView::NotFound(message) => format!(
            r#"<div class="post-error"><h2>Post not found</h2><p>{}</p></div>"#,
            html_escape(message)
        ),
        DetailView::Post(doc) => {
            let date = if doc.date.is_empty() {
                String::new()
            } else {
                format!(
                    r#"<span class="post-date">{}</span>"#,
                    html_escape(&format_post_date(&doc.date, &config.date_format))
                )
            };
            let tags = if doc.tags.is_empty() {
                String::new()
            } else {
                format!(r#"<div class="post-tags">{}</div>"#, render_tags(&doc.tags))
            };

            format!(
                r#"<header class="post-header"><h1 class="post-title">{}</h1><div class="post-meta">{}{}</div></header><div class="post-body">{}</div>"#,
                html_escape(&doc.title),
                date,
                tags,
                doc.html
            )
        }
    }
}
