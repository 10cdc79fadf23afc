//! Show a single post

use anyhow::Result;

use crate::helpers::{format_post_date, html_escape, strip_html};
use crate::view::{render_detail, DetailView};
use crate::Blog;

/// Load and print one post, as HTML or as plain text
pub async fn run(blog: &Blog, file: &str, html: bool) -> Result<()> {
    let view = blog.open_identifier(file).await;

    if html {
        let meta = view.page_meta(&blog.config);
        println!("<title>{}</title>", html_escape(&meta.title));
        println!("{}", render_detail(&view, &blog.config));
        return Ok(());
    }

    match view {
        DetailView::Loading => println!("Loading post..."),
        DetailView::NotFound(message) => anyhow::bail!(message),
        DetailView::Post(doc) => {
            println!("{}", doc.title);
            if !doc.date.is_empty() {
                println!("{}", format_post_date(&doc.date, &blog.config.date_format));
            }
            if !doc.tags.is_empty() {
                println!("#{}", doc.tags.join(" #"));
            }
            println!();
            println!("{}", strip_html(&doc.html).trim());
        }
    }

    Ok(())
}
