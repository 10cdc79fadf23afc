//! List tags with their post counts

use anyhow::Result;

use crate::view::render_tag_filters;
use crate::Blog;

/// Load the post index and print every tag
pub async fn run(blog: &mut Blog, html: bool) -> Result<()> {
    blog.refresh().await?;

    let counts = blog.engine().tag_counts();
    if html {
        println!("{}", render_tag_filters(&counts, blog.engine().active_tag()));
        return Ok(());
    }

    println!("Tags ({}):", counts.len());
    for count in counts {
        println!("  {} ({})", count.tag, count.count);
    }

    Ok(())
}
