//! Show or clear the search history

use anyhow::Result;

use crate::Blog;

pub fn run(blog: &Blog, clear: bool) -> Result<()> {
    if clear {
        blog.history().clear();
        println!("Search history cleared.");
        return Ok(());
    }

    let history = blog.history().get();
    if history.is_empty() {
        println!("No recent searches.");
    }
    for (i, query) in history.iter().enumerate() {
        println!("  {}. {}", i + 1, query);
    }

    Ok(())
}
