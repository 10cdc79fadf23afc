//! Helper functions for building views
//!
//! Date display, HTML escaping and post links.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
