//! URL helper functions

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone by JavaScript's `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single query or path component
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Link to the detail page of a post
///
/// # Examples
/// ```ignore
/// post_link("post-view", "my post.md") // -> "post-view?file=my%20post.md"
/// ```
pub fn post_link(post_view: &str, identifier: &str) -> String {
    format!("{}?file={}", post_view, encode_component(identifier))
}

/// Extract the decoded `file` parameter from a query string
///
/// Accepts the query with or without its leading `?`. Empty values count as missing.
pub fn file_param(query: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "file")
        .map(|(_, value)| {
            // Form encoding writes spaces as '+'
            let value = value.replace('+', " ");
            percent_decode_str(&value).decode_utf8_lossy().into_owned()
        })
        .filter(|value| !value.is_empty())
}
