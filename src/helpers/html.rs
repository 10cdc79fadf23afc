//! HTML helper functions

use regex::RegexBuilder;

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape `text` and wrap every case-insensitive occurrence of `query` in `<mark>`
///
/// # Examples
/// ```ignore
/// highlight_terms("Hello <World>", "world") // -> "Hello &lt;<mark>World</mark>&gt;"
/// ```
pub fn highlight_terms(text: &str, query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        return html_escape(text);
    }

    let re = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            tracing::debug!("Cannot highlight {:?}: {}", query, e);
            return html_escape(text);
        }
    };

    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for m in re.find_iter(text) {
        result.push_str(&html_escape(&text[last..m.start()]));
        result.push_str("<mark>");
        result.push_str(&html_escape(m.as_str()));
        result.push_str("</mark>");
        last = m.end();
    }
    result.push_str(&html_escape(&text[last..]));

    result
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}
