//! Helper utility functions

/// Sanitize a name for use in file names
pub fn sanitize_name(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Drop a `data:<mime>;base64,` header, leaving raw base64
pub fn strip_data_uri(content: &str) -> &str {
    if content.starts_with("data:") {
        if let Some((_, payload)) = content.split_once(',') {
            return payload;
        }
    }
    content
}

/// First `max` characters of `s`
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
