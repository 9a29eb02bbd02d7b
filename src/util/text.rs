// src/util/text.rs

/// First `max_chars` characters of the content with line breaks folded into
/// spaces, so a list row stays on one line.
///
/// # Examples
///
/// ```
/// use notedesk::util::text::snippet;
///
/// assert_eq!(snippet("milk\neggs", 120), "milk eggs");
/// assert_eq!(snippet("abcdef", 3), "abc…");
/// ```
pub fn snippet(content: &str, max_chars: usize) -> String {
    let folded: String = content
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    match folded.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &folded[..cut]),
        None => folded,
    }
}

/// Pads or truncates to exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return format!("{}{}", text, " ".repeat(width - count));
    }
    if width == 0 {
        return String::new();
    }
    let kept: String = text.chars().take(width - 1).collect();
    format!("{}…", kept)
}
