//! Translator hints attached to extracted entries.
//!
//! The hint is advisory text only: neighbouring strings from the source file and a
//! category guessed from the entry name's first `_`-separated segment.

use crate::formats::StringResource;

/// Default number of neighbours taken on each side of a string.
pub const DEFAULT_CONTEXT_WINDOW: usize = 2;

/// Number of characters of a neighbour's text shown in the hint.
const PREVIEW_CHARS: usize = 50;

/// Builds the hint for the string called `name`.
///
/// `strings` is the full list of source strings in document order. With duplicate
/// names the first occurrence is used. Returns an empty string when `name` is absent.
pub fn string_context(strings: &[&StringResource], name: &str, window: usize) -> String {
    let Some(index) = strings.iter().position(|s| s.name == name) else {
        return String::new();
    };

    let mut parts = Vec::new();

    let start = index.saturating_sub(window);
    let end = (index + window + 1).min(strings.len());
    let related = (start..end)
        .filter(|&i| i != index)
        .map(|i| strings[i])
        .filter(|s| !s.name.is_empty() && !s.value().is_empty())
        .map(|s| format!("{}: {}...", s.name, preview(s.value())))
        .collect::<Vec<_>>();
    if !related.is_empty() {
        parts.push(format!("Related strings: {}", related.join("; ")));
    }

    if let Some(category) = category(name) {
        parts.push(format!("Category: {}", category));
    }

    parts.join(" | ")
}

/// Hint for a plurals group.
pub fn plural_context(name: &str) -> String {
    format!("Plural forms for: {}", name)
}

/// The segment before the first `_`, if the name has one at all.
fn category(name: &str) -> Option<&str> {
    name.split_once('_').map(|(head, _)| head)
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(pairs: &[(&str, &str)]) -> Vec<StringResource> {
        pairs
            .iter()
            .map(|(name, value)| StringResource::new(*name, *value))
            .collect()
    }

    #[test]
    fn test_window_in_the_middle() {
        let owned = strings(&[
            ("a", "A"),
            ("b", "B"),
            ("settings_title", "Settings"),
            ("d", "D"),
            ("e", "E"),
            ("f", "F"),
        ]);
        let refs: Vec<_> = owned.iter().collect();
        assert_eq!(
            string_context(&refs, "settings_title", 2),
            "Related strings: a: A...; b: B...; d: D...; e: E... | Category: settings"
        );
    }

    #[test]
    fn test_window_clipped_at_start() {
        let owned = strings(&[("first", "One"), ("second", "Two"), ("third", "Three")]);
        let refs: Vec<_> = owned.iter().collect();
        assert_eq!(
            string_context(&refs, "first", 2),
            "Related strings: second: Two...; third: Three..."
        );
    }

    #[test]
    fn test_skips_empty_neighbours_and_truncates() {
        let long = "x".repeat(80);
        let owned = strings(&[("empty", ""), ("target", "T"), ("long", long.as_str())]);
        let refs: Vec<_> = owned.iter().collect();
        let hint = string_context(&refs, "target", 2);
        assert_eq!(hint, format!("Related strings: long: {}...", "x".repeat(50)));
    }

    #[test]
    fn test_truncation_counts_characters() {
        let text = "ā".repeat(60);
        assert_eq!(preview(&text).chars().count(), 50);
    }

    #[test]
    fn test_lonely_string_without_category() {
        let owned = strings(&[("alone", "Alone")]);
        let refs: Vec<_> = owned.iter().collect();
        assert_eq!(string_context(&refs, "alone", 2), "");
        assert_eq!(string_context(&refs, "missing", 2), "");
    }

    #[test]
    fn test_category_only() {
        let owned = strings(&[("menu_open", "Open")]);
        let refs: Vec<_> = owned.iter().collect();
        assert_eq!(string_context(&refs, "menu_open", 2), "Category: menu");
    }

    #[test]
    fn test_plural_context() {
        assert_eq!(plural_context("days_left"), "Plural forms for: days_left");
    }
}
