use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static JSON_FENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```([A-Za-z0-9_-]*)[ \t]*\r?\n?(.*?)```").ok());

/// Bodies of fenced code blocks that look like JSON, in document order.
///
/// A block counts when it is tagged `json` or when it is untagged and its
/// body starts with `{` or `[`.
pub(crate) fn json_fences(text: &str) -> Vec<Value> {
    let Some(re) = JSON_FENCE.as_ref() else {
        return Vec::new();
    };

    re.captures_iter(text)
        .filter_map(|caps| {
            let lang = caps.get(1).map_or("", |m| m.as_str());
            let body = caps.get(2).map_or("", |m| m.as_str()).trim();
            let tagged = lang.eq_ignore_ascii_case("json");
            let untagged_json = lang.is_empty() && (body.starts_with('{') || body.starts_with('['));
            if !(tagged || untagged_json) {
                return None;
            }
            match serde_json::from_str(body) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!(error = %e, "fenced block is not valid JSON");
                    None
                }
            }
        })
        .collect()
}

/// Text of a list item with its bullet (`-`, `*`, `•`) or numeral (`1.`,
/// `1)`) removed. `None` when the line is not a list item.
pub(crate) fn strip_list_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();

    if let Some(rest) = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('•'))
    {
        return item_text(rest);
    }
    if let Some(rest) = trimmed.strip_prefix('*') {
        // `**bold**` and `*italic*` are not bullets
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        return item_text(rest);
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &trimmed[digits..];
    let rest = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    item_text(rest)
}

fn item_text(rest: &str) -> Option<&str> {
    let text = rest.trim();
    // Horizontal rules (`---`) and empty bullets
    if text.is_empty() || text.chars().all(|c| c == '-') {
        return None;
    }
    Some(text)
}

/// A line for the purposes of list detection: either a list item or not
pub(crate) fn is_list_item(line: &str) -> bool {
    strip_list_marker(line).is_some()
}

/// Split a comma separated value into trimmed, non-empty parts
pub(crate) fn split_commas(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| part.trim().trim_end_matches('.').trim())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove markdown emphasis wrapping a whole fragment (`**x**`, `*x*`, `__x__`)
pub(crate) fn strip_emphasis(text: &str) -> &str {
    let mut text = text.trim();
    for wrap in ["**", "__", "*", "_"] {
        if let Some(inner) = text
            .strip_prefix(wrap)
            .and_then(|t| t.strip_suffix(wrap))
        {
            text = inner.trim();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_list_marker() {
        assert_eq!(strip_list_marker("- Morning routine"), Some("Morning routine"));
        assert_eq!(strip_list_marker("  * Trend react"), Some("Trend react"));
        assert_eq!(strip_list_marker("• Behind the scenes"), Some("Behind the scenes"));
        assert_eq!(strip_list_marker("12. Day in the life"), Some("Day in the life"));
        assert_eq!(strip_list_marker("3) Q&A"), Some("Q&A"));
        assert_eq!(strip_list_marker("**Bold heading**"), None);
        assert_eq!(strip_list_marker("---"), None);
        assert_eq!(strip_list_marker("2024 was a good year"), None);
        assert_eq!(strip_list_marker("3.5 million views"), None);
    }

    #[test]
    fn test_json_fences_accepts_tagged_and_untagged() {
        let text = "a\n```json\n{\"a\": 1}\n```\nb\n```\n[1, 2]\n```\n```rust\nfn x() {}\n```";
        let values = json_fences(text);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["a"], 1);
        assert!(values[1].is_array());
    }

    #[test]
    fn test_json_fences_skips_invalid_json() {
        assert!(json_fences("```json\n{not json}\n```").is_empty());
    }

    #[test]
    fn test_split_commas() {
        assert_eq!(
            split_commas("Reels, Stories ,, Lives."),
            vec!["Reels", "Stories", "Lives"]
        );
    }

    #[test]
    fn test_strip_emphasis() {
        assert_eq!(strip_emphasis("**Phase 1**"), "Phase 1");
        assert_eq!(strip_emphasis("plain"), "plain");
    }

    #[test]
    fn test_fence_pattern_compiles() {
        assert!(JSON_FENCE.is_some());
    }
}
