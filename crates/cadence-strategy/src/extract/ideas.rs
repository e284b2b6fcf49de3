use regex::Regex;
use std::sync::LazyLock;
use serde_json::Value;

use super::text::{is_list_item, json_fences, strip_list_marker};
use super::ExtractionStrategy;

const IDEA_KEYS: &[&str] = &["content_ideas", "ideas", "contentIdeas", "topic_ideas"];
const IDEA_FIELDS: &[&str] = &["title", "idea", "text"];

/// Prose lines shorter than this are not taken as ideas when a section has
/// no list items.
const MIN_PROSE_IDEA_LEN: usize = 10;

/// A fenced JSON block with an ideas array under a known key
pub struct FencedJsonIdeas;

impl ExtractionStrategy<Vec<String>> for FencedJsonIdeas {
    fn name(&self) -> &'static str {
        "fenced_json_ideas"
    }

    fn extract(&self, text: &str) -> Option<Vec<String>> {
        json_fences(text)
            .iter()
            .filter_map(ideas_array)
            .map(|items| items.iter().filter_map(idea_from_value).collect::<Vec<_>>())
            .find(|ideas| !ideas.is_empty())
    }
}

fn ideas_array(value: &Value) -> Option<&Vec<Value>> {
    let object = value.as_object()?;
    IDEA_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_array))
}

fn idea_from_value(item: &Value) -> Option<String> {
    let text = match item {
        Value::String(s) => s.as_str(),
        Value::Object(fields) => IDEA_FIELDS
            .iter()
            .find_map(|field| fields.get(*field).and_then(Value::as_str))?,
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

static BRACKET_MARKER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\[(?:CONTENT_IDEAS_READY|CONTENT_IDEAS|CONTENT IDEAS)\]").ok()
});

static PHRASE_HEADING: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:here are some content ideas for you|content ideas based on your strategy|content ideas(?:\s*\(\s*\d+\s*-\s*\d+\s*\))?)\s*:",
    )
    .ok()
});

/// `[CONTENT_IDEAS]`-style marker followed by one idea per line
pub struct BracketMarkerIdeas;

impl ExtractionStrategy<Vec<String>> for BracketMarkerIdeas {
    fn name(&self) -> &'static str {
        "bracket_marker_ideas"
    }

    fn extract(&self, text: &str) -> Option<Vec<String>> {
        let re = BRACKET_MARKER.as_ref()?;
        let start = re.find(text)?.end();
        let section = &text[start..];
        let section = section.split('[').next().unwrap_or(section);

        let ideas: Vec<String> = section
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| strip_list_marker(line).unwrap_or(line).to_string())
            .collect();
        Some(ideas)
    }
}

/// A phrase heading such as `Content Ideas:` followed by a list
pub struct PhraseHeadingIdeas;

impl ExtractionStrategy<Vec<String>> for PhraseHeadingIdeas {
    fn name(&self) -> &'static str {
        "phrase_heading_ideas"
    }

    fn extract(&self, text: &str) -> Option<Vec<String>> {
        let re = PHRASE_HEADING.as_ref()?;
        let start = re.find(text)?.end();
        let section = &text[start..];
        let end = [section.find("##"), section.find('[')]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(section.len());
        let section = &section[..end];

        let items = list_items(section);
        if !items.is_empty() {
            return Some(items);
        }

        // No list: fall back to substantial prose lines
        Some(
            section
                .lines()
                .map(str::trim)
                .filter(|line| line.len() > MIN_PROSE_IDEA_LEN)
                .filter(|line| !line.starts_with('#') && !line.starts_with('['))
                .map(str::to_string)
                .collect(),
        )
    }
}

/// Items of the first list in `section`.
///
/// Blank lines and indented continuation lines inside the list are skipped;
/// any other line ends it.
fn list_items(section: &str) -> Vec<String> {
    let mut items = Vec::new();
    for line in section.lines() {
        if let Some(item) = strip_list_marker(line) {
            items.push(item.to_string());
            continue;
        }
        if items.is_empty() || line.trim().is_empty() || line.starts_with(char::is_whitespace) {
            continue;
        }
        break;
    }
    items
}

/// First run of two or more consecutive list lines anywhere in the text
pub struct BulletBlockIdeas;

impl ExtractionStrategy<Vec<String>> for BulletBlockIdeas {
    fn name(&self) -> &'static str {
        "bullet_block_ideas"
    }

    fn extract(&self, text: &str) -> Option<Vec<String>> {
        let lines: Vec<&str> = text.lines().collect();
        let mut i = 0;
        while i < lines.len() {
            if !is_list_item(lines[i]) {
                i += 1;
                continue;
            }
            let block: Vec<String> = lines[i..]
                .iter()
                .map_while(|line| strip_list_marker(line))
                .map(str::to_string)
                .collect();
            if block.len() >= 2 {
                return Some(block);
            }
            i += block.len().max(1);
        }
        None
    }
}
