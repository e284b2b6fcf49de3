use regex::Regex;
use std::sync::LazyLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::text::{json_fences, split_commas, strip_emphasis, strip_list_marker};
use super::ExtractionStrategy;

/// Phased growth plan recovered from a strategy reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionMap {
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    #[serde(default, alias = "weeklyFocus")]
    pub weekly_focus: Vec<String>,
    #[serde(default, alias = "contentFormats")]
    pub content_formats: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default, alias = "toneGuidance")]
    pub tone_guidance: String,
}

impl Phase {
    fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.weekly_focus.is_empty()
            && self.content_formats.is_empty()
            && self.platforms.is_empty()
            && self.tone_guidance.is_empty()
    }
}

/// A fenced JSON object with a `phases` array
pub struct FencedJsonMissionMap;

impl ExtractionStrategy<MissionMap> for FencedJsonMissionMap {
    fn name(&self) -> &'static str {
        "fenced_json_mission_map"
    }

    fn extract(&self, text: &str) -> Option<MissionMap> {
        json_fences(text).iter().find_map(|value| {
            let phases = phases_array(value)?;
            let phases: Vec<Phase> = phases
                .iter()
                .enumerate()
                .filter_map(|(i, phase)| phase_from_value(i, phase))
                .collect();
            (!phases.is_empty()).then_some(MissionMap { phases })
        })
    }
}

fn phases_array(value: &Value) -> Option<&Vec<Value>> {
    let object = value.as_object()?;
    if let Some(phases) = object.get("phases").and_then(Value::as_array) {
        return Some(phases);
    }
    ["mission_map", "missionMap"]
        .iter()
        .find_map(|key| object.get(*key))
        .and_then(|map| map.get("phases"))
        .and_then(Value::as_array)
}

fn phase_from_value(index: usize, value: &Value) -> Option<Phase> {
    let fields = value.as_object()?;
    let string_field = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| fields.get(*key))
            .map(text_value)
            .unwrap_or_default()
    };
    let list_field = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| fields.get(*key))
            .map(list_value)
            .unwrap_or_default()
    };

    let mut phase = Phase {
        name: string_field(&["name", "title", "phase"]),
        weekly_focus: list_field(&["weekly_focus", "weeklyFocus"]),
        content_formats: list_field(&["content_formats", "contentFormats", "formats"]),
        platforms: list_field(&["platforms"]),
        tone_guidance: string_field(&["tone_guidance", "toneGuidance", "tone"]),
    };
    if phase.is_blank() {
        return None;
    }
    if phase.name.is_empty() {
        phase.name = format!("Phase {}", index + 1);
    }
    Some(phase)
}

/// Array of strings, or a comma separated string
fn list_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(text_value)
            .filter(|item| !item.is_empty())
            .collect(),
        Value::String(s) => split_commas(s),
        _ => Vec::new(),
    }
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(text_value)
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

/// `Phase N` headings splitting the reply into labelled regions
pub struct PhaseHeadingMissionMap;

#[derive(Clone, Copy)]
enum Label {
    WeeklyFocus,
    ContentFormats,
    Platforms,
    Tone,
}

static PHASE_HEADING: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:#{1,6}\s*)?(?:\*\*|__)?\s*phase\s+\d+\b").ok()
});

static PHASE_LABEL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:[-*•]\s+)?(?:\*\*|__)?\s*(weekly\s+focus|content\s+formats?|platforms?|tone(?:\s+guidance)?)\s*(?:\*\*|__)?\s*:\s*(?:\*\*|__)?\s*(.*)$",
    )
    .ok()
});

impl ExtractionStrategy<MissionMap> for PhaseHeadingMissionMap {
    fn name(&self) -> &'static str {
        "phase_heading_mission_map"
    }

    fn extract(&self, text: &str) -> Option<MissionMap> {
        let heading = PHASE_HEADING.as_ref()?;
        let label = PHASE_LABEL.as_ref()?;

        let mut phases: Vec<Phase> = Vec::new();
        let mut current: Option<Label> = None;

        for line in text.lines() {
            if heading.is_match(line) {
                phases.push(Phase {
                    name: heading_name(line),
                    ..Phase::default()
                });
                current = None;
                continue;
            }
            let Some(phase) = phases.last_mut() else {
                continue;
            };

            if let Some(caps) = label.captures(line) {
                let kind = label_kind(caps.get(1).map_or("", |m| m.as_str()));
                let inline = strip_emphasis(caps.get(2).map_or("", |m| m.as_str()));
                if inline.is_empty() {
                    current = Some(kind);
                } else {
                    push_inline(phase, kind, inline);
                    current = None;
                }
                continue;
            }

            match (current, strip_list_marker(line)) {
                (Some(kind), Some(item)) => push_item(phase, kind, strip_emphasis(item)),
                (Some(_), None) if line.trim().is_empty() => {}
                _ => current = None,
            }
        }

        (!phases.is_empty()).then_some(MissionMap { phases })
    }
}

/// `## **Phase 1: Foundation**` -> `Phase 1: Foundation`
fn heading_name(line: &str) -> String {
    let name = line.trim().trim_start_matches('#').trim();
    strip_emphasis(name)
        .trim_end_matches(':')
        .trim()
        .to_string()
}

fn label_kind(label: &str) -> Label {
    let label = label.to_lowercase();
    if label.starts_with("weekly") {
        Label::WeeklyFocus
    } else if label.starts_with("content") {
        Label::ContentFormats
    } else if label.starts_with("platform") {
        Label::Platforms
    } else {
        Label::Tone
    }
}

fn push_inline(phase: &mut Phase, kind: Label, value: &str) {
    match kind {
        Label::Tone => push_item(phase, kind, value),
        _ => {
            for item in split_commas(value) {
                push_item(phase, kind, &item);
            }
        }
    }
}

fn push_item(phase: &mut Phase, kind: Label, item: &str) {
    let item = item.trim();
    if item.is_empty() {
        return;
    }
    match kind {
        Label::WeeklyFocus => phase.weekly_focus.push(item.to_string()),
        Label::ContentFormats => phase.content_formats.push(item.to_string()),
        Label::Platforms => phase.platforms.push(item.to_string()),
        Label::Tone => {
            if !phase.tone_guidance.is_empty() {
                phase.tone_guidance.push(' ');
            }
            phase.tone_guidance.push_str(item);
        }
    }
}
