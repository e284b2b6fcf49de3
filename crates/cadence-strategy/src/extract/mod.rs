//! Best-effort extraction of structured artifacts from free-text replies.
//!
//! Each artifact has an ordered list of strategies. The first strategy that
//! produces a non-empty result wins; when none does the artifact is simply
//! absent. Nothing in here returns an error.

mod ideas;
mod mission_map;
mod text;

pub use ideas::{BracketMarkerIdeas, BulletBlockIdeas, FencedJsonIdeas, PhraseHeadingIdeas};
pub use mission_map::{FencedJsonMissionMap, MissionMap, Phase, PhaseHeadingMissionMap};

use serde::Serialize;

/// A pure parsing strategy for one artifact type
pub trait ExtractionStrategy<T>: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when the strategy does not recognise the text
    fn extract(&self, text: &str) -> Option<T>;
}

/// Everything recovered from one reply
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    pub content_ideas: Vec<String>,
    pub mission_map: Option<MissionMap>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.content_ideas.is_empty() && self.mission_map.is_none()
    }
}

pub struct Extractor {
    ideas: Vec<Box<dyn ExtractionStrategy<Vec<String>>>>,
    mission_map: Vec<Box<dyn ExtractionStrategy<MissionMap>>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            ideas: vec![
                Box::new(FencedJsonIdeas),
                Box::new(BracketMarkerIdeas),
                Box::new(PhraseHeadingIdeas),
                Box::new(BulletBlockIdeas),
            ],
            mission_map: vec![
                Box::new(FencedJsonMissionMap),
                Box::new(PhaseHeadingMissionMap),
            ],
        }
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// An extractor with custom strategy chains
    pub fn with_strategies(
        ideas: Vec<Box<dyn ExtractionStrategy<Vec<String>>>>,
        mission_map: Vec<Box<dyn ExtractionStrategy<MissionMap>>>,
    ) -> Self {
        Self { ideas, mission_map }
    }

    pub fn extract(&self, text: &str) -> Extraction {
        Extraction {
            content_ideas: self.content_ideas(text),
            mission_map: self.mission_map(text),
        }
    }

    pub fn content_ideas(&self, text: &str) -> Vec<String> {
        first_match(&self.ideas, text, |ideas| !ideas.is_empty()).unwrap_or_default()
    }

    pub fn mission_map(&self, text: &str) -> Option<MissionMap> {
        first_match(&self.mission_map, text, |map| !map.phases.is_empty())
    }
}

fn first_match<T>(
    strategies: &[Box<dyn ExtractionStrategy<T>>],
    text: &str,
    accept: impl Fn(&T) -> bool,
) -> Option<T> {
    for strategy in strategies {
        match strategy.extract(text) {
            Some(found) if accept(&found) => {
                tracing::debug!(strategy = strategy.name(), "extraction strategy matched");
                return Some(found);
            }
            _ => tracing::trace!(strategy = strategy.name(), "extraction strategy did not match"),
        }
    }
    tracing::debug!(
        strategies = strategies.len(),
        text_len = text.len(),
        "no extraction strategy matched"
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json_ideas_preserve_order() {
        let text = "Great!\n```json\n{\"content_ideas\":[\"A\",\"B\"]}\n```";
        assert_eq!(Extractor::new().content_ideas(text), vec!["A", "B"]);
    }

    #[test]
    fn test_bracket_marker_ideas() {
        let text = "Here are your ideas:\n[CONTENT_IDEAS]\n- Post a morning routine\n- React to a trend\n[/CONTENT_IDEAS]";
        assert_eq!(
            Extractor::new().content_ideas(text),
            vec!["Post a morning routine", "React to a trend"]
        );
    }

    #[test]
    fn test_unstructured_text_yields_nothing() {
        let extraction = Extractor::new()
            .extract("Tell me a bit more about your audience. What do they enjoy watching?");
        assert!(extraction.is_empty());
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(Extractor::new().extract("").is_empty());
    }

    #[test]
    fn test_json_wins_over_markers() {
        let text = "[CONTENT_IDEAS]\n- From marker\n\n```json\n{\"ideas\":[\"From json\"]}\n```";
        assert_eq!(Extractor::new().content_ideas(text), vec!["From json"]);
    }

    #[test]
    fn test_extracts_both_artifacts() {
        let text = "\
**Phase 1: Foundation**
Weekly Focus: Niche clarity, Profile setup
Platforms: Instagram

[CONTENT_IDEAS]
1. Studio tour
2. First-week vlog
";
        let extraction = Extractor::new().extract(text);
        assert_eq!(extraction.content_ideas, vec!["Studio tour", "First-week vlog"]);
        let map = extraction.mission_map.unwrap();
        assert_eq!(map.phases.len(), 1);
        assert_eq!(map.phases[0].platforms, vec!["Instagram"]);
    }

    struct Never;

    impl ExtractionStrategy<Vec<String>> for Never {
        fn name(&self) -> &'static str {
            "never"
        }

        fn extract(&self, _text: &str) -> Option<Vec<String>> {
            Some(Vec::new())
        }
    }

    #[test]
    fn test_empty_results_fall_through() {
        let extractor = Extractor::with_strategies(
            vec![Box::new(Never), Box::new(BulletBlockIdeas)],
            Vec::new(),
        );
        assert_eq!(extractor.content_ideas("- a\n- b"), vec!["a", "b"]);
    }
}
