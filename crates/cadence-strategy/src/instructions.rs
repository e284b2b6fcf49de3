use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Write;

const PLAN_REMINDER: &str = "Remember: Generate a detailed 30-day content plan with specific content ideas tailored to the user's goals. The plan should include a mission, weekly objective, content schedule, and at least 15-20 specific content ideas.";

/// Onboarding answers of a creator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatorProfile {
    #[serde(default, alias = "experienceLevel")]
    pub experience_level: Option<String>,
    #[serde(default, alias = "nicheTopic")]
    pub niche_topic: Option<String>,
    #[serde(default, alias = "contentTypes", deserialize_with = "null_as_empty")]
    pub content_types: Vec<String>,
    #[serde(default, alias = "creatorStyle")]
    pub creator_style: Option<String>,
    #[serde(default, alias = "contentFormatPreference")]
    pub content_format_preference: Option<String>,
    #[serde(default, alias = "postingFrequencyGoal")]
    pub posting_frequency_goal: Option<String>,
    #[serde(default, alias = "creatorMission")]
    pub creator_mission: Option<String>,
    #[serde(default, alias = "shootingPreference")]
    pub shooting_preference: Option<String>,
}

impl CreatorProfile {
    fn lines(&self) -> Vec<(&'static str, String)> {
        let mut lines = Vec::new();
        let mut push = |label: &'static str, value: &Option<String>| {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                lines.push((label, value.to_string()));
            }
        };
        push("Experience Level", &self.experience_level);
        push("Niche", &self.niche_topic);
        push("Creator Style", &self.creator_style);
        push("Content Format Preferences", &self.content_format_preference);
        push("Posting Frequency Goal", &self.posting_frequency_goal);
        push("Creator Mission", &self.creator_mission);
        push("Shooting Preference", &self.shooting_preference);

        let types: Vec<&str> = self
            .content_types
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if !types.is_empty() {
            lines.insert(2.min(lines.len()), ("Content Types", types.join(", ")));
        }
        lines
    }
}

/// Onboarding rows store unanswered lists as `null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The creator's currently active strategy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyContext {
    #[serde(default, alias = "strategyType")]
    pub strategy_type: Option<String>,
    #[serde(default, alias = "postingFrequency")]
    pub posting_frequency: Option<String>,
}

impl StrategyContext {
    fn lines(&self) -> Vec<(&'static str, String)> {
        [
            ("Current Strategy Type", &self.strategy_type),
            ("Posting Frequency", &self.posting_frequency),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            let value = value.as_deref()?.trim();
            (!value.is_empty()).then(|| (label, value.to_string()))
        })
        .collect()
    }
}

/// Renders creator context into a run's `additional_instructions`
#[derive(Debug, Clone, Default)]
pub struct InstructionsBuilder {
    profile: Option<CreatorProfile>,
    strategy: Option<StrategyContext>,
    extra: Option<String>,
}

impl InstructionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(mut self, profile: Option<CreatorProfile>) -> Self {
        self.profile = profile;
        self
    }

    pub fn strategy(mut self, strategy: Option<StrategyContext>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Literal instructions appended after the rendered context
    pub fn extra(mut self, extra: Option<String>) -> Self {
        self.extra = extra.filter(|e| !e.trim().is_empty());
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::from("This user has the following profile:\n");

        let profile = self.profile.as_ref().map(CreatorProfile::lines).unwrap_or_default();
        render_section(&mut out, &profile, "No onboarding data available.");
        out.push('\n');

        let strategy = self.strategy.as_ref().map(StrategyContext::lines).unwrap_or_default();
        render_section(&mut out, &strategy, "No strategy data available.");
        out.push('\n');

        out.push_str(PLAN_REMINDER);

        if let Some(extra) = &self.extra {
            out.push_str("\n\n");
            out.push_str(extra.trim());
        }
        out
    }
}

fn render_section(out: &mut String, lines: &[(&'static str, String)], empty: &str) {
    if lines.is_empty() {
        let _ = writeln!(out, "{}", empty);
        return;
    }
    for (label, value) in lines {
        let _ = writeln!(out, "- {}: {}", label, value);
    }
}
