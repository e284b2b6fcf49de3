use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling budget for one run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(1),
        }
    }
}

impl PollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Upper bound on the time spent sleeping between polls, saturating
    pub fn budget(&self) -> Duration {
        self.interval
            .checked_mul(self.max_attempts)
            .unwrap_or(Duration::MAX)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub poll: PollConfig,
    /// Page size when reading the reply back after completion
    pub message_limit: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            poll: PollConfig::default(),
            message_limit: 20,
        }
    }
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_message_limit(mut self, limit: u32) -> Self {
        self.message_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget() {
        let poll = PollConfig::new()
            .with_max_attempts(30)
            .with_interval(Duration::from_millis(500));
        assert_eq!(poll.budget(), Duration::from_secs(15));

        let huge = PollConfig::new()
            .with_max_attempts(u32::MAX)
            .with_interval(Duration::from_millis(u64::MAX));
        assert_eq!(huge.budget(), Duration::MAX);
    }
}
