use cadence_llm::{Run, RunError, RunStatus};

/// Substrings that mark a reply as the end of the strategy conversation
pub const COMPLETION_MARKERS: &[&str] = &[
    "[strategy_complete]",
    "[completed]",
    "[content_ideas]",
    "[content ideas]",
    "[content_ideas_ready]",
    "content ideas:",
];

/// Case-insensitive check for any completion marker
pub fn has_completion_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    COMPLETION_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Where a turn stands while its run is being driven.
///
/// `AwaitingRun -> Polling -> {Completed | Failed | TimedOut | ActionRequired}`.
/// Only `Completed` leads to reading messages back.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnState {
    AwaitingRun,
    Polling { attempts: u32 },
    Completed { attempts: u32 },
    Failed {
        status: RunStatus,
        last_error: Option<RunError>,
    },
    TimedOut { attempts: u32 },
    ActionRequired,
}

impl TurnState {
    /// The run was created; polling starts
    pub fn run_started(self) -> Self {
        match self {
            TurnState::AwaitingRun => TurnState::Polling { attempts: 0 },
            other => other,
        }
    }

    /// Fold one polled run snapshot into the state.
    ///
    /// A still-pending run on the last allowed attempt times out.
    pub fn observe(self, run: &Run, max_attempts: u32) -> Self {
        let TurnState::Polling { attempts } = self else {
            return self;
        };
        let attempts = attempts + 1;

        match run.status {
            RunStatus::Completed => TurnState::Completed { attempts },
            RunStatus::RequiresAction => TurnState::ActionRequired,
            status if status.is_terminal() => TurnState::Failed {
                status,
                last_error: run.last_error.clone(),
            },
            status if status.is_pending() && attempts >= max_attempts => {
                TurnState::TimedOut { attempts }
            }
            _ => TurnState::Polling { attempts },
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TurnState::AwaitingRun | TurnState::Polling { .. })
    }
}
