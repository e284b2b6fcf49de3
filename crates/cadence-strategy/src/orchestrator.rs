use std::sync::Arc;

use cadence_llm::{
    AssistantsClient, CreateMessageRequest, CreateRunRequest, ListMessagesQuery, MessageList, Run,
    ThreadMessage,
};
use cadence_persist::{
    ArtifactDocument, ArtifactKind, ContentIdea, DBMessage, PersistenceClient, ThreadPurpose,
    ThreadRecord,
};
use tracing::{debug, info, warn};

use crate::completion::{has_completion_marker, TurnState};
use crate::error::{Result, TurnError, TurnErrorKind};
use crate::extract::{Extraction, Extractor};
use crate::sleeper::Sleeper;
use crate::types::{OpenedThread, OrchestratorConfig, StartedTurn, TurnInput, TurnOutput};

/// Drives strategy-chat turns against the assistant API and mirrors them
/// into local storage.
///
/// Vendor calls are made one at a time and never retried. Storage writes
/// other than thread lookups are best-effort: failures are logged and the
/// turn carries on.
pub struct StrategyOrchestrator {
    client: Arc<dyn AssistantsClient>,
    persistence: Arc<dyn PersistenceClient>,
    extractor: Extractor,
    sleeper: Arc<dyn Sleeper>,
    config: OrchestratorConfig,
}

impl StrategyOrchestrator {
    pub(crate) fn new(
        client: Arc<dyn AssistantsClient>,
        persistence: Arc<dyn PersistenceClient>,
        extractor: Extractor,
        sleeper: Arc<dyn Sleeper>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            client,
            persistence,
            extractor,
            sleeper,
            config,
        }
    }

    /// Create a builder for fluent construction
    pub fn builder() -> crate::builder::OrchestratorBuilder {
        crate::builder::OrchestratorBuilder::new()
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn persistence(&self) -> &Arc<dyn PersistenceClient> {
        &self.persistence
    }

    /// Relay one user message and block until the assistant has replied.
    pub async fn run_turn(&self, input: TurnInput) -> Result<TurnOutput> {
        require_assistant(&input.assistant_id, input.thread_id.as_deref())?;

        let thread_id = match input.thread_id.as_deref() {
            Some(thread_id) => {
                self.adopt_thread(thread_id, &input.user_id, input.purpose, &input.assistant_id)
                    .await;
                thread_id.to_string()
            }
            None => {
                self.create_thread(&input.user_id, input.purpose, &input.assistant_id)
                    .await?
                    .thread_id
            }
        };

        let started = self
            .start_turn(
                &thread_id,
                &input.user_id,
                &input.assistant_id,
                &input.message,
                input.additional_instructions.clone(),
            )
            .await?;

        self.poll_run(&thread_id, &started.run_id).await?;

        let reply = self.latest_reply(&thread_id).await?;
        let reply_text = reply.text();
        self.mirror(
            DBMessage::assistant(&thread_id, &input.user_id, &reply_text).with_message_id(&reply.id),
        )
        .await;

        let completed = has_completion_marker(&reply_text);
        let extraction = if completed {
            let extraction = self.extractor.extract(&reply_text);
            self.store_artifacts(&input.user_id, &thread_id, &extraction).await;
            extraction
        } else {
            Extraction::default()
        };

        info!(
            thread_id = %thread_id,
            run_id = %started.run_id,
            completed,
            content_ideas = extraction.content_ideas.len(),
            mission_map = extraction.mission_map.is_some(),
            "strategy turn finished"
        );

        Ok(TurnOutput {
            thread_id,
            run_id: started.run_id,
            reply: reply_text,
            completed,
            content_ideas: extraction.content_ideas,
            mission_map: extraction.mission_map,
        })
    }

    /// Resolve the thread a conversation should continue on.
    ///
    /// A supplied thread id is adopted as-is. Otherwise the newest thread of
    /// the user for `purpose` is resumed, and only when there is none is a
    /// new vendor thread created.
    pub async fn open_thread(
        &self,
        user_id: &str,
        purpose: ThreadPurpose,
        assistant_id: &str,
        thread_id: Option<&str>,
    ) -> Result<OpenedThread> {
        if let Some(thread_id) = thread_id {
            let created = self
                .adopt_thread(thread_id, user_id, purpose, assistant_id)
                .await;
            let record = self
                .persistence
                .get_thread(thread_id)
                .await
                .ok()
                .flatten()
                .unwrap_or_else(|| ThreadRecord::new(thread_id, user_id, purpose, assistant_id));
            return Ok(OpenedThread { record, created });
        }

        let latest = self
            .persistence
            .latest_thread(user_id, purpose)
            .await
            .map_err(|e| TurnError::new(None, e))?;
        if let Some(record) = latest {
            debug!(thread_id = %record.thread_id, purpose = %purpose, "resuming thread");
            return Ok(OpenedThread {
                record,
                created: false,
            });
        }

        require_assistant(assistant_id, None)?;
        let record = self.create_thread(user_id, purpose, assistant_id).await?;
        Ok(OpenedThread {
            record,
            created: true,
        })
    }

    /// Append a user message and start a run without waiting for it.
    pub async fn start_turn(
        &self,
        thread_id: &str,
        user_id: &str,
        assistant_id: &str,
        message: &str,
        additional_instructions: Option<String>,
    ) -> Result<StartedTurn> {
        require_assistant(assistant_id, Some(thread_id))?;

        let appended = self
            .client
            .create_message(thread_id, CreateMessageRequest::user(message))
            .await
            .map_err(|e| TurnError::on_thread(thread_id, e))?;
        debug!(thread_id = %thread_id, message_id = %appended.id, "user message appended");

        self.mirror(DBMessage::user(thread_id, user_id, message).with_message_id(&appended.id))
            .await;

        let mut request = CreateRunRequest::new(assistant_id);
        if let Some(instructions) = additional_instructions {
            request = request.additional_instructions(instructions);
        }
        let run = self
            .client
            .create_run(thread_id, request)
            .await
            .map_err(|e| TurnError::on_thread(thread_id, e))?;
        info!(thread_id = %thread_id, run_id = %run.id, "run started");

        Ok(StartedTurn {
            thread_id: thread_id.to_string(),
            message_id: appended.id,
            run_id: run.id,
        })
    }

    /// Poll a run until it completes, fails, needs action or the attempt
    /// budget runs out. Returns the completed run.
    pub async fn poll_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let poll = self.config.poll;
        let mut state = TurnState::AwaitingRun.run_started();

        loop {
            let run = self.check_run(thread_id, run_id).await?;
            state = state.observe(&run, poll.max_attempts);
            debug!(thread_id = %thread_id, run_id = %run_id, status = %run.status, "polled run");

            let kind = match state {
                TurnState::AwaitingRun | TurnState::Polling { .. } => {
                    self.sleeper.sleep(poll.interval).await;
                    continue;
                }
                TurnState::Completed { attempts } => {
                    debug!(run_id = %run_id, attempts, "run completed");
                    return Ok(run);
                }
                TurnState::Failed { status, last_error } => TurnErrorKind::RunFailed {
                    run_id: run_id.to_string(),
                    status,
                    last_error,
                },
                TurnState::TimedOut { attempts } => TurnErrorKind::TimedOut {
                    run_id: run_id.to_string(),
                    attempts,
                },
                TurnState::ActionRequired => TurnErrorKind::ActionRequired {
                    run_id: run_id.to_string(),
                },
            };
            warn!(thread_id = %thread_id, run_id = %run_id, error = %kind, "run did not complete");
            return Err(TurnError::on_thread(thread_id, kind));
        }
    }

    /// Single status read of a run
    pub async fn check_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.client
            .retrieve_run(thread_id, run_id)
            .await
            .map_err(|e| TurnError::on_thread(thread_id, e))
    }

    /// Newest page of vendor messages of a thread
    pub async fn remote_messages(&self, thread_id: &str, limit: Option<u32>) -> Result<MessageList> {
        let limit = limit.unwrap_or(self.config.message_limit);
        self.client
            .list_messages(thread_id, ListMessagesQuery::newest(limit))
            .await
            .map_err(|e| TurnError::on_thread(thread_id, e))
    }

    /// Most recent assistant message of a thread
    pub async fn latest_reply(&self, thread_id: &str) -> Result<ThreadMessage> {
        let page = self.remote_messages(thread_id, None).await?;
        page.latest_assistant()
            .cloned()
            .ok_or_else(|| TurnError::on_thread(thread_id, TurnErrorKind::NoReply))
    }

    async fn create_thread(
        &self,
        user_id: &str,
        purpose: ThreadPurpose,
        assistant_id: &str,
    ) -> Result<ThreadRecord> {
        let thread = self
            .client
            .create_thread()
            .await
            .map_err(|e| TurnError::new(None, e))?;
        info!(thread_id = %thread.id, user_id = %user_id, purpose = %purpose, "thread created");

        let record = ThreadRecord::new(&thread.id, user_id, purpose, assistant_id);
        if let Err(e) = self.persistence.ensure_thread(record.clone()).await {
            warn!(thread_id = %thread.id, error = %e, "failed to record thread");
        }
        Ok(record)
    }

    /// Record a caller-supplied thread once. Returns whether it was new.
    async fn adopt_thread(
        &self,
        thread_id: &str,
        user_id: &str,
        purpose: ThreadPurpose,
        assistant_id: &str,
    ) -> bool {
        let record = ThreadRecord::new(thread_id, user_id, purpose, assistant_id);
        match self.persistence.ensure_thread(record).await {
            Ok(created) => {
                if created {
                    debug!(thread_id = %thread_id, "adopted thread without local record");
                }
                created
            }
            Err(e) => {
                warn!(thread_id = %thread_id, error = %e, "failed to record thread");
                false
            }
        }
    }

    async fn mirror(&self, message: DBMessage) {
        let thread_id = message.thread_id.clone();
        if let Err(e) = self.persistence.save_message(message).await {
            warn!(thread_id = %thread_id, error = %e, "failed to mirror message");
        }
    }

    async fn store_artifacts(&self, user_id: &str, thread_id: &str, extraction: &Extraction) {
        if extraction.is_empty() {
            debug!(thread_id = %thread_id, "completed reply had no extractable artifacts");
            return;
        }

        if !extraction.content_ideas.is_empty() {
            let batch = ContentIdea::batch(user_id, thread_id, extraction.content_ideas.clone());
            if let Err(e) = self.persistence.save_content_ideas(batch).await {
                warn!(thread_id = %thread_id, error = %e, "failed to store content ideas");
            }
        }

        if let Some(map) = &extraction.mission_map {
            let stored = match serde_json::to_value(map) {
                Ok(data) => self
                    .persistence
                    .save_artifact(ArtifactDocument::new(user_id, ArtifactKind::MissionMap, data))
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            if let Err(e) = stored {
                warn!(thread_id = %thread_id, error = %e, "failed to store mission map");
            }
        }
    }
}

fn require_assistant(assistant_id: &str, thread_id: Option<&str>) -> Result<()> {
    if assistant_id.trim().is_empty() {
        return Err(TurnError::new(
            thread_id.map(str::to_string),
            TurnErrorKind::Config("assistant id is required".to_string()),
        ));
    }
    Ok(())
}
