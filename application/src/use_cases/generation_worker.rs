//! Generation worker
//!
//! The background producer of a debate session. It owns the
//! [`DebateSession`] and is the only code that commits turns to it.

use crate::cache::SessionRetrievalCache;
use crate::config::WorkerParams;
use crate::delivery::DeliveryQueue;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::language_model::{LanguageModel, ModelError};
use crate::ports::progress::DebateProgressNotifier;
use crate::ports::speech_synthesizer::{SpeechSynthesizer, SynthesisError};
use crate::session::status::{StatusTracker, TerminationReason};
use roundtable_domain::util::strip_speaker_prefix;
use roundtable_domain::{
    ContextAssembler, DebatePrompt, DebatePromptTemplate, DebateSession, RagSettings,
    RetrievalContext, Role, TurnDraft, TurnScheduler,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Final state of the worker
#[derive(Debug)]
pub struct WorkerReport {
    pub session: DebateSession,
    pub reason: TerminationReason,
}

/// Collaborators the worker calls for each turn
pub(crate) struct WorkerPorts {
    pub model: Arc<dyn LanguageModel>,
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
    pub progress: Arc<dyn DebateProgressNotifier>,
    pub logger: Arc<dyn ConversationLogger>,
}

/// Closes the queue and marks the session failed if the worker stops
/// without reaching its normal exit.
struct ExitGuard {
    queue: Arc<DeliveryQueue>,
    status: Arc<StatusTracker>,
    armed: bool,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        if self.armed {
            self.status.terminate(TerminationReason::Failed(
                "generation worker stopped unexpectedly".to_string(),
            ));
            self.queue.close();
        }
    }
}

pub(crate) struct GenerationWorker {
    session: DebateSession,
    scheduler: TurnScheduler,
    ports: WorkerPorts,
    retrieval: Option<SessionRetrievalCache>,
    rag: RagSettings,
    queue: Arc<DeliveryQueue>,
    status: Arc<StatusTracker>,
    cancel: CancellationToken,
    params: WorkerParams,
}

/// Outcome of producing one turn
struct Produced {
    draft: TurnDraft,
    model_error: Option<ModelError>,
}

impl GenerationWorker {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        session: DebateSession,
        scheduler: TurnScheduler,
        ports: WorkerPorts,
        retrieval: Option<SessionRetrievalCache>,
        rag: RagSettings,
        queue: Arc<DeliveryQueue>,
        status: Arc<StatusTracker>,
        cancel: CancellationToken,
        params: WorkerParams,
    ) -> Self {
        Self {
            session,
            scheduler,
            ports,
            retrieval,
            rag,
            queue,
            status,
            cancel,
            params,
        }
    }

    /// Produce turns until every round is done, the session is cancelled,
    /// or the failure threshold is crossed.
    pub(crate) async fn run(mut self) -> WorkerReport {
        let mut guard = ExitGuard {
            queue: Arc::clone(&self.queue),
            status: Arc::clone(&self.status),
            armed: true,
        };
        let session_id = self.session.id();
        let cancel = self.cancel.clone();

        info!(
            session = %session_id,
            topic = %self.session.topic(),
            participants = self.session.participant_count(),
            rounds = self.session.max_rounds(),
            "Debate started"
        );
        self.ports
            .progress
            .on_debate_start(self.session.total_turns());
        self.ports
            .logger
            .log(ConversationEvent::debate_started(&self.session));

        if self.params.warm_up_retrieval
            && let Some(cache) = &self.retrieval
        {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = cache.warm_up(
                    self.session.participants(),
                    self.session.topic(),
                    self.rag.max_refs_per_role,
                ) => {}
            }
        }

        let mut consecutive_failures = 0u32;
        let reason = loop {
            if cancel.is_cancelled() {
                break TerminationReason::Cancelled;
            }
            let Some(next) = self.scheduler.next_speaker(&self.session) else {
                break TerminationReason::Completed;
            };
            let Some(role) = self.session.participant(&next.role_id).cloned() else {
                break TerminationReason::Failed(format!(
                    "scheduled role {} is not a participant",
                    next.role_id
                ));
            };

            debug!(
                session = %session_id,
                order = next.order,
                round = next.round,
                role = %role.id,
                "Generating turn"
            );
            let produced = tokio::select! {
                biased;
                _ = cancel.cancelled() => break TerminationReason::Cancelled,
                produced = self.produce(&role, next.round) => produced,
            };

            match &produced.model_error {
                Some(_) => consecutive_failures += 1,
                None => consecutive_failures = 0,
            }

            let turn = self.session.commit_turn(produced.draft).clone();
            debug_assert_eq!(turn.order(), next.order);
            self.status.record_generated(turn.order());
            self.ports
                .logger
                .log(ConversationEvent::turn_generated(session_id, &turn));

            let pushed = tokio::select! {
                biased;
                _ = cancel.cancelled() => break TerminationReason::Cancelled,
                pushed = self.queue.push(turn.clone()) => pushed,
            };
            if let Err(e) = pushed {
                break TerminationReason::Failed(format!("could not deliver turn: {}", e));
            }
            self.ports.progress.on_turn_generated(&turn);

            if let Some(e) = &produced.model_error
                && self.params.failure_limit_reached(consecutive_failures)
            {
                warn!(
                    session = %session_id,
                    failures = consecutive_failures,
                    error = %e,
                    "Model failure threshold reached"
                );
                break TerminationReason::Failed(format!(
                    "{} consecutive model failures, last: {}",
                    consecutive_failures, e
                ));
            }
        };

        self.finish(&reason);
        guard.armed = false;
        WorkerReport {
            session: self.session,
            reason,
        }
    }

    fn finish(&mut self, reason: &TerminationReason) {
        self.session.mark_terminal();
        self.queue.close();
        self.status.terminate(reason.clone());

        let generated = self.session.produced();
        info!(
            session = %self.session.id(),
            generated,
            reason = %reason,
            "Debate generation finished"
        );
        self.ports
            .progress
            .on_generation_finished(reason, generated);
        self.ports.logger.log(ConversationEvent::debate_finished(
            self.session.id(),
            reason,
            generated,
        ));
    }

    /// Build one turn for `role`. Failures become an error draft.
    async fn produce(&self, role: &Role, round: u32) -> Produced {
        let retrieval = self.lookup_retrieval(role, round).await;
        let context = ContextAssembler::assemble(&self.session, role, round, retrieval);
        let prompt = DebatePromptTemplate::render(&context);

        let content = match self.generate(&prompt).await {
            Ok(text) => strip_speaker_prefix(&text, &role.name).to_string(),
            Err(e) => {
                warn!(role = %role.id, round, error = %e, "Generation failed");
                return Produced {
                    draft: TurnDraft::failed(role, e.to_string()),
                    model_error: Some(e),
                };
            }
        };
        if content.is_empty() {
            let e = ModelError::EmptyResponse;
            warn!(role = %role.id, round, "Model returned only a speaker prefix");
            return Produced {
                draft: TurnDraft::failed(role, e.to_string()),
                model_error: Some(e),
            };
        }

        let mut draft = TurnDraft::new(role, content);
        if let Some(speech) = &self.ports.speech {
            match self.synthesize(speech.as_ref(), draft.content(), &role.voice).await {
                Ok(clip) => draft = draft.with_audio(clip),
                Err(e) => warn!(role = %role.id, error = %e, "Speech synthesis failed, text only"),
            }
        }

        Produced {
            draft,
            model_error: None,
        }
    }

    async fn lookup_retrieval(&self, role: &Role, round: u32) -> RetrievalContext {
        if !self.rag.enabled {
            return RetrievalContext::Disabled;
        }
        let Some(cache) = &self.retrieval else {
            return RetrievalContext::Unavailable;
        };
        let lookup = cache
            .get(role, self.session.topic(), round, self.rag.max_refs_per_role)
            .await;
        if let Some(e) = lookup.failure() {
            self.ports.logger.log(ConversationEvent::retrieval_degraded(
                self.session.id(),
                role.id.as_str(),
                &e.to_string(),
            ));
        }
        lookup.into_context()
    }

    async fn generate(&self, prompt: &DebatePrompt) -> Result<String, ModelError> {
        let request = self.ports.model.generate(prompt);
        match self.params.generation_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .unwrap_or(Err(ModelError::Timeout)),
            None => request.await,
        }
    }

    async fn synthesize(
        &self,
        speech: &dyn SpeechSynthesizer,
        text: &str,
        voice: &str,
    ) -> Result<roundtable_domain::AudioClip, SynthesisError> {
        let request = speech.synthesize(text, voice);
        match self.params.synthesis_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .unwrap_or(Err(SynthesisError::Timeout)),
            None => request.await,
        }
    }
}
