//! Run Debate use case
//!
//! Validates the request, seeds a session and starts its two tasks: the
//! generation worker and the playback controller, joined only by the
//! delivery queue.

use crate::cache::RetrievalCache;
use crate::config::WorkerParams;
use crate::delivery::{DeliveryQueue, PlaybackController};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::language_model::LanguageModel;
use crate::ports::presentation_sink::PresentationSink;
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::ports::speech_synthesizer::SpeechSynthesizer;
use crate::session::handle::SessionHandle;
use crate::session::status::StatusTracker;
use crate::use_cases::generation_worker::{GenerationWorker, WorkerPorts};
use roundtable_domain::{
    ConfigError, DebateSession, RagSettings, RoleId, RoleRegistry, Topic, TurnScheduler,
    validate_rounds,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Rounds used when the caller does not pick a number
pub const DEFAULT_ROUNDS: u32 = 3;

/// Errors that prevent a debate from starting
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("Invalid debate configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("start_debate must be called from within a tokio runtime")]
    NoRuntime,
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    /// The debate topic
    pub topic: String,
    /// Number of rounds, each participant speaks once per round
    pub max_rounds: u32,
    /// Participants in speaking order
    pub roles: Vec<RoleId>,
    /// Supporting reference settings
    pub rag: RagSettings,
    /// Attach synthesized audio to each turn
    pub tts_enabled: bool,
    /// Token to link the session's cancellation to
    pub cancellation: Option<CancellationToken>,
}

impl RunDebateInput {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            max_rounds: DEFAULT_ROUNDS,
            roles: RoleRegistry::default_participants(),
            rag: RagSettings::default(),
            tts_enabled: false,
            cancellation: None,
        }
    }

    pub fn with_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RoleId>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rag(mut self, rag: RagSettings) -> Self {
        self.rag = rag;
        self
    }

    pub fn with_tts(mut self, enabled: bool) -> Self {
        self.tts_enabled = enabled;
        self
    }

    /// Cancel the session when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Use case for running a debate
pub struct RunDebateUseCase {
    registry: Arc<RoleRegistry>,
    model: Arc<dyn LanguageModel>,
    retrieval: Option<Arc<RetrievalCache>>,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
    progress: Arc<dyn DebateProgressNotifier>,
    logger: Arc<dyn ConversationLogger>,
    params: WorkerParams,
}

impl RunDebateUseCase {
    pub fn new(registry: Arc<RoleRegistry>, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            registry,
            model,
            retrieval: None,
            speech: None,
            progress: Arc::new(NoProgress),
            logger: Arc::new(NoConversationLogger),
            params: WorkerParams::default(),
        }
    }

    /// Share `cache` across every session started by this use case
    pub fn with_retrieval(mut self, cache: Arc<RetrievalCache>) -> Self {
        self.retrieval = Some(cache);
        self
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn DebateProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_params(mut self, params: WorkerParams) -> Self {
        self.params = params;
        self
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// Validate `input` and start the session in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_debate(
        &self,
        input: RunDebateInput,
        sink: Arc<dyn PresentationSink>,
    ) -> Result<SessionHandle, RunDebateError> {
        let topic = Topic::new(input.topic)?;
        validate_rounds(input.max_rounds)?;
        input.rag.validate()?;
        let participants = self.registry.resolve(&input.roles)?;
        let session = DebateSession::new(topic, participants, input.max_rounds)?;
        let scheduler = TurnScheduler::for_session(&session)?;
        let queue = Arc::new(DeliveryQueue::new(self.params.queue_capacity)?);
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| RunDebateError::NoRuntime)?;

        let cancel = match input.cancellation {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        let status = Arc::new(StatusTracker::new(session.total_turns()));

        let retrieval = match (&self.retrieval, input.rag.enabled) {
            (Some(cache), true) => Some(cache.session(session.id())),
            (None, true) => {
                warn!("Retrieval enabled without a provider; every role argues unsupported");
                None
            }
            (_, false) => None,
        };
        let speech = if input.tts_enabled {
            if self.speech.is_none() {
                warn!("Speech enabled without a synthesizer; turns will be text only");
            }
            self.speech.clone()
        } else {
            None
        };

        let session_id = session.id();
        info!(
            session = %session_id,
            total_turns = session.total_turns(),
            rag = input.rag.enabled,
            tts = speech.is_some(),
            model = self.model.name(),
            "Starting debate session"
        );

        let worker = GenerationWorker::new(
            session,
            scheduler,
            WorkerPorts {
                model: Arc::clone(&self.model),
                speech,
                progress: Arc::clone(&self.progress),
                logger: Arc::clone(&self.logger),
            },
            retrieval,
            input.rag,
            Arc::clone(&queue),
            Arc::clone(&status),
            cancel.clone(),
            self.params.clone(),
        );
        let playback = PlaybackController::new(
            queue,
            sink,
            Arc::clone(&status),
            Arc::clone(&self.progress),
            cancel.clone(),
            self.params.poll_interval,
        );

        let worker = runtime.spawn(worker.run());
        let playback = runtime.spawn(playback.run());

        Ok(SessionHandle::new(
            session_id, status, cancel, worker, playback,
        ))
    }
}
