//! Context assembly for a single turn

use crate::debate::session::DebateSession;
use crate::retrieval::{NO_SUPPORTING_MATERIAL, RetrievalPayload};
use crate::role::entities::Role;
use std::sync::Arc;

/// Who is speaking and who they are speaking against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaDescriptor {
    pub name: String,
    pub title: String,
    pub persona: String,
    /// Display names of the other participants, in speaking order
    pub opponents: Vec<String>,
}

/// One earlier turn as shown to the next speaker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    pub order: u64,
    pub round: u32,
    pub speaker: String,
    pub content: String,
    /// The turn was a substituted error turn
    pub failed: bool,
}

/// Supporting material available to the speaking role
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalContext {
    /// Retrieval is turned off for this debate
    Disabled,
    /// Cached references for this role
    Material(Arc<RetrievalPayload>),
    /// Retrieval is on but nothing could be found or fetched
    Unavailable,
}

impl RetrievalContext {
    /// Text to place in the prompt, or `None` when retrieval is disabled
    pub fn prompt_text(&self) -> Option<&str> {
        match self {
            RetrievalContext::Disabled => None,
            RetrievalContext::Material(payload) if !payload.is_empty() => {
                Some(payload.as_prompt_text())
            }
            RetrievalContext::Material(_) | RetrievalContext::Unavailable => {
                Some(NO_SUPPORTING_MATERIAL)
            }
        }
    }

    pub fn has_material(&self) -> bool {
        matches!(self, RetrievalContext::Material(p) if !p.is_empty())
    }
}

/// Everything a role needs to produce its next turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnContext {
    pub topic: String,
    pub round: u32,
    pub max_rounds: u32,
    pub persona: PersonaDescriptor,
    /// Trailing window of the transcript, oldest first
    pub history: Vec<HistoryLine>,
    pub retrieval: RetrievalContext,
}

impl TurnContext {
    /// No one has spoken yet
    pub fn is_opening(&self) -> bool {
        self.history.is_empty()
    }

    pub fn is_final_round(&self) -> bool {
        self.round >= self.max_rounds
    }
}

/// Builds [`TurnContext`]s.
///
/// Pure: reads the session and the supplied retrieval context and
/// nothing else.
pub struct ContextAssembler;

impl ContextAssembler {
    /// Number of trailing turns included for `participants` roles
    pub fn history_window(participants: usize) -> usize {
        2 * participants
    }

    pub fn assemble(
        session: &DebateSession,
        role: &Role,
        round: u32,
        retrieval: RetrievalContext,
    ) -> TurnContext {
        let window = Self::history_window(session.participant_count());
        let history = session
            .recent_turns(window)
            .iter()
            .map(|turn| HistoryLine {
                order: turn.order(),
                round: turn.round(),
                speaker: turn.speaker().to_string(),
                content: turn.content().to_string(),
                failed: turn.is_error(),
            })
            .collect();

        let opponents = session
            .participants()
            .iter()
            .filter(|p| p.id != role.id)
            .map(|p| p.name.clone())
            .collect();

        TurnContext {
            topic: session.topic().to_string(),
            round,
            max_rounds: session.max_rounds(),
            persona: PersonaDescriptor {
                name: role.name.clone(),
                title: role.title.clone(),
                persona: role.persona.clone(),
                opponents,
            },
            history,
            retrieval,
        }
    }
}
