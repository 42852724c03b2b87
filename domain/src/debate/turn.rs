//! Turn entity

use crate::role::entities::{Role, RoleId};
use serde::{Deserialize, Serialize};

/// Synthesized speech attached to a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    /// Encoded audio. Not serialized with the transcript.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Container/codec, e.g. "mp3"
    pub format: String,
    /// Playback length in seconds
    pub duration_secs: f64,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, format: impl Into<String>, duration_secs: f64) -> Self {
        Self {
            bytes,
            format: format.into(),
            duration_secs,
        }
    }
}

/// One role's single contribution at a fixed position in the debate.
///
/// Immutable once created. `order` is the 1-based generation order and is
/// unique within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    order: u64,
    role_id: RoleId,
    speaker: String,
    round: u32,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    audio: Option<AudioClip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure: Option<String>,
}

impl Turn {
    pub fn new(
        order: u64,
        role: &Role,
        round: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            order,
            role_id: role.id.clone(),
            speaker: role.name.clone(),
            round,
            content: content.into(),
            audio: None,
            failure: None,
        }
    }

    pub(crate) fn from_draft(order: u64, round: u32, draft: TurnDraft) -> Self {
        Self {
            order,
            role_id: draft.role_id,
            speaker: draft.speaker,
            round,
            content: draft.content,
            audio: draft.audio,
            failure: draft.failure,
        }
    }

    pub fn order(&self) -> u64 {
        self.order
    }

    pub fn role_id(&self) -> &RoleId {
        &self.role_id
    }

    /// Display name of the role that produced this turn
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn audio(&self) -> Option<&AudioClip> {
        self.audio.as_ref()
    }

    /// Why generation failed, if this is a substituted error turn
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.failure.is_some()
    }
}

/// Content of a turn before it has been assigned a position.
///
/// The session turns a draft into a [`Turn`] when it commits it, so the
/// order and round are always assigned by the session and never by the
/// caller.
#[derive(Debug, Clone)]
pub struct TurnDraft {
    role_id: RoleId,
    speaker: String,
    content: String,
    audio: Option<AudioClip>,
    failure: Option<String>,
}

impl TurnDraft {
    pub fn new(role: &Role, content: impl Into<String>) -> Self {
        Self {
            role_id: role.id.clone(),
            speaker: role.name.clone(),
            content: content.into(),
            audio: None,
            failure: None,
        }
    }

    /// A substituted turn for a role whose generation failed.
    pub fn failed(role: &Role, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            role_id: role.id.clone(),
            speaker: role.name.clone(),
            content: format!("{} is unable to respond right now.", role.name),
            audio: None,
            failure: Some(reason),
        }
    }

    pub fn with_audio(mut self, audio: AudioClip) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn role_id(&self) -> &RoleId {
        &self.role_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_error(&self) -> bool {
        self.failure.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role() -> Role {
        Role::new("economist", "Economist", "persona", "david")
    }

    #[test]
    fn test_failed_draft_is_attributed_to_role() {
        let draft = TurnDraft::failed(&role(), "model timed out");
        assert!(draft.is_error());
        assert!(draft.content().contains("Economist"));
        let turn = Turn::from_draft(4, 2, draft);
        assert_eq!(turn.failure(), Some("model timed out"));
        assert_eq!(turn.role_id().as_str(), "economist");
    }

    #[test]
    fn test_turn_json_omits_audio_bytes() {
        let draft = TurnDraft::new(&role(), "Costs matter.")
            .with_audio(AudioClip::new(vec![1, 2, 3], "mp3", 2.5));
        let turn = Turn::from_draft(1, 1, draft);
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["order"], 1);
        assert_eq!(json["speaker"], "Economist");
        assert_eq!(json["audio"]["format"], "mp3");
        assert!(json["audio"].get("bytes").is_none());
        assert!(json.get("failure").is_none());
    }
}
