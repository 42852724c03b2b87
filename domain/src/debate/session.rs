//! Debate session entity

use super::settings::validate_rounds;
use super::turn::{Turn, TurnDraft};
use crate::core::error::{ConfigError, MAX_PARTICIPANTS, MIN_PARTICIPANTS};
use crate::core::topic::Topic;
use crate::role::entities::{Role, RoleId};
use serde::{Deserialize, Serialize};

/// Unique identifier of a debate session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Round that the turn with generation order `order` belongs to.
///
/// `round = (order - 1) / participants + 1` for 1-based orders.
pub fn round_for_order(order: u64, participants: usize) -> u32 {
    debug_assert!(order >= 1 && participants > 0);
    ((order.saturating_sub(1)) / participants as u64 + 1) as u32
}

/// One debate invocation (Entity)
///
/// Holds the participants in speaking order and the transcript. Only the
/// generation worker mutates a session; every other reader sees snapshots
/// of committed turns.
#[derive(Debug, Clone)]
pub struct DebateSession {
    id: SessionId,
    topic: Topic,
    max_rounds: u32,
    participants: Vec<Role>,
    transcript: Vec<Turn>,
    terminal: bool,
}

impl DebateSession {
    pub fn new(topic: Topic, participants: Vec<Role>, max_rounds: u32) -> Result<Self, ConfigError> {
        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&participants.len()) {
            return Err(ConfigError::ParticipantCount(participants.len()));
        }
        validate_rounds(max_rounds)?;

        Ok(Self {
            id: SessionId::new(),
            topic,
            max_rounds,
            participants,
            transcript: Vec::new(),
            terminal: false,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn participants(&self) -> &[Role] {
        &self.participants
    }

    pub fn participant_ids(&self) -> Vec<RoleId> {
        self.participants.iter().map(|r| r.id.clone()).collect()
    }

    pub fn participant(&self, id: &RoleId) -> Option<&Role> {
        self.participants.iter().find(|r| &r.id == id)
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Number of turns a complete session produces
    pub fn total_turns(&self) -> u64 {
        self.max_rounds as u64 * self.participants.len() as u64
    }

    /// Number of committed turns, which is also the highest committed order
    pub fn produced(&self) -> u64 {
        self.transcript.len() as u64
    }

    /// Round of the most recently committed turn (0 before the first turn)
    pub fn current_round(&self) -> u32 {
        match self.produced() {
            0 => 0,
            order => round_for_order(order, self.participant_count()),
        }
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// The last `n` committed turns in chronological order
    pub fn recent_turns(&self, n: usize) -> &[Turn] {
        let start = self.transcript.len().saturating_sub(n);
        &self.transcript[start..]
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn mark_terminal(&mut self) {
        self.terminal = true;
    }

    /// Commit a draft as the next turn.
    ///
    /// The generation order and round are assigned here, together, from
    /// the transcript length, so `transcript.len() == highest order` holds
    /// after every commit.
    pub fn commit_turn(&mut self, draft: TurnDraft) -> &Turn {
        let order = self.produced() + 1;
        let round = round_for_order(order, self.participant_count());
        self.transcript.push(Turn::from_draft(order, round, draft));
        &self.transcript[self.transcript.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(n: usize) -> Vec<Role> {
        (0..n)
            .map(|i| Role::new(format!("r{i}"), format!("Role {i}"), "persona", "alex"))
            .collect()
    }

    fn session(n: usize, rounds: u32) -> DebateSession {
        DebateSession::new(Topic::new("topic").unwrap(), roles(n), rounds).unwrap()
    }

    #[test]
    fn test_round_for_order() {
        assert_eq!(round_for_order(1, 3), 1);
        assert_eq!(round_for_order(3, 3), 1);
        assert_eq!(round_for_order(4, 3), 2);
        assert_eq!(round_for_order(12, 6), 2);
        assert_eq!(round_for_order(13, 6), 3);
    }

    #[test]
    fn test_rejects_participant_count() {
        let err = DebateSession::new(Topic::new("t").unwrap(), roles(2), 3).unwrap_err();
        assert_eq!(err, ConfigError::ParticipantCount(2));
        let err = DebateSession::new(Topic::new("t").unwrap(), roles(7), 3).unwrap_err();
        assert_eq!(err, ConfigError::ParticipantCount(7));
    }

    #[test]
    fn test_rejects_round_count() {
        let err = DebateSession::new(Topic::new("t").unwrap(), roles(3), 1).unwrap_err();
        assert_eq!(err, ConfigError::RoundCount(1));
    }

    #[test]
    fn test_commit_assigns_order_and_round() {
        let mut s = session(3, 2);
        let participants = s.participants().to_vec();
        for (i, role) in participants.iter().cycle().take(4).enumerate() {
            let turn = s.commit_turn(TurnDraft::new(role, format!("turn {i}")));
            assert_eq!(turn.order(), i as u64 + 1);
        }
        assert_eq!(s.produced(), 4);
        assert_eq!(s.transcript()[2].round(), 1);
        assert_eq!(s.transcript()[3].round(), 2);
        assert_eq!(s.current_round(), 2);
        assert_eq!(s.total_turns(), 6);
    }

    #[test]
    fn test_recent_turns_window() {
        let mut s = session(3, 2);
        assert!(s.recent_turns(6).is_empty());
        let participants = s.participants().to_vec();
        for role in participants.iter().cycle().take(5) {
            s.commit_turn(TurnDraft::new(role, "x"));
        }
        let window = s.recent_turns(2);
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].order(), 4);
        assert_eq!(window[1].order(), 5);
        assert_eq!(s.recent_turns(10).len(), 5);
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(session(3, 2).id(), session(3, 2).id());
    }
}
