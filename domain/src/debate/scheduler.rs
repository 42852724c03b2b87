//! Round-robin turn scheduler
//!
//! The speaker for the next turn is `participants[produced % P]`; the
//! scheduler terminates once `produced == max_rounds * P`.

use super::session::{DebateSession, round_for_order};
use super::settings::validate_rounds;
use crate::core::error::{ConfigError, MAX_PARTICIPANTS, MIN_PARTICIPANTS};
use crate::role::entities::RoleId;
use serde::{Deserialize, Serialize};

/// State of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    Active,
    Terminated,
}

impl SchedulerState {
    pub fn as_str(&self) -> &str {
        match self {
            SchedulerState::Active => "active",
            SchedulerState::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The position and speaker of the turn about to be generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTurn {
    pub role_id: RoleId,
    /// Generation order the turn will be committed with
    pub order: u64,
    pub round: u32,
}

/// Strict round-robin scheduler.
///
/// Never skips or reorders a participant. A failed turn still counts as
/// produced, so one role's failure cannot stall the rotation.
#[derive(Debug, Clone)]
pub struct TurnScheduler {
    participants: Vec<RoleId>,
    max_rounds: u32,
    state: SchedulerState,
}

impl TurnScheduler {
    pub fn new(participants: Vec<RoleId>, max_rounds: u32) -> Result<Self, ConfigError> {
        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&participants.len()) {
            return Err(ConfigError::ParticipantCount(participants.len()));
        }
        validate_rounds(max_rounds)?;
        Ok(Self {
            participants,
            max_rounds,
            state: SchedulerState::Active,
        })
    }

    pub fn for_session(session: &DebateSession) -> Result<Self, ConfigError> {
        Self::new(session.participant_ids(), session.max_rounds())
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SchedulerState::Active
    }

    pub fn total_turns(&self) -> u64 {
        self.max_rounds as u64 * self.participants.len() as u64
    }

    /// Pick the speaker of the next turn given how many turns the session
    /// has already produced.
    ///
    /// Returns `None`, and moves to [`SchedulerState::Terminated`], once
    /// every round is complete.
    pub fn next_after(&mut self, produced: u64) -> Option<ScheduledTurn> {
        if self.state == SchedulerState::Terminated {
            return None;
        }
        if produced >= self.total_turns() {
            self.state = SchedulerState::Terminated;
            return None;
        }

        let count = self.participants.len();
        let index = (produced % count as u64) as usize;
        let order = produced + 1;
        Some(ScheduledTurn {
            role_id: self.participants[index].clone(),
            order,
            round: round_for_order(order, count),
        })
    }

    /// Pick the speaker of the next turn of `session`.
    pub fn next_speaker(&mut self, session: &DebateSession) -> Option<ScheduledTurn> {
        self.next_after(session.produced())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::topic::Topic;
    use crate::debate::turn::TurnDraft;
    use crate::role::entities::Role;

    fn ids(list: &[&str]) -> Vec<RoleId> {
        list.iter().map(|s| RoleId::from(*s)).collect()
    }

    #[test]
    fn test_rejects_participant_counts() {
        assert_eq!(
            TurnScheduler::new(ids(&["a", "b"]), 2).unwrap_err(),
            ConfigError::ParticipantCount(2)
        );
        assert_eq!(
            TurnScheduler::new(ids(&["a", "b", "c", "d", "e", "f", "g"]), 2).unwrap_err(),
            ConfigError::ParticipantCount(7)
        );
        assert!(TurnScheduler::new(ids(&["a", "b", "c"]), 2).is_ok());
        assert!(TurnScheduler::new(ids(&["a", "b", "c", "d", "e", "f"]), 2).is_ok());
    }

    #[test]
    fn test_three_roles_two_rounds_sequence() {
        let mut scheduler = TurnScheduler::new(ids(&["A", "B", "C"]), 2).unwrap();
        let mut sequence = Vec::new();
        let mut produced = 0;
        while let Some(next) = scheduler.next_after(produced) {
            sequence.push(format!("{}{}", next.role_id, next.round));
            assert_eq!(next.order, produced + 1);
            produced += 1;
        }
        assert_eq!(sequence, vec!["A1", "B1", "C1", "A2", "B2", "C2"]);
        assert_eq!(scheduler.state(), SchedulerState::Terminated);
    }

    #[test]
    fn test_exactly_p_times_r_turns_for_all_sizes() {
        let all = ["a", "b", "c", "d", "e", "f"];
        for p in 3..=6 {
            for r in 2..=8u32 {
                let participants = ids(&all[..p]);
                let mut scheduler = TurnScheduler::new(participants.clone(), r).unwrap();
                let mut produced = 0u64;
                while let Some(next) = scheduler.next_after(produced) {
                    // turn k is spoken by roles[(k-1) mod P]
                    let expected = &participants[((next.order - 1) % p as u64) as usize];
                    assert_eq!(&next.role_id, expected);
                    produced += 1;
                }
                assert_eq!(produced, p as u64 * r as u64);
                assert!(!scheduler.is_active());
            }
        }
    }

    #[test]
    fn test_terminated_is_sticky() {
        let mut scheduler = TurnScheduler::new(ids(&["a", "b", "c"]), 2).unwrap();
        assert!(scheduler.next_after(6).is_none());
        assert!(scheduler.next_after(0).is_none());
        assert_eq!(scheduler.state(), SchedulerState::Terminated);
    }

    #[test]
    fn test_next_speaker_follows_session() {
        let roles: Vec<Role> = ["a", "b", "c"]
            .iter()
            .map(|id| Role::new(*id, id.to_uppercase(), "persona", "alex"))
            .collect();
        let mut session = DebateSession::new(Topic::new("t").unwrap(), roles, 2).unwrap();
        let mut scheduler = TurnScheduler::for_session(&session).unwrap();

        let first = scheduler.next_speaker(&session).unwrap();
        assert_eq!(first.role_id.as_str(), "a");
        let role = session.participant(&first.role_id).unwrap().clone();
        session.commit_turn(TurnDraft::new(&role, "hello"));

        let second = scheduler.next_speaker(&session).unwrap();
        assert_eq!(second.role_id.as_str(), "b");
        assert_eq!(second.order, 2);
    }
}
