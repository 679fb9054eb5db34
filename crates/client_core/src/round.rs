use std::collections::HashSet;

use shared::domain::{Outcome, Participant, ParticipantId, Role, RoundData};
use tracing::warn;

use crate::error::SessionError;

/// Active role counts, always derived from the participant list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleTally {
    pub active_impostors: usize,
    pub active_civilians: usize,
}

impl RoleTally {
    pub fn active_total(&self) -> usize {
        self.active_impostors + self.active_civilians
    }
}

pub fn tally(participants: &[Participant]) -> RoleTally {
    participants
        .iter()
        .filter(|participant| participant.is_active())
        .fold(RoleTally::default(), |mut tally, participant| {
            match participant.role {
                Role::Impostor => tally.active_impostors += 1,
                Role::Civil => tally.active_civilians += 1,
            }
            tally
        })
}

/// Evaluates the win condition against the current participant list.
///
/// Civilians win once no impostor is left; impostors win once they are at least
/// as many as the remaining civilians. A configured impostor count of zero never
/// produces an outcome.
pub fn evaluate(participants: &[Participant], impostor_count: usize) -> Option<Outcome> {
    if impostor_count == 0 {
        return None;
    }

    let tally = tally(participants);
    if tally.active_impostors == 0 {
        return Some(Outcome::Victory);
    }
    if tally.active_civilians <= tally.active_impostors {
        return Some(Outcome::Defeat);
    }
    None
}

/// The participants of one round, in join order, plus its fixed impostor count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    participants: Vec<Participant>,
    impostor_count: usize,
}

impl Round {
    pub fn new(participants: Vec<Participant>, impostor_count: usize) -> Result<Self, SessionError> {
        let participant_count = participants.len();
        if impostor_count == 0 || impostor_count >= participant_count {
            return Err(SessionError::invalid_configuration(format!(
                "impostor count must be between 1 and {} for {participant_count} participants, got {impostor_count}",
                participant_count.saturating_sub(1)
            )));
        }

        let mut seen = HashSet::with_capacity(participant_count);
        for participant in &participants {
            if !seen.insert(&participant.id) {
                return Err(SessionError::invalid_configuration(format!(
                    "participant id {} appears more than once",
                    participant.id
                )));
            }
        }

        let assigned_impostors = participants
            .iter()
            .filter(|participant| participant.role.is_impostor())
            .count();
        if assigned_impostors != impostor_count {
            warn!(
                "round: configured impostors={impostor_count} but assigned impostors={assigned_impostors}"
            );
        }

        Ok(Self {
            participants,
            impostor_count,
        })
    }

    pub fn from_data(data: RoundData) -> Result<Self, SessionError> {
        Self::new(data.participants, data.impostor_count)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn active_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_active())
    }

    pub fn impostors(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.role.is_impostor())
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub fn impostor_count(&self) -> usize {
        self.impostor_count
    }

    pub fn tally(&self) -> RoleTally {
        tally(&self.participants)
    }

    pub fn evaluate(&self) -> Option<Outcome> {
        evaluate(&self.participants, self.impostor_count)
    }

    /// Marks a participant eliminated. Eliminations are permanent, so a second
    /// attempt on the same participant is rejected and changes nothing.
    pub fn eliminate(&mut self, id: &ParticipantId) -> Result<&Participant, SessionError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;

        if participant.eliminated {
            return Err(SessionError::AlreadyEliminated(id.clone()));
        }

        participant.eliminated = true;
        Ok(participant)
    }
}

#[cfg(test)]
#[path = "tests/round_tests.rs"]
mod tests;
