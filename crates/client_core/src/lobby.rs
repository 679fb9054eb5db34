use shared::domain::{Participant, ParticipantId, Role, RoundData};
use tracing::info;

use crate::{error::SessionError, round::Round};

/// What a player sees when they privately check their assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCard {
    pub name: String,
    /// `None` in blind mode, where players only learn their word.
    pub role: Option<Role>,
    pub word: Option<String>,
}

/// Waiting room between role assignment and the start of the round.
#[derive(Debug, Clone)]
pub struct Lobby {
    participants: Vec<Participant>,
    impostor_count: usize,
    blind: bool,
}

impl Lobby {
    pub fn new(data: RoundData, blind: bool) -> Self {
        let participants = data
            .participants
            .into_iter()
            .map(|participant| Participant {
                ready: false,
                eliminated: false,
                ..participant
            })
            .collect();
        Self {
            participants,
            impostor_count: data.impostor_count,
            blind,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn is_blind(&self) -> bool {
        self.blind
    }

    pub fn reveal(&self, id: &ParticipantId) -> Result<RoleCard, SessionError> {
        let participant = self.find(id)?;
        Ok(RoleCard {
            name: participant.name.clone(),
            role: (!self.blind).then_some(participant.role),
            word: participant.word.clone(),
        })
    }

    pub fn mark_ready(&mut self, id: &ParticipantId) -> Result<(), SessionError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;
        participant.ready = true;
        Ok(())
    }

    pub fn ready_count(&self) -> usize {
        self.participants.iter().filter(|p| p.ready).count()
    }

    pub fn all_ready(&self) -> bool {
        !self.participants.is_empty() && self.ready_count() == self.participants.len()
    }

    pub fn start(self) -> Result<Round, SessionError> {
        if !self.all_ready() {
            return Err(SessionError::NotReady {
                ready: self.ready_count(),
                total: self.participants.len(),
            });
        }
        info!("lobby: all {} players ready", self.participants.len());
        Round::new(self.participants, self.impostor_count)
    }

    fn find(&self, id: &ParticipantId) -> Result<&Participant, SessionError> {
        self.participants
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }
}

#[cfg(test)]
#[path = "tests/lobby_tests.rs"]
mod tests;
