//! Live phase of one round: clock, voting prompt and win-condition checks.
//!
//! [`SessionController`] is a plain synchronous state machine. Time only enters
//! through [`SessionController::tick`]; the async wiring lives in
//! [`crate::runtime`].

use std::{fmt, sync::Arc};

use shared::domain::{Outcome, Participant, ParticipantId, Role, RoundOutcome};
use tracing::{debug, info, warn};

use crate::{error::SessionError, round::Round};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Running,
    VoteOpen,
    /// An elimination is being shown; the clock stays suspended until it is dismissed.
    Announcing,
    Ended,
}

impl SessionState {
    pub fn clock_running(self) -> bool {
        matches!(self, SessionState::Running)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Running => "running",
            SessionState::VoteOpen => "voting",
            SessionState::Announcing => "announcing an elimination",
            SessionState::Ended => "ended",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionAction {
    OpenVote,
    CancelVote,
    CastVote,
    FinishAnnouncement,
    Reveal,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionAction::OpenVote => "open a vote",
            SessionAction::CancelVote => "cancel the vote",
            SessionAction::CastVote => "cast a vote",
            SessionAction::FinishAnnouncement => "dismiss the announcement",
            SessionAction::Reveal => "reveal the impostor",
        };
        f.write_str(label)
    }
}

/// Receives the terminal outcome of a round. Called exactly once per session.
pub trait OutcomeReporter: Send + Sync {
    fn report(&self, outcome: RoundOutcome);
}

impl<F> OutcomeReporter for F
where
    F: Fn(RoundOutcome) + Send + Sync,
{
    fn report(&self, outcome: RoundOutcome) {
        self(outcome)
    }
}

/// Result of a successful vote, used for the elimination announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elimination {
    pub participant_id: ParticipantId,
    pub name: String,
    pub role: Role,
    pub outcome: Option<Outcome>,
}

impl Elimination {
    pub fn was_impostor(&self) -> bool {
        self.role.is_impostor()
    }
}

impl fmt::Display for Elimination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.was_impostor() {
            write!(f, "{} was ejected. They were an impostor.", self.name)
        } else {
            write!(f, "{} was ejected. They were not an impostor.", self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub elapsed_seconds: u64,
    pub participants: Vec<Participant>,
    pub outcome: Option<RoundOutcome>,
}

impl SessionSnapshot {
    pub fn active_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_active())
    }
}

pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub struct SessionController {
    round: Round,
    state: SessionState,
    elapsed_seconds: u64,
    outcome: Option<RoundOutcome>,
    reporter: Arc<dyn OutcomeReporter>,
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("elapsed_seconds", &self.elapsed_seconds)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl SessionController {
    pub fn new(round: Round, reporter: Arc<dyn OutcomeReporter>) -> Self {
        info!(
            "session: round started participants={} impostors={}",
            round.participants().len(),
            round.impostor_count()
        );
        Self {
            round,
            state: SessionState::Running,
            elapsed_seconds: 0,
            outcome: None,
            reporter,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            elapsed_seconds: self.elapsed_seconds,
            participants: self.round.participants().to_vec(),
            outcome: self.outcome,
        }
    }

    /// Advances the clock by one second. Returns `false` when the tick was
    /// dropped because the clock is suspended or the round is over.
    pub fn tick(&mut self) -> bool {
        if !self.state.clock_running() {
            debug!("session: tick ignored state={}", self.state);
            return false;
        }
        self.elapsed_seconds += 1;
        true
    }

    pub fn open_vote(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::Running, SessionAction::OpenVote)?;
        self.state = SessionState::VoteOpen;
        debug!("session: vote opened at={}s", self.elapsed_seconds);
        Ok(())
    }

    pub fn cancel_vote(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::VoteOpen, SessionAction::CancelVote)?;
        self.state = SessionState::Running;
        debug!("session: vote cancelled");
        Ok(())
    }

    /// Eliminates `target` and checks whether the round is decided. A rejected
    /// vote leaves the session untouched with the prompt still open.
    pub fn cast_vote(&mut self, target: &ParticipantId) -> Result<Elimination, SessionError> {
        self.expect_state(SessionState::VoteOpen, SessionAction::CastVote)?;

        let eliminated = match self.round.eliminate(target) {
            Ok(participant) => participant.clone(),
            Err(err) => {
                warn!("session: vote rejected target={target} error={err}");
                return Err(err);
            }
        };

        let outcome = self.round.evaluate();
        let tally = self.round.tally();
        info!(
            "session: eliminated participant={} role={} active_impostors={} active_civilians={}",
            eliminated.id, eliminated.role, tally.active_impostors, tally.active_civilians
        );

        match outcome {
            Some(outcome) => {
                self.finish(outcome);
            }
            None => self.state = SessionState::Announcing,
        }

        Ok(Elimination {
            participant_id: eliminated.id,
            name: eliminated.name,
            role: eliminated.role,
            outcome,
        })
    }

    pub fn finish_announcement(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::Announcing, SessionAction::FinishAnnouncement)?;
        self.state = SessionState::Running;
        Ok(())
    }

    /// Ends the round early. The group gave up, so the impostors win.
    pub fn reveal(&mut self) -> Result<RoundOutcome, SessionError> {
        if self.state == SessionState::Ended {
            return Err(SessionError::SessionEnded);
        }
        Ok(self.finish(Outcome::Defeat))
    }

    fn finish(&mut self, outcome: Outcome) -> RoundOutcome {
        let result = RoundOutcome {
            outcome,
            elapsed_seconds: self.elapsed_seconds,
        };
        self.state = SessionState::Ended;
        self.outcome = Some(result);
        info!(
            "session: round ended outcome={outcome} elapsed={}",
            format_elapsed(self.elapsed_seconds)
        );
        self.reporter.report(result);
        result
    }

    fn expect_state(
        &self,
        expected: SessionState,
        action: SessionAction,
    ) -> Result<(), SessionError> {
        if self.state == expected {
            return Ok(());
        }
        if self.state == SessionState::Ended {
            return Err(SessionError::SessionEnded);
        }
        Err(SessionError::InvalidTransition {
            from: self.state,
            action,
        })
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
