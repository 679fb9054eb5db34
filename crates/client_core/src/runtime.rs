use std::{sync::Arc, time::Duration};

use shared::domain::{ParticipantId, RoundOutcome};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, info};

use crate::{
    error::SessionError,
    round::Round,
    session::{Elimination, OutcomeReporter, SessionController, SessionSnapshot, SessionState},
    ticker::{Tick, Ticker, TICK_PERIOD},
};

/// How long an elimination stays on screen before the clock resumes.
pub const ANNOUNCEMENT_DELAY: Duration = Duration::from_secs(3);

const COMMAND_QUEUE_DEPTH: usize = 32;

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

#[derive(Debug)]
pub enum SessionCommand {
    OpenVote { reply: Reply<()> },
    CancelVote { reply: Reply<()> },
    CastVote {
        target: ParticipantId,
        reply: Reply<Elimination>,
    },
    Reveal { reply: Reply<RoundOutcome> },
}

/// Cloneable front door to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    pub async fn open_vote(&self) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::OpenVote { reply }).await
    }

    pub async fn cancel_vote(&self) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::CancelVote { reply }).await
    }

    pub async fn cast_vote(&self, target: ParticipantId) -> Result<Elimination, SessionError> {
        self.request(|reply| SessionCommand::CastVote { target, reply }).await
    }

    pub async fn reveal(&self) -> Result<RoundOutcome, SessionError> {
        self.request(|reply| SessionCommand::Reveal { reply }).await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| SessionError::RuntimeClosed)?;
        response.await.map_err(|_| SessionError::RuntimeClosed)?
    }
}

/// Drives one [`SessionController`] from a single task.
///
/// Ticks, user commands and the end of an announcement are all consumed by one
/// `select!` loop, so transitions never interleave. The ticker runs only while
/// the controller is [`SessionState::Running`] and is released when the loop
/// exits, when every handle is dropped, or when the task is aborted.
pub struct SessionRuntime {
    controller: SessionController,
    ticker: Ticker,
    ticks: mpsc::UnboundedReceiver<Tick>,
    commands: mpsc::Receiver<SessionCommand>,
    snapshots: watch::Sender<SessionSnapshot>,
    announcement_until: Option<Instant>,
}

impl SessionRuntime {
    pub fn spawn(
        round: Round,
        reporter: Arc<dyn OutcomeReporter>,
    ) -> (SessionHandle, JoinHandle<Option<RoundOutcome>>) {
        let controller = SessionController::new(round, reporter);
        let (ticker, ticks) = Ticker::new(TICK_PERIOD);
        let (commands_tx, commands) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (snapshots, snapshots_rx) = watch::channel(controller.snapshot());

        let runtime = Self {
            controller,
            ticker,
            ticks,
            commands,
            snapshots,
            announcement_until: None,
        };
        let task = tokio::spawn(runtime.run());

        (
            SessionHandle {
                commands: commands_tx,
                snapshots: snapshots_rx,
            },
            task,
        )
    }

    async fn run(mut self) -> Option<RoundOutcome> {
        self.sync_ticker();

        loop {
            let announcement_until = self.announcement_until;
            tokio::select! {
                Some(tick) = self.ticks.recv() => {
                    if self.ticker.is_current(tick) && self.controller.tick() {
                        self.publish();
                    }
                }
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => {
                        info!("session: all handles dropped, abandoning round");
                        break;
                    }
                },
                _ = sleep_until(announcement_until.unwrap_or_else(Instant::now)), if announcement_until.is_some() => {
                    self.announcement_until = None;
                    if self.controller.finish_announcement().is_ok() {
                        self.publish();
                    }
                }
            }

            self.sync_ticker();
            if self.controller.state() == SessionState::Ended {
                break;
            }
        }

        self.ticker.pause();
        self.controller.outcome()
    }

    fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::OpenVote { reply } => {
                let result = self.controller.open_vote();
                self.publish();
                let _ = reply.send(result);
            }
            SessionCommand::CancelVote { reply } => {
                let result = self.controller.cancel_vote();
                self.publish();
                let _ = reply.send(result);
            }
            SessionCommand::CastVote { target, reply } => {
                let result = self.controller.cast_vote(&target);
                if result.is_ok() && self.controller.state() == SessionState::Announcing {
                    self.announcement_until = Some(Instant::now() + ANNOUNCEMENT_DELAY);
                }
                self.publish();
                let _ = reply.send(result);
            }
            SessionCommand::Reveal { reply } => {
                let result = self.controller.reveal();
                self.announcement_until = None;
                self.publish();
                let _ = reply.send(result);
            }
        }
    }

    fn sync_ticker(&mut self) {
        if self.controller.state().clock_running() {
            self.ticker.resume();
        } else {
            self.ticker.pause();
        }
    }

    fn publish(&self) {
        let snapshot = self.controller.snapshot();
        debug!(
            "session: state={} elapsed={}s",
            snapshot.state, snapshot.elapsed_seconds
        );
        self.snapshots.send_replace(snapshot);
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
