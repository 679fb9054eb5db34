use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A clock tick. The generation identifies which run of the ticker produced it,
/// so ticks queued before a pause can be told apart from fresh ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Periodic tick source backed by a spawned tokio task.
///
/// The task only exists while the ticker is running: [`Ticker::pause`] aborts it
/// and [`Drop`] does the same, so no periodic callback outlives its owner.
/// [`Ticker::resume`] must be called from within a tokio runtime.
pub struct Ticker {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                period,
                tx,
                generation: 0,
                task: None,
            },
            rx,
        )
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `tick` came from the currently running generation.
    pub fn is_current(&self, tick: Tick) -> bool {
        self.is_running() && tick.generation == self.generation
    }

    /// Starts a new generation. The first tick arrives one full period later.
    /// Calling this while already running does nothing.
    pub fn resume(&mut self) {
        if self.is_running() {
            return;
        }

        self.generation += 1;
        let generation = self.generation;
        let period = self.period;
        let tx = self.tx.clone();
        debug!("ticker: resumed generation={generation}");

        self.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    pub fn pause(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("ticker: paused generation={}", self.generation);
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.pause();
    }
}

#[cfg(test)]
#[path = "tests/ticker_tests.rs"]
mod tests;
