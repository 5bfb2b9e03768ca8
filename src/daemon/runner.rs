//! Single-timeline driver for the timer engine.
//!
//! One task owns the engine and multiplexes three sources:
//! - queued commands, handled in arrival order
//! - a one-second ticker, polled only while the countdown runs
//! - the deadline of a scheduled auto-start
//!
//! Completion handling runs inside a tick, so a command queued behind a
//! completion always sees the next mode already armed.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, sleep_until, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::control::{Command, ControlAdapter, ControlError, StatusReport};
use super::timer::TimerEngine;

/// Countdown resolution.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Capacity of the command queue.
const COMMAND_QUEUE_SIZE: usize = 32;

/// Placeholder deadline for a disabled auto-start branch.
const IDLE_DEADLINE: Duration = Duration::from_secs(86_400);

/// Result of a command sent through a [`TimerHandle`].
pub type CommandResult = Result<StatusReport, ControlError>;

/// Errors from talking to the runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The runner has stopped
    #[error("timer runner is not running")]
    Closed,
}

/// A command with an optional reply channel.
#[derive(Debug)]
pub struct ControlRequest {
    command: Command,
    reply: Option<oneshot::Sender<CommandResult>>,
}

// ============================================================================
// TimerHandle
// ============================================================================

/// Cloneable handle for sending commands to a running [`TimerRunner`].
#[derive(Debug, Clone)]
pub struct TimerHandle {
    tx: mpsc::Sender<ControlRequest>,
}

impl TimerHandle {
    /// Sends `command` and waits for it to be applied.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Closed` if the runner has stopped.
    pub async fn send(&self, command: Command) -> Result<CommandResult, RunnerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ControlRequest {
                command,
                reply: Some(reply),
            })
            .await
            .map_err(|_| RunnerError::Closed)?;
        rx.await.map_err(|_| RunnerError::Closed)
    }

    /// Queues `command` without waiting for the result.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Closed` if the runner has stopped.
    pub async fn post(&self, command: Command) -> Result<(), RunnerError> {
        self.tx
            .send(ControlRequest {
                command,
                reply: None,
            })
            .await
            .map_err(|_| RunnerError::Closed)
    }
}

// ============================================================================
// TimerRunner
// ============================================================================

/// Owns the engine and drives it from commands, ticks and auto-start
/// deadlines.
#[derive(Debug)]
pub struct TimerRunner {
    engine: TimerEngine,
    control: ControlAdapter,
    commands: mpsc::Receiver<ControlRequest>,
}

impl TimerRunner {
    /// Creates a runner and the handle used to control it.
    pub fn new(engine: TimerEngine, control: ControlAdapter) -> (Self, TimerHandle) {
        let (tx, commands) = mpsc::channel(COMMAND_QUEUE_SIZE);
        let runner = Self {
            engine,
            control,
            commands,
        };
        (runner, TimerHandle { tx })
    }

    /// Runs until every [`TimerHandle`] is dropped, then returns the engine.
    ///
    /// This method should be spawned as a separate tokio task or raced
    /// against a shutdown signal.
    pub async fn run(mut self) -> TimerEngine {
        let mut ticker = interval(TICK_PERIOD);
        // Late ticks are caught up so the countdown keeps wall-clock pace.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
        let mut auto_start_at: Option<Instant> = None;

        info!("Timer runner started");
        loop {
            let running = self.engine.state().is_running();
            let deadline = auto_start_at.unwrap_or_else(|| Instant::now() + IDLE_DEADLINE);

            tokio::select! {
                biased;

                request = self.commands.recv() => {
                    let Some(ControlRequest { command, reply }) = request else {
                        break;
                    };
                    debug!("Command: {:?}", command);
                    let result = self.control.apply(&mut self.engine, command);
                    if !running && self.engine.state().is_running() {
                        ticker.reset();
                    }
                    if let Some(reply) = reply {
                        let _ = reply.send(result);
                    }
                }

                _ = ticker.tick(), if running => {
                    let task = self.control.current_task().cloned();
                    self.engine.tick(task.as_ref());
                }

                _ = sleep_until(deadline), if auto_start_at.is_some() => {
                    auto_start_at = None;
                    if self.engine.fire_auto_start() {
                        ticker.reset();
                    }
                }
            }

            auto_start_at = match self.engine.pending_auto_start() {
                Some(delay) => Some(auto_start_at.unwrap_or_else(|| Instant::now() + delay)),
                None => None,
            };
        }

        info!("Timer runner stopped");
        self.engine
    }
}
