//! Async driver for a game session.
//!
//! One tokio task owns the [`GameSession`]. Each loop iteration waits for
//! whichever comes first: the next command or the gravity deadline. The
//! deadline is rebuilt from the session's timer on every iteration, so there
//! is never more than one pending sleep, and a command or gravity step always
//! runs to completion before the next one starts.
//!
//! Observations travel on a bounded channel. While it is full the engine keeps
//! running but holds observations back; the session's event queue carries the
//! events over, and the latest state is sent as soon as the reader makes room.

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant};

use tetra_quest_core::{GameSession, Observation, PieceSource};
use tetra_quest_types::Command;

use crate::config::EngineConfig;

/// Errors from talking to a running engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("engine task has stopped")]
    Closed,
    #[error("command queue is full")]
    Busy,
}

/// Handle to a spawned engine task
#[derive(Debug)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
    observations: mpsc::Receiver<Observation>,
    task: JoinHandle<GameSession>,
}

impl EngineHandle {
    /// Queue a command, waiting for room.
    pub async fn send(&self, command: Command) -> Result<(), EngineError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| EngineError::Closed)
    }

    /// Queue a command without waiting.
    pub fn try_send(&self, command: Command) -> Result<(), EngineError> {
        self.commands.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => EngineError::Busy,
            TrySendError::Closed(_) => EngineError::Closed,
        })
    }

    /// Wait for the next observation; `None` once the engine has stopped.
    pub async fn next_observation(&mut self) -> Option<Observation> {
        self.observations.recv().await
    }

    pub fn try_next_observation(&mut self) -> Option<Observation> {
        self.observations.try_recv().ok()
    }

    /// Stop the engine and hand back the final session.
    ///
    /// Commands already queued are applied first.
    pub async fn shutdown(self) -> Result<GameSession, EngineError> {
        let Self { commands, task, .. } = self;
        drop(commands);
        task.await.map_err(|_| EngineError::Closed)
    }
}

/// Spawn an engine with a fresh uniform-random session.
pub fn spawn_engine(config: &EngineConfig) -> EngineHandle {
    let session = GameSession::with_source(PieceSource::uniform(config.seed));
    spawn_engine_with(session, config)
}

/// Spawn an engine around an existing session.
pub fn spawn_engine_with(session: GameSession, config: &EngineConfig) -> EngineHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(config.max_pending_commands.max(1));
    let (obs_tx, obs_rx) = mpsc::channel::<Observation>(config.max_pending_observations.max(1));

    let task = tokio::spawn(run_engine(session, cmd_rx, obs_tx));

    EngineHandle {
        commands: cmd_tx,
        observations: obs_rx,
        task,
    }
}

/// Engine loop. Runs until the command channel closes, then returns the session.
///
/// An observation is published once up front and after every command or
/// gravity wake-up, unless the reader is behind (see the module docs). A
/// dropped observation receiver does not stop the engine.
pub async fn run_engine(
    mut session: GameSession,
    mut commands: mpsc::Receiver<Command>,
    observations: mpsc::Sender<Observation>,
) -> GameSession {
    eprintln!("[Engine] started ({})", session.status().as_str());
    let mut held_back = !publish(&mut session, &observations);

    let mut clock = Instant::now();

    loop {
        let deadline = session
            .gravity_remaining_ms()
            .map(|ms| clock + Duration::from_millis(ms as u64));

        let gravity = async move {
            match deadline {
                Some(at) => time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            command = commands.recv() => {
                catch_up(&mut session, &mut clock);
                match command {
                    Some(command) => {
                        session.apply(command);
                    }
                    None => break,
                }
            }
            _ = gravity => {
                catch_up(&mut session, &mut clock);
            }
            permit = observations.reserve(), if held_back => {
                if let Ok(permit) = permit {
                    permit.send(session.observe());
                }
                held_back = false;
                continue;
            }
        }

        held_back = !publish(&mut session, &observations);
    }

    eprintln!(
        "[Engine] stopped (score {}, lines {}, level {})",
        session.score(),
        session.lines(),
        session.level()
    );
    session
}

/// Send an observation if the reader has room.
///
/// Returns `false` when it had to be held back. Pending events are only
/// drained when an observation actually goes out.
fn publish(session: &mut GameSession, observations: &mpsc::Sender<Observation>) -> bool {
    match observations.try_reserve() {
        Ok(permit) => {
            permit.send(session.observe());
            true
        }
        Err(TrySendError::Full(())) => false,
        // Nobody is listening; there is nothing to catch up on.
        Err(TrySendError::Closed(())) => true,
    }
}

/// Feed wall time since the last catch-up into the session.
///
/// Only whole milliseconds are consumed; the remainder carries over.
fn catch_up(session: &mut GameSession, clock: &mut Instant) {
    let elapsed_ms = clock.elapsed().as_millis().min(u32::MAX as u128) as u32;
    if elapsed_ms == 0 {
        return;
    }
    *clock += Duration::from_millis(elapsed_ms as u64);
    session.tick(elapsed_ms);
}
