//! Async engine for a game session
//!
//! Runs a [`GameSession`](tetra_quest_core::GameSession) inside a single tokio
//! task. Commands arrive on a bounded channel; gravity is a single
//! `sleep_until` derived from the session's timer. Both are handled on the
//! same task, so gravity can never interleave with a half-applied command.
//!
//! ```no_run
//! use tetra_quest_engine::{spawn_engine, EngineConfig};
//! use tetra_quest_types::Command;
//!
//! # async fn demo() -> Result<(), tetra_quest_engine::EngineError> {
//! let mut engine = spawn_engine(&EngineConfig::from_env());
//! engine.send(Command::Start).await?;
//! while let Some(obs) = engine.next_observation().await {
//!     if obs.snapshot.flags.game_over {
//!         break;
//!     }
//! }
//! engine.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;

pub use config::EngineConfig;
pub use driver::{run_engine, spawn_engine, spawn_engine_with, EngineError, EngineHandle};
