//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains every rule of the game: the board, the seven pieces,
//! collision, rotation with wall kicks, line clearing, scoring, level
//! progression and the session state machine. It has **no dependency** on
//! rendering, audio, input devices or async runtimes:
//!
//! - **Deterministic**: the same piece source and inputs produce the same game
//! - **Total**: every command is accepted or ignored; nothing panics or errors at runtime
//! - **Headless**: time is fed in by the caller, so tests run in virtual time
//!
//! # Module Structure
//!
//! - [`pieces`]: tetromino matrices and generic matrix rotation
//! - [`board`]: 10x20 grid of locked cells
//! - [`collision`]: piece-versus-board checks
//! - [`rotation`]: rotation with a bounded sideways kick search
//! - [`line_clear`]: full-row removal
//! - [`scoring`]: score, level and gravity interval formulas
//! - [`rng`]: seedable uniform piece selection
//! - [`timer`]: the single gravity schedule
//! - [`game_state`]: the session state machine
//! - [`snapshot`]: read-only views and drained events
//!
//! # Example
//!
//! ```
//! use tetra_quest_core::{GameSession, PieceSource};
//! use tetra_quest_types::{Command, GameEvent, GameStatus, PieceKind};
//!
//! let mut game = GameSession::with_source(PieceSource::sequence([PieceKind::T]));
//! game.apply(Command::Start);
//! assert_eq!(game.status(), GameStatus::Running);
//!
//! game.apply(Command::MoveLeft);
//! game.apply(Command::HardDrop);
//!
//! let obs = game.observe();
//! assert_eq!(obs.events[0], GameEvent::GameStart);
//! assert!(obs.snapshot.flags.game_start);
//!
//! // Events are handed out once.
//! assert!(game.observe().events.is_empty());
//! ```
//!
//! # Timing
//!
//! Gravity runs from [`GravityTimer`], advanced by
//! [`GameSession::tick`](game_state::GameSession::tick) with elapsed
//! milliseconds. The interval is `1000 / (level + 1) + 200` ms; a soft drop
//! schedules one tick at a tenth of that.

pub mod board;
pub mod collision;
pub mod game_state;
pub mod line_clear;
pub mod pieces;
pub mod rng;
pub mod rotation;
pub mod scoring;
pub mod snapshot;
pub mod timer;

pub use tetra_quest_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardError, Grid};
pub use collision::{is_blocked, Collision};
pub use game_state::{ActivePiece, GameSession, GravitySchedule, EVENT_CAPACITY};
pub use line_clear::LineClear;
pub use pieces::{definition_of, rotate, Piece, Shape, ShapeError};
pub use rng::{PieceSource, SimpleRng};
pub use rotation::attempt_rotate;
pub use scoring::{drop_interval_ms, level_of, score_delta, soft_drop_interval_ms};
pub use snapshot::{EventFlags, GameSnapshot, Observation};
pub use timer::GravityTimer;
