//! Terminal input module (engine-facing).
//!
//! This module is independent of any renderer. It maps `crossterm` key events
//! to [`KeyIntent`]s and, given the session status, to
//! [`Command`](crate::types::Command)s the session will accept.

pub mod controller;
pub mod map;

pub use tetra_quest_types as types;

pub use controller::InputController;
pub use map::{map_key, should_quit, KeyIntent};
