//! Tetra Quest (workspace facade crate).
//!
//! The rules live in dedicated crates under `crates/`; this package re-exports
//! them as `tetra_quest::{core,engine,input,types}` and adds the scripted
//! replay used by the `tetra-quest` binary.

pub mod replay;
pub mod script;

pub use tetra_quest_core as core;
pub use tetra_quest_engine as engine;
pub use tetra_quest_input as input;
pub use tetra_quest_types as types;
