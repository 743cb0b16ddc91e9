//! Status-aware translation from key events to session commands.
//!
//! Gameplay keys only produce commands while the session is running. Pause
//! toggles, and start is only offered when there is no game in progress.

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::{map_key, KeyIntent};
use crate::types::{Command, GameStatus};

/// Translates keys into commands for a session in a given status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputController {
    /// Act on terminal auto-repeat for movement keys
    pub allow_repeat: bool,
}

impl Default for InputController {
    fn default() -> Self {
        Self { allow_repeat: true }
    }
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Command for `key` given the current status, if any.
    ///
    /// Key releases never produce commands.
    pub fn translate(&self, key: KeyEvent, status: GameStatus) -> Option<Command> {
        let intent = map_key(key)?;
        match key.kind {
            KeyEventKind::Release => return None,
            KeyEventKind::Repeat if !(self.allow_repeat && intent.repeats()) => return None,
            _ => {}
        }
        Self::command_for(intent, status)
    }

    /// Gate an intent on session status.
    pub fn command_for(intent: KeyIntent, status: GameStatus) -> Option<Command> {
        if intent.is_gameplay() && !status.accepts_input() {
            return None;
        }

        match intent {
            KeyIntent::MoveLeft => Some(Command::MoveLeft),
            KeyIntent::MoveRight => Some(Command::MoveRight),
            KeyIntent::SoftDrop => Some(Command::SoftDrop),
            KeyIntent::HardDrop => Some(Command::HardDrop),
            KeyIntent::RotateCw => Some(Command::RotateCw),
            KeyIntent::RotateCcw => Some(Command::RotateCcw),
            KeyIntent::TogglePause => match status {
                GameStatus::Running => Some(Command::Pause),
                GameStatus::Paused => Some(Command::Resume),
                _ => None,
            },
            KeyIntent::Start => match status {
                GameStatus::NotStarted | GameStatus::GameOver => Some(Command::Start),
                _ => None,
            },
            KeyIntent::Reset => Some(Command::Reset),
        }
    }
}
