//! Key mapping from terminal events to input intents.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key asks for, before the session status is considered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyIntent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    /// Pause when running, resume when paused
    TogglePause,
    Start,
    Reset,
}

impl KeyIntent {
    /// Whether a held key (terminal auto-repeat) should act again
    pub fn repeats(&self) -> bool {
        matches!(
            self,
            KeyIntent::MoveLeft | KeyIntent::MoveRight | KeyIntent::SoftDrop
        )
    }

    /// Intents that move the active piece
    pub fn is_gameplay(&self) -> bool {
        !matches!(
            self,
            KeyIntent::TogglePause | KeyIntent::Start | KeyIntent::Reset
        )
    }
}

/// Map a key to an intent. Keys held with Ctrl or Alt map to nothing.
pub fn map_key(key: KeyEvent) -> Option<KeyIntent> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(KeyIntent::MoveLeft),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(KeyIntent::MoveRight),
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => Some(KeyIntent::SoftDrop),

        // Rotation
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W') => Some(KeyIntent::RotateCw),
        KeyCode::Char('z' | 'Z' | 'y' | 'Y') => Some(KeyIntent::RotateCcw),

        KeyCode::Char(' ') => Some(KeyIntent::HardDrop),
        KeyCode::Char('p' | 'P') => Some(KeyIntent::TogglePause),

        // Lifecycle
        KeyCode::Enter | KeyCode::Char('n' | 'N') => Some(KeyIntent::Start),
        KeyCode::Char('r' | 'R') => Some(KeyIntent::Reset),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
