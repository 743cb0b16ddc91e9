//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no mandatory dependencies, so they can be used
//! by the rules engine, the async driver and the input controller alike.
//!
//! # Board Dimensions
//!
//! Fixed playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn row**: 0, horizontally centred on the piece's matrix width
//!
//! # Gravity Timing
//!
//! | Level | Interval |
//! |-------|----------|
//! | 0 | 1200ms |
//! | 1 | 700ms |
//! | 2 | 533ms |
//! | 4 | 400ms |
//! | n | `1000 / (n + 1) + 200` ms |
//!
//! Soft drop uses one tenth of the current interval for a single tick.
//!
//! # Examples
//!
//! ```
//! use tetra_quest_types::{Command, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! // Type ids double as board fill values.
//! assert_eq!(PieceKind::I.id(), 1);
//! assert_eq!(PieceKind::from_id(7), Some(PieceKind::Z));
//!
//! // Parse a command by its protocol name
//! let cmd = Command::from_str("moveLeft").unwrap();
//! assert_eq!(cmd, Command::MoveLeft);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Row at which new pieces spawn (top of their bounding matrix)
pub const SPAWN_Y: i8 = 0;

/// Gravity base: `BASE_DROP_MS / (level + 1)` before the offset is added
pub const BASE_DROP_MS: u32 = 1000;

/// Constant added to every gravity interval
pub const DROP_INTERVAL_OFFSET_MS: u32 = 200;

/// Soft drop divides the current gravity interval by this value for one tick
pub const SOFT_DROP_DIVISOR: u32 = 10;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear scoring table (Classic Nintendo scoring)
///
/// Base points for clearing N lines at level 0:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
///
/// Points are multiplied by (level + 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// A cell on the game board
///
/// `0` is empty; `1..=7` is a locked cell filled with that piece type id.
pub type Cell = u8;

/// The empty cell value
pub const EMPTY: Cell = 0;

/// The seven tetromino piece kinds
///
/// The discriminant is the piece's type id. It is written into the board when
/// the piece locks and doubles as the render colour key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PieceKind {
    I = 1,
    J = 2,
    L = 3,
    O = 4,
    S = 5,
    T = 6,
    Z = 7,
}

impl PieceKind {
    /// All kinds in type id order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Type id (1-7)
    pub fn id(self) -> Cell {
        self as u8
    }

    /// Look up a kind by type id
    ///
    /// # Examples
    ///
    /// ```
    /// use tetra_quest_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_id(4), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_id(0), None);
    /// assert_eq!(PieceKind::from_id(8), None);
    /// ```
    pub fn from_id(id: Cell) -> Option<Self> {
        match id {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::J),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::O),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::T),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }
}

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Commands accepted by the game session
///
/// Gameplay commands are ignored unless the session is running. `Start`,
/// `Reset`, `Pause` and `Resume` are lifecycle commands with their own
/// preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Command {
    /// Begin a fresh game from any state
    Start,
    /// Return to the not-started state from any state
    Reset,
    /// Toggle between running and paused
    Pause,
    /// Leave the paused state
    Resume,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Descend one row now and accelerate the next gravity tick
    SoftDrop,
    /// Instantly drop piece to lowest valid position and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::Start,
        Command::Reset,
        Command::Pause,
        Command::Resume,
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::HardDrop,
        Command::RotateCw,
        Command::RotateCcw,
    ];

    /// Parse a command from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetra_quest_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("ROTATECCW"), Some(Command::RotateCcw));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "reset" => Some(Command::Reset),
            "pause" => Some(Command::Pause),
            "resume" => Some(Command::Resume),
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "softdrop" => Some(Command::SoftDrop),
            "harddrop" => Some(Command::HardDrop),
            "rotatecw" => Some(Command::RotateCw),
            "rotateccw" => Some(Command::RotateCcw),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Reset => "reset",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
            Command::RotateCw => "rotateCw",
            Command::RotateCcw => "rotateCcw",
        }
    }
}

/// Session lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum GameStatus {
    #[default]
    NotStarted,
    Running,
    Paused,
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::NotStarted => "notStarted",
            GameStatus::Running => "running",
            GameStatus::Paused => "paused",
            GameStatus::GameOver => "gameOver",
        }
    }

    /// Whether gameplay commands are accepted
    pub fn accepts_input(&self) -> bool {
        matches!(self, GameStatus::Running)
    }
}

/// Player action that changed the active piece
///
/// Presentation layers key move/rotate/drop sounds off this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ActionKind {
    Move,
    Rotate,
    SoftDrop,
    HardDrop,
}

/// Discrete, edge-triggered event emitted by a session transition
///
/// Events are queued by the session and consumed exactly once by whoever
/// observes it, so a sound or animation never replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum GameEvent {
    /// A player command moved, rotated or dropped the active piece
    Action { action: ActionKind },
    /// One or more rows were cleared by the last lock
    LineClear { lines: u32 },
    /// The level increased
    LevelUp { level: u32 },
    /// A new game started
    GameStart,
    /// The spawned piece overlapped locked cells
    GameOver,
}
