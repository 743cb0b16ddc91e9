//! Read-only views of a session for renderers and sound players

use crate::board::Grid;
use crate::game_state::{ActivePiece, EventQueue, GameSession};
use crate::pieces::Shape;
use crate::types::{ActionKind, GameEvent, GameStatus, PieceKind};

/// Edge-triggered flags derived from pending events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EventFlags {
    /// Most recent player action, if any
    pub last_action: Option<ActionKind>,
    pub line_clear: bool,
    pub level_up: bool,
    pub game_start: bool,
    pub game_over: bool,
}

impl EventFlags {
    pub fn from_events(events: &[GameEvent]) -> Self {
        let mut flags = Self::default();
        for event in events {
            match *event {
                GameEvent::Action { action } => flags.last_action = Some(action),
                GameEvent::LineClear { .. } => flags.line_clear = true,
                GameEvent::LevelUp { .. } => flags.level_up = true,
                GameEvent::GameStart => flags.game_start = true,
                GameEvent::GameOver => flags.game_over = true,
            }
        }
        flags
    }

    pub fn any(&self) -> bool {
        self.last_action.is_some()
            || self.line_clear
            || self.level_up
            || self.game_start
            || self.game_over
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GameSnapshot {
    /// Locked cells with the active piece drawn on top
    pub grid: Grid,
    /// The falling piece; absent before the first start
    pub active: Option<ActivePiece>,
    /// Landing row of the active piece
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub next_shape: Shape,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub status: GameStatus,
    pub flags: EventFlags,
}

impl GameSnapshot {
    pub fn capture(session: &GameSession) -> Self {
        let status = session.status();
        let mut grid = session.board().to_grid();

        let active = (status != GameStatus::NotStarted).then(|| *session.active());
        if let Some(piece) = &active {
            let id = piece.kind().id();
            for (x, y) in piece.cells() {
                if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
                    if let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
                        *cell = id;
                    }
                }
            }
        }

        Self {
            grid,
            active,
            ghost_y: active.map(|_| session.ghost_y()),
            next: session.next_piece().kind,
            next_shape: session.next_piece().shape,
            score: session.score(),
            lines: session.lines(),
            level: session.level(),
            status,
            flags: EventFlags::from_events(session.pending_events()),
        }
    }

    /// Cell at (x, y) of the composited grid
    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        self.grid.get(y).and_then(|row| row.get(x)).copied()
    }
}

/// A snapshot together with the events consumed to produce it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub snapshot: GameSnapshot,
    pub events: EventQueue,
}
