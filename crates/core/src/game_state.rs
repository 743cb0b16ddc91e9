//! Game state module - the session state machine
//!
//! [`GameSession`] owns every piece of mutable game state: the board, the
//! falling piece, the preview, counters, lifecycle status, the gravity timer and
//! the pending event queue. It is driven by two entry points that never overlap
//! because they both take `&mut self`:
//!
//! - [`GameSession::apply`] for player and lifecycle commands
//! - [`GameSession::tick`] for elapsed time (gravity)
//!
//! Both are total: a command that does not apply in the current state returns
//! `false` and changes nothing.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::collision;
use crate::pieces::Piece;
use crate::rng::PieceSource;
use crate::rotation::attempt_rotate;
use crate::scoring::{drop_interval_ms, level_of, score_delta, soft_drop_interval_ms};
use crate::snapshot::{GameSnapshot, Observation};
use crate::timer::GravityTimer;
use crate::types::*;

/// Most events held between two observations; older ones are dropped first
pub const EVENT_CAPACITY: usize = 16;

/// Pending events, oldest first
pub type EventQueue = ArrayVec<GameEvent, EVENT_CAPACITY>;

/// Falling piece with its position on the board
///
/// `(x, y)` is the top-left corner of the piece's matrix and may be negative
/// when empty matrix rows or columns hang outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivePiece {
    pub piece: Piece,
    pub x: i8,
    pub y: i8,
    /// Set by the lock sequence just before the piece is merged into the board.
    ///
    /// The same call promotes the next piece, so a session's active piece is
    /// never observed with this set.
    pub collided: bool,
}

impl ActivePiece {
    /// Piece at its spawn position: top row, centred on its matrix width
    pub fn spawn(piece: Piece) -> Self {
        Self {
            x: piece.spawn_x(BOARD_WIDTH),
            y: SPAWN_Y,
            piece,
            collided: false,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.piece.kind
    }

    /// Board cells covered by the piece, including any outside the board
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.piece
            .shape
            .occupied()
            .map(move |(row, col)| (self.x as i16 + col as i16, self.y as i16 + row as i16))
    }
}

/// Requested change to the gravity schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravitySchedule {
    /// Repeat at the current level's interval
    Level,
    /// One tick at the soft-drop interval, then back to `Level`
    SoftDrop,
    /// Freeze while paused
    Suspend,
    /// Stop entirely
    Cancel,
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    active: ActivePiece,
    next: Piece,
    source: PieceSource,
    score: u32,
    lines: u32,
    level: u32,
    status: GameStatus,
    events: EventQueue,
    timer: GravityTimer,
}

impl GameSession {
    /// Create a session drawing uniformly random pieces from `seed`
    pub fn new(seed: u32) -> Self {
        Self::with_source(PieceSource::uniform(seed))
    }

    /// Create a not-started session with an empty board
    pub fn with_source(source: PieceSource) -> Self {
        let mut session = Self {
            board: Board::new(),
            active: ActivePiece::spawn(Piece::new(PieceKind::I)),
            next: Piece::new(PieceKind::I),
            source,
            score: 0,
            lines: 0,
            level: 0,
            status: GameStatus::NotStarted,
            events: EventQueue::new(),
            timer: GravityTimer::new(),
        };
        session.draw_pair();
        session
    }

    /// Create a running session on a prepared board.
    ///
    /// The first piece spawns as usual; if it overlaps the board the session
    /// is over immediately. No `GameStart` event is queued.
    pub fn from_board(board: Board, source: PieceSource) -> Self {
        let mut session = Self::with_source(source);
        session.board = board;
        session.status = GameStatus::Running;
        session.reschedule_gravity(GravitySchedule::Level);
        session.check_spawn();
        session
    }

    /// Set the cleared-line total (and the level that follows from it).
    ///
    /// Scenario helper for tests and replays; nothing is emitted.
    pub fn with_lines(mut self, lines: u32) -> Self {
        self.lines = lines;
        self.level = level_of(lines);
        if self.timer.is_armed() {
            self.reschedule_gravity(GravitySchedule::Level);
        }
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &ActivePiece {
        &self.active
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn timer(&self) -> &GravityTimer {
        &self.timer
    }

    /// Milliseconds until the next gravity step; `None` when gravity is off
    pub fn gravity_remaining_ms(&self) -> Option<u32> {
        self.timer.remaining_ms()
    }

    /// Events queued since the last [`observe`](Self::observe)
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Read-only view; pending events are reported but stay queued.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }

    /// Snapshot plus the pending events, which are consumed.
    pub fn observe(&mut self) -> Observation {
        let snapshot = self.snapshot();
        let events = std::mem::take(&mut self.events);
        Observation { snapshot, events }
    }

    /// Apply a command. Returns `true` if the session changed.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Start => {
                self.start();
                true
            }
            Command::Reset => {
                self.reset();
                true
            }
            Command::Pause => match self.status {
                GameStatus::Running => {
                    self.status = GameStatus::Paused;
                    self.reschedule_gravity(GravitySchedule::Suspend);
                    true
                }
                GameStatus::Paused => self.resume(),
                _ => false,
            },
            Command::Resume => self.resume(),
            _ if !self.status.accepts_input() => false,
            Command::MoveLeft => self.try_shift(-1),
            Command::MoveRight => self.try_shift(1),
            Command::RotateCw => self.try_rotate(RotationDirection::Clockwise),
            Command::RotateCcw => self.try_rotate(RotationDirection::CounterClockwise),
            Command::SoftDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
        }
    }

    /// Advance virtual time, running every gravity step that falls due.
    ///
    /// Returns `true` if at least one step ran.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }

        self.timer.advance(elapsed_ms);

        let mut stepped = false;
        while self.status == GameStatus::Running {
            let Some(fire) = self.timer.take_due() else {
                break;
            };
            if fire.one_shot {
                // Soft-drop tick spent; the level interval takes over from here.
                self.reschedule_gravity(GravitySchedule::Level);
                self.timer.advance(fire.overshoot_ms);
            }
            let generation = self.timer.generation();
            self.step_down();
            if self.timer.generation() != generation && self.timer.is_armed() {
                // A level-up re-armed gravity; time past this step still counts.
                self.timer.advance(fire.overshoot_ms);
            }
            stepped = true;
        }
        stepped
    }

    /// Run one gravity step now, ignoring the timer.
    pub fn gravity_tick(&mut self) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        self.step_down();
        true
    }

    /// The single place the gravity schedule changes.
    pub fn reschedule_gravity(&mut self, schedule: GravitySchedule) {
        match schedule {
            GravitySchedule::Level => {
                self.timer.arm(drop_interval_ms(self.level));
            }
            GravitySchedule::SoftDrop => {
                self.timer.arm_once(soft_drop_interval_ms(self.level));
            }
            GravitySchedule::Suspend => {
                self.timer.suspend();
            }
            GravitySchedule::Cancel => {
                self.timer.cancel();
            }
        }
    }

    /// Row the active piece would land on if dropped straight down
    pub fn ghost_y(&self) -> i8 {
        self.active.y.saturating_add(self.drop_distance() as i8)
    }

    /// Rows the active piece can fall before it is blocked
    pub fn drop_distance(&self) -> u8 {
        let mut distance: u8 = 0;
        while distance < BOARD_HEIGHT
            && !collision::is_blocked(&self.active, &self.board, 0, distance as i8 + 1)
        {
            distance += 1;
        }
        distance
    }

    fn start(&mut self) {
        self.board.clear();
        self.score = 0;
        self.lines = 0;
        self.level = 0;
        self.draw_pair();
        self.status = GameStatus::Running;
        self.push_event(GameEvent::GameStart);
        self.reschedule_gravity(GravitySchedule::Level);
    }

    fn reset(&mut self) {
        self.board.clear();
        self.score = 0;
        self.lines = 0;
        self.level = 0;
        self.draw_pair();
        self.status = GameStatus::NotStarted;
        self.events.clear();
        self.reschedule_gravity(GravitySchedule::Cancel);
    }

    fn resume(&mut self) -> bool {
        if self.status != GameStatus::Paused {
            return false;
        }
        self.status = GameStatus::Running;
        self.reschedule_gravity(GravitySchedule::Level);
        true
    }

    /// Fresh active piece and preview from the source
    fn draw_pair(&mut self) {
        self.active = ActivePiece::spawn(Piece::new(self.source.next_kind()));
        self.next = Piece::new(self.source.next_kind());
    }

    fn try_shift(&mut self, dx: i8) -> bool {
        if collision::is_blocked(&self.active, &self.board, dx, 0) {
            return false;
        }
        self.active.x += dx;
        self.push_event(GameEvent::Action {
            action: ActionKind::Move,
        });
        true
    }

    fn try_rotate(&mut self, direction: RotationDirection) -> bool {
        match attempt_rotate(&self.active, &self.board, direction) {
            Some(rotated) => {
                self.active = rotated;
                self.push_event(GameEvent::Action {
                    action: ActionKind::Rotate,
                });
                true
            }
            None => false,
        }
    }

    fn soft_drop(&mut self) -> bool {
        self.push_event(GameEvent::Action {
            action: ActionKind::SoftDrop,
        });
        self.step_down();
        if self.status == GameStatus::Running {
            self.reschedule_gravity(GravitySchedule::SoftDrop);
        }
        true
    }

    fn hard_drop(&mut self) -> bool {
        let distance = self.drop_distance();
        self.active.y += distance as i8;
        self.push_event(GameEvent::Action {
            action: ActionKind::HardDrop,
        });
        self.lock_piece();
        true
    }

    /// Descend one row, or lock if something is underneath.
    fn step_down(&mut self) {
        if collision::is_blocked(&self.active, &self.board, 0, 1) {
            self.lock_piece();
        } else {
            self.active.y += 1;
        }
    }

    /// Lock sequence: merge, clear, score, level, promote, game-over check.
    fn lock_piece(&mut self) {
        self.active.collided = true;
        self.board
            .lock_shape(&self.active.piece.shape, self.active.x, self.active.y);

        let cleared = self.board.clear_full_rows().len() as u32;
        if cleared > 0 {
            self.lines = self.lines.saturating_add(cleared);
            // Points use the level in force before this clear.
            self.score = self.score.saturating_add(score_delta(cleared, self.level));
            self.push_event(GameEvent::LineClear { lines: cleared });
        }

        let level = level_of(self.lines);
        if level > self.level {
            self.level = level;
            self.push_event(GameEvent::LevelUp { level });
            self.reschedule_gravity(GravitySchedule::Level);
        }

        self.active = ActivePiece::spawn(self.next);
        self.next = Piece::new(self.source.next_kind());
        self.check_spawn();
    }

    /// Game over when the freshly spawned piece covers a locked cell.
    ///
    /// Cells above or beside the board do not count.
    fn check_spawn(&mut self) {
        if collision::overlaps_locked(&self.active, &self.board) {
            self.status = GameStatus::GameOver;
            self.reschedule_gravity(GravitySchedule::Cancel);
            self.push_event(GameEvent::GameOver);
        }
    }

    fn push_event(&mut self, event: GameEvent) {
        if self.events.is_full() {
            self.events.remove(0);
        }
        self.events.push(event);
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(kinds: &[PieceKind]) -> GameSession {
        let mut session = GameSession::with_source(PieceSource::sequence(kinds.iter().copied()));
        session.apply(Command::Start);
        session
    }

    #[test]
    fn test_new_session_is_not_started() {
        let session = GameSession::new(12345);
        assert_eq!(session.status(), GameStatus::NotStarted);
        assert_eq!(session.score(), 0);
        assert_eq!(session.lines(), 0);
        assert_eq!(session.level(), 0);
        assert_eq!(session.board().filled_count(), 0);
        assert_eq!(session.gravity_remaining_ms(), None);
        assert!(!session.has_pending_events());
    }

    #[test]
    fn test_start_spawns_centred_and_arms_gravity() {
        let session = running(&[PieceKind::O, PieceKind::T]);
        assert_eq!(session.status(), GameStatus::Running);
        assert_eq!(session.active().kind(), PieceKind::O);
        assert_eq!(session.active().x, 4);
        assert_eq!(session.active().y, 0);
        assert_eq!(session.next_piece().kind, PieceKind::T);
        assert_eq!(session.gravity_remaining_ms(), Some(1200));
        assert_eq!(session.pending_events(), &[GameEvent::GameStart]);
    }

    #[test]
    fn test_gameplay_commands_ignored_unless_running() {
        let mut session = GameSession::new(1);
        for cmd in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::SoftDrop,
            Command::HardDrop,
            Command::RotateCw,
            Command::RotateCcw,
            Command::Resume,
            Command::Pause,
        ] {
            assert!(!session.apply(cmd), "{:?}", cmd);
        }
        assert_eq!(session.status(), GameStatus::NotStarted);
    }

    #[test]
    fn test_move_emits_action() {
        let mut session = running(&[PieceKind::T]);
        session.observe();

        assert!(session.apply(Command::MoveLeft));
        assert_eq!(session.active().x, 2);
        assert_eq!(
            session.pending_events(),
            &[GameEvent::Action {
                action: ActionKind::Move
            }]
        );
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let mut session = running(&[PieceKind::T]);
        for _ in 0..3 {
            assert!(session.apply(Command::MoveLeft));
        }
        assert_eq!(session.active().x, 0);
        assert!(!session.apply(Command::MoveLeft));
        assert_eq!(session.active().x, 0);
    }

    #[test]
    fn test_rotate_changes_shape() {
        let mut session = running(&[PieceKind::T]);
        let before = session.active().piece.shape;
        assert!(session.apply(Command::RotateCw));
        assert_ne!(session.active().piece.shape, before);
        assert!(session.apply(Command::RotateCcw));
        assert_eq!(session.active().piece.shape, before);
    }

    #[test]
    fn test_hard_drop_locks_at_floor() {
        let mut session = running(&[PieceKind::T, PieceKind::O]);
        assert_eq!(session.ghost_y(), 17);

        assert!(session.apply(Command::HardDrop));
        let grid = session.board().to_grid();
        assert_eq!(&grid[18][3..6], &[6, 6, 6]);
        assert_eq!(grid[19][4], 6);
        assert_eq!(session.active().kind(), PieceKind::O);
    }

    #[test]
    fn test_gravity_tick_descends_then_locks() {
        let mut session = running(&[PieceKind::O]);
        // O occupies matrix rows 0-1; it rests at y = 18.
        for _ in 0..18 {
            assert!(session.gravity_tick());
        }
        assert_eq!(session.active().y, 18);
        assert_eq!(session.drop_distance(), 0);

        session.gravity_tick();
        assert_eq!(session.board().filled_count(), 4);
        assert_eq!(session.active().y, 0);
    }

    #[test]
    fn test_tick_uses_level_interval() {
        let mut session = running(&[PieceKind::T]);
        assert!(!session.tick(1199));
        assert_eq!(session.active().y, 0);
        assert!(session.tick(1));
        assert_eq!(session.active().y, 1);
        assert!(session.tick(2400));
        assert_eq!(session.active().y, 3);
    }

    #[test]
    fn test_soft_drop_one_shot_then_reverts() {
        let mut session = running(&[PieceKind::T]);
        assert!(session.apply(Command::SoftDrop));
        assert_eq!(session.active().y, 1);
        assert_eq!(session.gravity_remaining_ms(), Some(120));
        assert!(session.timer().is_one_shot());

        assert!(session.tick(120));
        assert_eq!(session.active().y, 2);
        assert!(!session.timer().is_one_shot());
        assert_eq!(session.gravity_remaining_ms(), Some(1200));
    }

    #[test]
    fn test_pause_toggles_and_freezes_gravity() {
        let mut session = running(&[PieceKind::T]);
        session.tick(500);

        assert!(session.apply(Command::Pause));
        assert_eq!(session.status(), GameStatus::Paused);
        assert!(!session.tick(10_000));
        assert_eq!(session.active().y, 0);
        assert!(!session.apply(Command::MoveLeft));

        assert!(session.apply(Command::Pause));
        assert_eq!(session.status(), GameStatus::Running);
        // Re-armed at the full interval, not the residual.
        assert_eq!(session.gravity_remaining_ms(), Some(1200));
    }

    #[test]
    fn test_resume_only_from_paused() {
        let mut session = running(&[PieceKind::T]);
        assert!(!session.apply(Command::Resume));
        session.apply(Command::Pause);
        assert!(session.apply(Command::Resume));
        assert_eq!(session.status(), GameStatus::Running);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = running(&[PieceKind::O]);
        session.apply(Command::HardDrop);
        assert!(session.apply(Command::Reset));

        assert_eq!(session.status(), GameStatus::NotStarted);
        assert_eq!(session.board().filled_count(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.gravity_remaining_ms(), None);
        assert!(!session.has_pending_events());
    }

    #[test]
    fn test_single_line_clear_scores() {
        let mut rows = vec![vec![0u8; 10]; 20];
        for x in 0..8 {
            rows[19][x] = 1;
        }
        let board = Board::from_rows(&rows).unwrap();
        let mut session = GameSession::from_board(board, PieceSource::sequence([PieceKind::O]));
        for _ in 0..4 {
            session.apply(Command::MoveRight);
        }
        session.apply(Command::HardDrop);

        assert_eq!(session.lines(), 1);
        assert_eq!(session.score(), 40);
        assert!(session
            .pending_events()
            .contains(&GameEvent::LineClear { lines: 1 }));
        // The O's upper half survives and slides into the bottom row.
        assert_eq!(session.board().filled_count(), 2);
    }

    #[test]
    fn test_level_up_scores_with_previous_level() {
        let mut rows = vec![vec![0u8; 10]; 20];
        for x in 0..8 {
            rows[19][x] = 1;
        }
        let board = Board::from_rows(&rows).unwrap();
        let mut session =
            GameSession::from_board(board, PieceSource::sequence([PieceKind::O])).with_lines(9);
        for _ in 0..4 {
            session.apply(Command::MoveRight);
        }
        session.apply(Command::HardDrop);

        assert_eq!(session.level(), 1);
        assert_eq!(session.score(), 40);
        assert!(session
            .pending_events()
            .contains(&GameEvent::LevelUp { level: 1 }));
        assert_eq!(session.gravity_remaining_ms(), Some(700));
    }

    #[test]
    fn test_coarse_tick_carries_time_across_level_up() {
        let mut rows = vec![vec![0u8; 10]; 20];
        for x in 0..8 {
            rows[19][x] = 1;
        }
        let board = Board::from_rows(&rows).unwrap();
        let mut session =
            GameSession::from_board(board, PieceSource::sequence([PieceKind::O])).with_lines(9);
        for _ in 0..4 {
            session.apply(Command::MoveRight);
        }

        // 18 level-0 steps down, a 19th that locks and levels up, then one
        // full level-1 interval for the new piece.
        assert!(session.tick(19 * 1200 + 700));
        assert_eq!(session.level(), 1);
        assert_eq!(session.active().y, 1);
        assert_eq!(session.gravity_remaining_ms(), Some(700));
    }

    #[test]
    fn test_coarse_tick_carries_time_past_soft_drop() {
        let mut session = running(&[PieceKind::T]);
        session.apply(Command::SoftDrop);
        assert!(session.tick(120 + 1200 + 300));
        assert_eq!(session.active().y, 3);
        assert_eq!(session.gravity_remaining_ms(), Some(900));
    }

    #[test]
    fn test_spawn_overlap_is_game_over() {
        let mut rows = vec![vec![0u8; 10]; 20];
        rows[0][4] = 2;
        let board = Board::from_rows(&rows).unwrap();
        let session = GameSession::from_board(board, PieceSource::sequence([PieceKind::O]));

        assert_eq!(session.status(), GameStatus::GameOver);
        assert_eq!(session.gravity_remaining_ms(), None);
        assert_eq!(session.pending_events(), &[GameEvent::GameOver]);
    }

    #[test]
    fn test_spawn_into_empty_region_is_not_game_over() {
        let mut rows = vec![vec![0u8; 10]; 20];
        rows[0][0] = 2;
        rows[0][9] = 2;
        let board = Board::from_rows(&rows).unwrap();
        let session = GameSession::from_board(board, PieceSource::sequence([PieceKind::O]));
        assert_eq!(session.status(), GameStatus::Running);
    }

    #[test]
    fn test_event_queue_drops_oldest() {
        let mut session = running(&[PieceKind::T]);
        for _ in 0..EVENT_CAPACITY {
            session.apply(Command::RotateCw);
        }
        assert_eq!(session.pending_events().len(), EVENT_CAPACITY);
        assert!(!session.pending_events().contains(&GameEvent::GameStart));
    }

    #[test]
    fn test_observe_drains_events() {
        let mut session = running(&[PieceKind::T]);
        let first = session.observe();
        assert_eq!(first.events.as_slice(), &[GameEvent::GameStart]);
        assert!(first.snapshot.flags.game_start);

        let second = session.observe();
        assert!(second.events.is_empty());
        assert!(!second.snapshot.flags.game_start);
    }
}
