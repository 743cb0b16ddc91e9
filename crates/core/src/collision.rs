//! Collision detection between a piece and the locked board.
//!
//! Every occupied cell is visited, so a report can say both whether the piece
//! left the board and whether it overlapped locked cells. The game-over rule
//! only cares about the second.

use crate::board::Board;
use crate::game_state::ActivePiece;
use crate::pieces::Shape;

/// Outcome of testing a shape at a board position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Collision {
    /// At least one occupied cell lies outside the board
    pub out_of_bounds: bool,
    /// At least one occupied cell lands on a locked cell
    pub overlaps: bool,
}

impl Collision {
    pub fn is_blocked(&self) -> bool {
        self.out_of_bounds || self.overlaps
    }
}

/// Test `shape` with its top-left corner at (x, y).
pub fn check_shape(shape: &Shape, x: i8, y: i8, board: &Board) -> Collision {
    let mut collision = Collision::default();
    for (row, col) in shape.occupied() {
        let bx = x as i16 + col as i16;
        let by = y as i16 + row as i16;
        match board.get(bx, by) {
            None => collision.out_of_bounds = true,
            Some(cell) if cell != 0 => collision.overlaps = true,
            Some(_) => {}
        }
    }
    collision
}

/// Test the active piece shifted by (dx, dy).
pub fn check(piece: &ActivePiece, board: &Board, dx: i8, dy: i8) -> Collision {
    check_shape(
        &piece.piece.shape,
        piece.x.saturating_add(dx),
        piece.y.saturating_add(dy),
        board,
    )
}

/// True when the piece shifted by (dx, dy) leaves the board or hits a locked cell.
pub fn is_blocked(piece: &ActivePiece, board: &Board, dx: i8, dy: i8) -> bool {
    check(piece, board, dx, dy).is_blocked()
}

/// True when the piece, where it stands, covers a locked cell.
///
/// Cells outside the board are ignored.
pub fn overlaps_locked(piece: &ActivePiece, board: &Board) -> bool {
    check(piece, board, 0, 0).overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::Piece;
    use crate::types::PieceKind;

    fn piece_at(kind: PieceKind, x: i8, y: i8) -> ActivePiece {
        ActivePiece {
            piece: Piece::new(kind),
            x,
            y,
            collided: false,
        }
    }

    #[test]
    fn free_piece_is_not_blocked() {
        let board = Board::new();
        let piece = piece_at(PieceKind::T, 3, 0);
        assert!(!is_blocked(&piece, &board, 0, 0));
        assert!(!is_blocked(&piece, &board, 0, 1));
    }

    #[test]
    fn empty_matrix_rows_may_hang_outside() {
        // The T's empty top row sits above the board; only occupied cells count.
        let board = Board::new();
        let piece = piece_at(PieceKind::T, 3, -1);
        assert!(!is_blocked(&piece, &board, 0, 0));
    }

    #[test]
    fn walls_and_floor_block() {
        let board = Board::new();
        let piece = piece_at(PieceKind::O, 0, 18);
        assert!(is_blocked(&piece, &board, -1, 0));
        assert!(is_blocked(&piece, &board, 0, 1));
        assert!(!is_blocked(&piece, &board, 1, 0));

        let right = piece_at(PieceKind::O, 8, 0);
        assert!(is_blocked(&right, &board, 1, 0));
    }

    #[test]
    fn report_keeps_both_kinds() {
        let mut board = Board::new();
        board.set(0, 19, Some(PieceKind::I));
        // O at x = -1 covers columns -1 and 0 on rows 18-19.
        let piece = piece_at(PieceKind::O, -1, 18);
        let c = check(&piece, &board, 0, 0);
        assert!(c.out_of_bounds);
        assert!(c.overlaps);
    }

    #[test]
    fn overlap_ignores_boundary() {
        let board = Board::new();
        let piece = piece_at(PieceKind::O, -1, 0);
        assert!(is_blocked(&piece, &board, 0, 0));
        assert!(!overlaps_locked(&piece, &board));
    }
}
