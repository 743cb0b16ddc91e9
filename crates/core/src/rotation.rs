//! Rotation with a bounded horizontal wall-kick search
//!
//! The rotated shape is tried at the current column first. While it collides,
//! the piece is nudged sideways with an alternating, growing offset
//! (+1, -2, +3, ...), so the columns visited relative to the start are
//! 0, +1, -1, +2, -2 and so on. The search stops once the next offset would
//! exceed the shape width; the piece is then left untouched.

use crate::board::Board;
use crate::collision;
use crate::game_state::ActivePiece;
use crate::pieces::Piece;
use crate::types::RotationDirection;

/// Try to rotate `piece` in `direction`, kicking sideways if needed.
///
/// Returns the rotated, possibly shifted piece, or `None` when no candidate
/// position fits. The input piece is never modified.
pub fn attempt_rotate(
    piece: &ActivePiece,
    board: &Board,
    direction: RotationDirection,
) -> Option<ActivePiece> {
    let mut candidate = ActivePiece {
        piece: Piece {
            kind: piece.piece.kind,
            shape: piece.piece.shape.rotated(direction),
        },
        ..*piece
    };

    let bound = candidate.piece.shape.width() as i16;
    let mut offset: i16 = 1;

    while collision::is_blocked(&candidate, board, 0, 0) {
        candidate.x = (candidate.x as i16 + offset) as i8;
        offset = -(offset + offset.signum());
        if offset.abs() > bound {
            return None;
        }
    }

    Some(candidate)
}
