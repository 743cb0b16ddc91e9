//! Line clearing as a pure function over a board
//!
//! The session clears in place through [`Board::clear_full_rows`]; this module
//! gives the same operation a value-in, value-out form for callers that want
//! to keep the original board.

use crate::board::{Board, ClearedRows};

/// Result of clearing a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClear {
    /// The compacted board
    pub board: Board,
    /// Row indices that were removed, bottom to top, in input coordinates
    pub cleared: ClearedRows,
}

impl LineClear {
    /// Number of rows removed
    pub fn lines(&self) -> u32 {
        self.cleared.len() as u32
    }
}

/// Remove every full row, shifting the rest down and padding the top with empty rows.
///
/// # Examples
///
/// ```
/// use tetra_quest_core::{line_clear, Board};
///
/// let result = line_clear::clear(&Board::new());
/// assert_eq!(result.lines(), 0);
/// assert_eq!(result.board, Board::new());
/// ```
pub fn clear(board: &Board) -> LineClear {
    let mut board = board.clone();
    let cleared = board.clear_full_rows();
    LineClear { board, cleared }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_rows() -> Vec<Vec<u8>> {
        // Each non-bottom row gets a single marker cell so shifts are visible.
        (0..20)
            .map(|y| {
                let mut row = vec![0u8; 10];
                row[y % 10] = (y % 7) as u8 + 1;
                row
            })
            .collect()
    }

    #[test]
    fn test_clear_empty_board() {
        let board = Board::new();
        let result = clear(&board);
        assert_eq!(result.lines(), 0);
        assert_eq!(result.board, board);
    }

    #[test]
    fn test_clear_bottom_row_shifts_everything_down() {
        let mut rows = numbered_rows();
        rows[19] = vec![3u8; 10];
        let board = Board::from_rows(&rows).unwrap();

        let result = clear(&board);
        assert_eq!(result.lines(), 1);
        assert_eq!(result.cleared.as_slice(), &[19]);

        let grid = result.board.to_grid();
        assert!(grid[0].iter().all(|&c| c == 0));
        for y in 1..19 {
            assert_eq!(&grid[y][..], rows[y - 1].as_slice());
        }
        // Old row 18 lands on 19.
        assert_eq!(&grid[19][..], rows[18].as_slice());
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut rows = vec![vec![0u8; 10]; 20];
        rows[19] = vec![1u8; 10];
        rows[18][0] = 2;
        rows[17] = vec![5u8; 10];
        rows[16][9] = 6;
        let board = Board::from_rows(&rows).unwrap();

        let result = clear(&board);
        assert_eq!(result.lines(), 2);
        assert_eq!(result.cleared.as_slice(), &[19, 17]);

        let grid = result.board.to_grid();
        assert_eq!(grid[19][0], 2);
        assert_eq!(grid[18][9], 6);
        assert_eq!(result.board.filled_count(), 2);
    }

    #[test]
    fn test_clear_four_rows() {
        let mut rows = vec![vec![0u8; 10]; 20];
        for row in rows.iter_mut().skip(16) {
            *row = vec![1u8; 10];
        }
        let board = Board::from_rows(&rows).unwrap();

        let result = clear(&board);
        assert_eq!(result.lines(), 4);
        assert_eq!(result.board, Board::new());
        // Input untouched
        assert_eq!(board.filled_count(), 40);
    }
}
