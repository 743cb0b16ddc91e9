//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty (`0`) or holds the type id
//! of the piece that locked there. Only locked cells live here; the falling piece
//! is overlaid at snapshot time and written in only when it locks.
//!
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom)

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::pieces::Shape;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, EMPTY};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Row indices removed by a single clear, bottom to top
pub type ClearedRows = ArrayVec<u8, { BOARD_HEIGHT as usize }>;

/// Composited grid shape handed to observers
pub type Grid = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

/// Why rows were rejected as a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board has {0} rows, expected 20")]
    RowCount(usize),
    #[error("row {row} has {len} cells, expected 10")]
    RowWidth { row: usize, len: usize },
    #[error("cell ({x}, {y}) holds {value}, which is not a piece type id")]
    BadCell { x: usize, y: usize, value: Cell },
}

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [EMPTY; BOARD_SIZE],
        }
    }

    /// Build a board from 20 rows of 10 cells, rejecting anything else.
    pub fn from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Result<Self, BoardError> {
        if rows.len() != BOARD_HEIGHT as usize {
            return Err(BoardError::RowCount(rows.len()));
        }

        let mut board = Self::new();
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != BOARD_WIDTH as usize {
                return Err(BoardError::RowWidth {
                    row: y,
                    len: row.len(),
                });
            }
            for (x, &value) in row.iter().enumerate() {
                if value != EMPTY && PieceKind::from_id(value).is_none() {
                    return Err(BoardError::BadCell { x, y, value });
                }
                board.cells[y * BOARD_WIDTH as usize + x] = value;
            }
        }
        Ok(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i16 || y < 0 || y >= BOARD_HEIGHT as i16 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, cell: Option<PieceKind>) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell.map_or(EMPTY, PieceKind::id);
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(cell) if cell != EMPTY)
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i16, y: i16) -> bool {
        Self::index(x, y).is_none()
    }

    /// Row `y` as a slice; empty slice when out of range
    pub fn row(&self, y: usize) -> &[Cell] {
        if y >= BOARD_HEIGHT as usize {
            return &[];
        }
        let start = y * BOARD_WIDTH as usize;
        &self.cells[start..start + BOARD_WIDTH as usize]
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        y < BOARD_HEIGHT as usize && self.row(y).iter().all(|&cell| cell != EMPTY)
    }

    /// Clear all full rows and return the row indices that were cleared (sorted bottom to top)
    ///
    /// Surviving rows keep their order and slide down; the vacated rows at the top
    /// are zeroed, so the row count never changes.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared_rows = ClearedRows::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        // Scan from bottom to top
        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y as u8);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Clear the remaining rows at the top
        self.cells[..write_y * width].fill(EMPTY);

        cleared_rows
    }

    /// Write a shape's occupied cells into the board with its top-left at (x, y).
    ///
    /// Cells falling outside the board are skipped. Returns how many cells were written.
    pub fn lock_shape(&mut self, shape: &Shape, x: i8, y: i8) -> usize {
        let id = shape.id();
        let mut written = 0;
        for (row, col) in shape.occupied() {
            if let Some(idx) = Self::index(x as i16 + col as i16, y as i16 + row as i16) {
                self.cells[idx] = id;
                written += 1;
            }
        }
        written
    }

    /// Copy the board into a 2D grid
    pub fn write_grid(&self, out: &mut Grid) {
        for (y, row) in out.iter_mut().enumerate() {
            row.copy_from_slice(self.row(y));
        }
    }

    /// The board as a 2D grid
    pub fn to_grid(&self) -> Grid {
        let mut grid = [[EMPTY; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.write_grid(&mut grid);
        grid
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
