//! Pieces module - Tetromino shape definitions and matrix rotation
//!
//! Every piece is a square matrix whose side depends on the kind (2, 3 or 4).
//! Cells hold `0` for empty or the piece's type id. Rotation is written for a
//! square matrix of any side, so the same code turns the O, the I and the
//! 3x3 pieces.

use thiserror::Error;

use crate::types::{Cell, PieceKind, RotationDirection, EMPTY};

/// Largest supported matrix side (the I piece)
pub const MAX_SIDE: usize = 4;

/// Smallest supported matrix side (the O piece)
pub const MIN_SIDE: usize = 2;

/// Why a matrix was rejected as a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape side {0} is outside 2..=4")]
    BadSide(usize),
    #[error("row {row} has {len} cells, expected {side}")]
    NotSquare { row: usize, len: usize, side: usize },
    #[error("cell ({row}, {col}) holds {value}, which is not a piece type id")]
    BadCell { row: usize, col: usize, value: Cell },
    #[error("shape mixes type ids {first} and {second}")]
    MixedIds { first: Cell, second: Cell },
    #[error("shape has no occupied cells")]
    Empty,
    #[error("cell ({row}, {col}) lies outside the {side}x{side} matrix")]
    OutsideMatrix { row: usize, col: usize, side: usize },
    #[error("shape paints type id {found}, piece kind has id {expected}")]
    WrongKind { expected: Cell, found: Cell },
}

/// Immutable square matrix of cells
///
/// Only the top-left `side x side` region is meaningful; the rest is always empty.
/// Deserialized shapes go through the same checks as [`Shape::from_rows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ShapeRepr"))]
pub struct Shape {
    side: u8,
    cells: [[Cell; MAX_SIDE]; MAX_SIDE],
}

impl Shape {
    const fn square2(m: [[Cell; 2]; 2]) -> Self {
        Self {
            side: 2,
            cells: [
                [m[0][0], m[0][1], 0, 0],
                [m[1][0], m[1][1], 0, 0],
                [0; MAX_SIDE],
                [0; MAX_SIDE],
            ],
        }
    }

    const fn square3(m: [[Cell; 3]; 3]) -> Self {
        Self {
            side: 3,
            cells: [
                [m[0][0], m[0][1], m[0][2], 0],
                [m[1][0], m[1][1], m[1][2], 0],
                [m[2][0], m[2][1], m[2][2], 0],
                [0; MAX_SIDE],
            ],
        }
    }

    const fn square4(m: [[Cell; 4]; 4]) -> Self {
        Self { side: 4, cells: m }
    }

    /// Build a shape from rows, validating it up front.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetra_quest_core::pieces::{Shape, ShapeError};
    /// use tetra_quest_types::PieceKind;
    ///
    /// let o = Shape::from_rows(&[&[4, 4], &[4, 4]]).unwrap();
    /// assert_eq!(o, Shape::of(PieceKind::O));
    ///
    /// assert_eq!(
    ///     Shape::from_rows(&[&[1, 1], &[1]]),
    ///     Err(ShapeError::NotSquare { row: 1, len: 1, side: 2 })
    /// );
    /// ```
    pub fn from_rows(rows: &[&[Cell]]) -> Result<Self, ShapeError> {
        let side = rows.len();
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
            return Err(ShapeError::BadSide(side));
        }

        let mut cells = [[EMPTY; MAX_SIDE]; MAX_SIDE];
        let mut id: Option<Cell> = None;
        for (row, values) in rows.iter().enumerate() {
            if values.len() != side {
                return Err(ShapeError::NotSquare {
                    row,
                    len: values.len(),
                    side,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if value == EMPTY {
                    continue;
                }
                if PieceKind::from_id(value).is_none() {
                    return Err(ShapeError::BadCell { row, col, value });
                }
                match id {
                    None => id = Some(value),
                    Some(first) if first != value => {
                        return Err(ShapeError::MixedIds {
                            first,
                            second: value,
                        })
                    }
                    Some(_) => {}
                }
                cells[row][col] = value;
            }
        }

        if id.is_none() {
            return Err(ShapeError::Empty);
        }

        Ok(Self {
            side: side as u8,
            cells,
        })
    }

    /// Canonical spawn shape for a piece kind
    pub fn of(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => I_SHAPE,
            PieceKind::J => J_SHAPE,
            PieceKind::L => L_SHAPE,
            PieceKind::O => O_SHAPE,
            PieceKind::S => S_SHAPE,
            PieceKind::T => T_SHAPE,
            PieceKind::Z => Z_SHAPE,
        }
    }

    /// Matrix side length
    pub fn side(&self) -> usize {
        self.side as usize
    }

    /// Matrix width, used for spawn centring and the wall-kick bound
    pub fn width(&self) -> usize {
        self.side()
    }

    /// Cell at (row, col); empty outside the matrix
    pub fn get(&self, row: usize, col: usize) -> Cell {
        if row >= self.side() || col >= self.side() {
            return EMPTY;
        }
        self.cells[row][col]
    }

    /// Iterate the matrix rows, each trimmed to `side`
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        let side = self.side();
        self.cells[..side].iter().map(move |row| &row[..side])
    }

    /// Occupied cells as (row, col) offsets inside the matrix
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let side = self.side();
        (0..side).flat_map(move |row| {
            (0..side).filter_map(move |col| (self.cells[row][col] != EMPTY).then_some((row, col)))
        })
    }

    /// Index of the lowest matrix row holding an occupied cell
    pub fn bottom_row(&self) -> usize {
        self.occupied().map(|(row, _)| row).max().unwrap_or(0)
    }

    /// The type id painted by this shape
    pub fn id(&self) -> Cell {
        self.occupied()
            .next()
            .map(|(row, col)| self.cells[row][col])
            .unwrap_or(EMPTY)
    }

    /// Rotate 90° in the given direction.
    ///
    /// Transpose first, then reverse each row (clockwise) or reverse the row
    /// order (counter-clockwise). Works for any side.
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        let n = self.side();
        let mut transposed = [[EMPTY; MAX_SIDE]; MAX_SIDE];
        for (r, row) in transposed.iter_mut().enumerate().take(n) {
            for (c, cell) in row.iter_mut().enumerate().take(n) {
                *cell = self.cells[c][r];
            }
        }

        match direction {
            RotationDirection::Clockwise => {
                for row in transposed.iter_mut().take(n) {
                    row[..n].reverse();
                }
            }
            RotationDirection::CounterClockwise => {
                transposed[..n].reverse();
            }
        }

        Self {
            side: self.side,
            cells: transposed,
        }
    }
}

/// Rotate a shape; free-function form of [`Shape::rotated`]
pub fn rotate(shape: &Shape, direction: RotationDirection) -> Shape {
    shape.rotated(direction)
}

/// Canonical shape lookup; free-function form of [`Shape::of`]
pub fn definition_of(kind: PieceKind) -> Shape {
    Shape::of(kind)
}

const I_SHAPE: Shape = Shape::square4([
    [0, 0, 0, 0],
    [1, 1, 1, 1],
    [0, 0, 0, 0],
    [0, 0, 0, 0],
]);

const J_SHAPE: Shape = Shape::square3([
    [0, 0, 0],
    [2, 2, 2],
    [0, 0, 2],
]);

const L_SHAPE: Shape = Shape::square3([
    [0, 0, 0],
    [3, 3, 3],
    [3, 0, 0],
]);

const O_SHAPE: Shape = Shape::square2([
    [4, 4],
    [4, 4],
]);

const S_SHAPE: Shape = Shape::square3([
    [0, 0, 0],
    [0, 5, 5],
    [5, 5, 0],
]);

const T_SHAPE: Shape = Shape::square3([
    [0, 0, 0],
    [6, 6, 6],
    [0, 6, 0],
]);

const Z_SHAPE: Shape = Shape::square3([
    [0, 0, 0],
    [7, 7, 0],
    [0, 7, 7],
]);

/// A piece: its kind plus its current (possibly rotated) shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PieceRepr"))]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
}

/// Wire form of [`Shape`], checked on the way in
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ShapeRepr {
    side: usize,
    cells: [[Cell; MAX_SIDE]; MAX_SIDE],
}

#[cfg(feature = "serde")]
impl TryFrom<ShapeRepr> for Shape {
    type Error = ShapeError;

    fn try_from(repr: ShapeRepr) -> Result<Self, Self::Error> {
        let side = repr.side;
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
            return Err(ShapeError::BadSide(side));
        }
        for (row, values) in repr.cells.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if (row >= side || col >= side) && value != EMPTY {
                    return Err(ShapeError::OutsideMatrix { row, col, side });
                }
            }
        }
        let rows: Vec<&[Cell]> = repr.cells[..side].iter().map(|r| &r[..side]).collect();
        Shape::from_rows(&rows)
    }
}

/// Wire form of [`Piece`]; the shape must paint the kind's id
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PieceRepr {
    kind: PieceKind,
    shape: Shape,
}

#[cfg(feature = "serde")]
impl TryFrom<PieceRepr> for Piece {
    type Error = ShapeError;

    fn try_from(repr: PieceRepr) -> Result<Self, Self::Error> {
        let found = repr.shape.id();
        if found != repr.kind.id() {
            return Err(ShapeError::WrongKind {
                expected: repr.kind.id(),
                found,
            });
        }
        Ok(Self {
            kind: repr.kind,
            shape: repr.shape,
        })
    }
}

impl Piece {
    /// Piece in its spawn orientation
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: Shape::of(kind),
        }
    }

    /// Column that centres this piece's matrix on the board
    pub fn spawn_x(&self, board_width: u8) -> i8 {
        ((board_width as i16 - self.shape.width() as i16) / 2) as i8
    }
}
