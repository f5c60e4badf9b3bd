//! The locked-cell grid.
//!
//! Coordinates are `(row, col)` with row 0 at the top. The grid always holds
//! exactly `ROWS` rows of exactly `COLS` cells; line clears remove and
//! re-insert rows without ever leaving a gap.

use crate::piece::{Piece, TetrominoType};

pub const COLS: usize = 10;
pub const ROWS: usize = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CellState {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl CellState {
    pub fn is_filled(self) -> bool {
        matches!(self, CellState::Filled(_))
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    rows: Vec<Vec<CellState>>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: vec![Self::empty_row(); ROWS],
        }
    }

    /// Builds a board from explicit rows. `None` unless the dimensions are
    /// exactly `ROWS` x `COLS`.
    pub fn from_rows(rows: Vec<Vec<CellState>>) -> Option<Self> {
        if rows.len() != ROWS || rows.iter().any(|row| row.len() != COLS) {
            return None;
        }
        Some(Self { rows })
    }

    fn empty_row() -> Vec<CellState> {
        vec![CellState::Empty; COLS]
    }

    pub fn rows(&self) -> &[Vec<CellState>] {
        &self.rows
    }

    /// `None` when out of bounds.
    pub fn cell(&self, row: i16, col: i16) -> Option<CellState> {
        if row < 0 || col < 0 {
            return None;
        }
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Side walls and the floor count as occupied. Rows above the top never
    /// do, so a piece poking out of the top of the board is not a collision.
    pub fn is_occupied(&self, row: i16, col: i16) -> bool {
        if col < 0 || col >= COLS as i16 || row >= ROWS as i16 {
            return true;
        }
        if row < 0 {
            return false;
        }
        self.rows[row as usize][col as usize].is_filled()
    }

    /// True if any filled cell of `piece` is occupied on this board.
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(row, col)| self.is_occupied(row, col))
    }

    /// Writes the piece tag into every cell it covers. The caller has already
    /// checked `collides`; cells above the top row are dropped.
    pub fn merge(&mut self, piece: &Piece) {
        let tag = CellState::Filled(piece.tetromino_type);
        for (row, col) in piece.cells() {
            if row >= 0 && (row as usize) < ROWS && col >= 0 && (col as usize) < COLS {
                self.rows[row as usize][col as usize] = tag;
            }
        }
    }

    /// Removes every complete row, refills from the top and returns how many
    /// rows went.
    pub fn clear_completed_lines(&mut self) -> u32 {
        self.rows.retain(|row| !row.iter().all(|cell| cell.is_filled()));
        let cleared = ROWS - self.rows.len();
        for _ in 0..cleared {
            self.rows.insert(0, Self::empty_row());
        }
        cleared as u32
    }

    pub fn is_row_complete(&self, row: usize) -> bool {
        self.rows[row].iter().all(|cell| cell.is_filled())
    }

    pub fn filled_count_in_row(&self, row: usize) -> usize {
        self.rows[row].iter().filter(|cell| cell.is_filled()).count()
    }

    pub fn total_filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, cell: CellState) {
        self.rows[row][col] = cell;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_and_floor_are_occupied() {
        let board = Board::new();
        assert!(board.is_occupied(0, -1));
        assert!(board.is_occupied(0, COLS as i16));
        assert!(board.is_occupied(ROWS as i16, 0));
        assert!(!board.is_occupied(-1, 0));
        assert!(!board.is_occupied(ROWS as i16 - 1, COLS as i16 - 1));
    }

    #[test]
    fn merge_skips_cells_above_top() {
        let mut board = Board::new();
        let piece = Piece::new_at(TetrominoType::O, 0, -1);
        board.merge(&piece);
        assert_eq!(board.total_filled_cells(), 2);
        assert_eq!(board.cell(0, 0), Some(CellState::Filled(TetrominoType::O)));
    }

    #[test]
    fn from_rows_rejects_wrong_dimensions() {
        assert!(Board::from_rows(vec![vec![CellState::Empty; COLS]; ROWS - 1]).is_none());
        assert!(Board::from_rows(vec![vec![CellState::Empty; COLS + 1]; ROWS]).is_none());
        assert!(Board::from_rows(vec![vec![CellState::Empty; COLS]; ROWS]).is_some());
    }
}
