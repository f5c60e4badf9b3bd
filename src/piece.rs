use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::COLS;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum TetrominoType {
    I,
    T,
    L,
    J,
    O,
    S,
    Z,
}

impl TetrominoType {
    pub const ALL: [TetrominoType; 7] = [
        TetrominoType::I,
        TetrominoType::T,
        TetrominoType::L,
        TetrominoType::J,
        TetrominoType::O,
        TetrominoType::S,
        TetrominoType::Z,
    ];

    /// Numeric tag in `1..=7`; `0` is reserved for an empty cell.
    pub fn index(self) -> u8 {
        match self {
            TetrominoType::I => 1,
            TetrominoType::T => 2,
            TetrominoType::L => 3,
            TetrominoType::J => 4,
            TetrominoType::O => 5,
            TetrominoType::S => 6,
            TetrominoType::Z => 7,
        }
    }

    /// Canonical spawn orientation.
    pub fn shape(self) -> Shape {
        let rows: &[&[u8]] = match self {
            TetrominoType::I => &[&[1, 1, 1, 1]],
            TetrominoType::T => &[&[1, 1, 1], &[0, 1, 0]],
            TetrominoType::L => &[&[1, 1, 1], &[1, 0, 0]],
            TetrominoType::J => &[&[1, 1, 1], &[0, 0, 1]],
            TetrominoType::O => &[&[1, 1], &[1, 1]],
            TetrominoType::S => &[&[1, 1, 0], &[0, 1, 1]],
            TetrominoType::Z => &[&[0, 1, 1], &[1, 1, 0]],
        };
        Shape {
            cells: rows
                .iter()
                .map(|row| row.iter().map(|&v| v != 0).collect())
                .collect(),
        }
    }
}

/// A rectangular filled/empty matrix, indexed `[row][col]`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.cells
    }

    /// `(row, col)` offsets of every filled cell.
    pub fn filled_cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| (r as i16, c as i16))
        })
    }

    /// Transpose, then reverse each row.
    pub fn rotated_clockwise(&self) -> Shape {
        let (height, width) = (self.height(), self.width());
        let cells = (0..width)
            .map(|c| (0..height).rev().map(|r| self.cells[r][c]).collect())
            .collect();
        Shape { cells }
    }
}

/// The falling piece: its current matrix, board offset and tag.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Piece {
    pub tetromino_type: TetrominoType,
    pub shape: Shape,
    pub x: i16,
    pub y: i16,
}

impl Piece {
    /// A piece in canonical orientation at its spawn position.
    pub fn new(tetromino_type: TetrominoType) -> Self {
        let shape = tetromino_type.shape();
        let (x, y) = spawn_position(&shape);
        Self {
            tetromino_type,
            shape,
            x,
            y,
        }
    }

    pub fn new_at(tetromino_type: TetrominoType, x: i16, y: i16) -> Self {
        Self {
            tetromino_type,
            shape: tetromino_type.shape(),
            x,
            y,
        }
    }

    /// Absolute `(row, col)` board coordinates of every filled cell.
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(r, c)| (self.y + r, self.x + c))
    }

    pub(crate) fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    pub(crate) fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated_clockwise(),
            ..self.clone()
        }
    }
}

/// Horizontally centered on the top row; odd widths lean left.
pub fn spawn_position(shape: &Shape) -> (i16, i16) {
    let width = shape.width() as i16;
    let x = (COLS as i16 / 2) - (width + 1) / 2;
    (x, 0)
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> TetrominoType;
}

/// Independent uniform draws over the seven kinds. No bag.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> TetrominoType {
        TetrominoType::ALL[self.rng.gen_range(0..TetrominoType::ALL.len())]
    }
}

pub struct SequencePieceProvider {
    pieces: Vec<TetrominoType>,
    index: usize,
}

impl SequencePieceProvider {
    /// Cycles through `pieces` forever. Panics if `pieces` is empty.
    pub fn new(pieces: Vec<TetrominoType>) -> Self {
        assert!(!pieces.is_empty(), "piece sequence must not be empty");
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> TetrominoType {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_rotations_restore_every_shape() {
        for kind in TetrominoType::ALL {
            let shape = kind.shape();
            let spun = shape
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise();
            assert_eq!(spun, shape, "{kind:?}");
        }
    }

    #[test]
    fn rotation_swaps_dimensions() {
        let i = TetrominoType::I.shape().rotated_clockwise();
        assert_eq!((i.width(), i.height()), (1, 4));

        let t = TetrominoType::T.shape().rotated_clockwise();
        assert_eq!((t.width(), t.height()), (2, 3));
    }

    #[test]
    fn t_rotates_clockwise() {
        // ###      .#
        // .#.  ->  ##
        //          .#
        let t = TetrominoType::T.shape().rotated_clockwise();
        assert_eq!(
            t.rows(),
            &[vec![false, true], vec![true, true], vec![false, true]]
        );
    }

    #[test]
    fn spawn_centers_by_width() {
        assert_eq!(spawn_position(&TetrominoType::I.shape()), (3, 0));
        assert_eq!(spawn_position(&TetrominoType::T.shape()), (3, 0));
        assert_eq!(spawn_position(&TetrominoType::O.shape()), (4, 0));
    }

    #[test]
    fn every_shape_has_four_cells() {
        for kind in TetrominoType::ALL {
            assert_eq!(kind.shape().filled_cells().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn indices_are_one_through_seven() {
        let mut indices: Vec<u8> = TetrominoType::ALL.iter().map(|t| t.index()).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn sequence_provider_cycles() {
        let mut provider = SequencePieceProvider::new(vec![TetrominoType::I, TetrominoType::O]);

        assert_eq!(provider.next_piece(), TetrominoType::I);
        assert_eq!(provider.next_piece(), TetrominoType::O);
        assert_eq!(provider.next_piece(), TetrominoType::I);
    }

    #[test]
    #[should_panic(expected = "piece sequence must not be empty")]
    fn empty_sequence_is_rejected() {
        SequencePieceProvider::new(Vec::new());
    }

    #[test]
    fn seeded_provider_is_reproducible() {
        let mut a = RandomPieceProvider::seeded(7);
        let mut b = RandomPieceProvider::seeded(7);
        let xs: Vec<_> = (0..32).map(|_| a.next_piece()).collect();
        let ys: Vec<_> = (0..32).map(|_| b.next_piece()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn random_provider_covers_all_kinds() {
        let mut provider = RandomPieceProvider::seeded(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(provider.next_piece());
        }
        assert_eq!(seen.len(), 7);
    }
}
