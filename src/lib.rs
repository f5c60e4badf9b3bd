pub mod board;
pub mod game;
pub mod piece;
pub mod scoring;
pub mod timer;

pub use board::{Board, CellState, COLS, ROWS};
pub use game::{Game, GameEvent, GameStatus};
pub use piece::{
    Piece, PieceProvider, RandomPieceProvider, SequencePieceProvider, Shape, TetrominoType,
};
pub use scoring::Progression;
pub use timer::DropTimer;
