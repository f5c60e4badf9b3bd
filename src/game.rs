use std::time::Duration;

use crate::board::{Board, CellState, COLS, ROWS};
use crate::piece::{Piece, PieceProvider, RandomPieceProvider};
use crate::scoring::Progression;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    Running,
    Paused,
    Over,
}

/// Notifications for presentation and audio collaborators, drained with
/// [`Game::take_events`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Started,
    Moved,
    Locked,
    LinesCleared(u32),
    LevelUp(u32),
    /// The gravity period changed; the scheduler should cancel its pending
    /// tick and re-arm with this interval.
    Reschedule(Duration),
    Paused,
    Resumed,
    GameOver { final_score: u32 },
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    board: Board,
    active: Piece,
    next: Piece,
    progression: Progression,
    status: GameStatus,
    piece_provider: Box<dyn PieceProvider>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::new()))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::seeded(seed)))
    }

    /// A running game on an empty board. The first draw becomes the active
    /// piece and the second the preview.
    pub fn with_provider(mut provider: Box<dyn PieceProvider>) -> Self {
        let active = Piece::new(provider.next_piece());
        let next = Piece::new(provider.next_piece());

        let mut game = Self {
            board: Board::new(),
            active,
            next,
            progression: Progression::new(),
            status: GameStatus::Running,
            piece_provider: provider,
            events: Vec::new(),
        };
        game.announce_start();
        game
    }

    /// A game resumed from an arbitrary position. Only the preview piece is
    /// drawn from `provider`. No `Started` or `Reschedule` is queued; the
    /// caller already owns a schedule at the default interval. If `active`
    /// overlaps the stack the game starts topped out.
    pub fn with_board(board: Board, active: Piece, mut provider: Box<dyn PieceProvider>) -> Self {
        let next = Piece::new(provider.next_piece());
        let mut game = Self {
            board,
            active,
            next,
            progression: Progression::new(),
            status: GameStatus::Running,
            piece_provider: provider,
            events: Vec::new(),
        };
        game.top_out_if_blocked();
        game
    }

    // ------------------------------------------------------------------------
    // Read API
    // ------------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_piece(&self) -> &Piece {
        &self.active
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    pub fn progression(&self) -> Progression {
        self.progression
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::Over
    }

    /// Row the active piece would lock at if hard-dropped now.
    pub fn ghost_y(&self) -> i16 {
        let mut ghost = self.active.clone();
        loop {
            let lowered = ghost.moved(0, 1);
            if self.board.collides(&lowered) {
                return ghost.y;
            }
            ghost = lowered;
        }
    }

    /// The board with the active piece painted over it.
    pub fn render_grid(&self) -> Vec<Vec<CellState>> {
        let mut visual = self.board.rows().to_vec();
        let tag = CellState::Filled(self.active.tetromino_type);
        for (row, col) in self.active.cells() {
            if row >= 0 && row < ROWS as i16 && col >= 0 && col < COLS as i16 {
                visual[row as usize][col as usize] = tag;
            }
        }
        visual
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Resets board, progression and pieces from any status.
    pub fn start(&mut self) {
        self.board = Board::new();
        self.progression = Progression::new();
        self.events.clear();

        self.active = Piece::new(self.piece_provider.next_piece());
        self.next = Piece::new(self.piece_provider.next_piece());
        self.status = GameStatus::Running;

        self.announce_start();
    }

    /// Gravity step. Does nothing unless running.
    pub fn tick(&mut self) {
        if self.status != GameStatus::Running {
            return;
        }
        self.soft_drop();
    }

    /// Moves the piece down one row, or locks it if it cannot move. Returns
    /// true if the piece moved.
    pub fn soft_drop(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        let lowered = self.active.moved(0, 1);
        if self.board.collides(&lowered) {
            self.lock_and_advance();
            false
        } else {
            self.active = lowered;
            true
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.move_horizontal(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.move_horizontal(1)
    }

    pub fn move_horizontal(&mut self, dx: i16) -> bool {
        if self.is_game_over() {
            return false;
        }
        let moved = self.active.moved(dx, 0);
        if self.board.collides(&moved) {
            return false;
        }
        self.active = moved;
        self.events.push(GameEvent::Moved);
        true
    }

    /// Clockwise rotation in place. A blocked rotation is rejected outright;
    /// there are no wall kicks.
    pub fn rotate(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        let rotated = self.active.rotated();
        if self.board.collides(&rotated) {
            return false;
        }
        self.active = rotated;
        self.events.push(GameEvent::Moved);
        true
    }

    pub fn hard_drop(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.active.y = self.ghost_y();
        self.events.push(GameEvent::Moved);
        self.lock_and_advance();
    }

    pub fn toggle_pause(&mut self) {
        match self.status {
            GameStatus::Running => {
                self.status = GameStatus::Paused;
                self.events.push(GameEvent::Paused);
            }
            GameStatus::Paused => {
                self.status = GameStatus::Running;
                self.events.push(GameEvent::Resumed);
            }
            GameStatus::Over => {}
        }
    }

    // ------------------------------------------------------------------------
    // Lock / advance
    // ------------------------------------------------------------------------

    fn lock_and_advance(&mut self) {
        self.board.merge(&self.active);
        self.events.push(GameEvent::Locked);

        let lines = self.board.clear_completed_lines();
        if lines > 0 {
            self.events.push(GameEvent::LinesCleared(lines));

            let interval_before = self.progression.drop_interval_ms;
            if self.progression.record_clear(lines) {
                self.events.push(GameEvent::LevelUp(self.progression.level));
            }
            if self.progression.drop_interval_ms != interval_before {
                self.events
                    .push(GameEvent::Reschedule(self.progression.drop_interval()));
            }
        }

        self.spawn_next_piece();
    }

    /// Promotes the preview piece and draws a new one. Tops out if the
    /// promoted piece overlaps the stack.
    fn spawn_next_piece(&mut self) {
        let upcoming = Piece::new(self.piece_provider.next_piece());
        self.active = std::mem::replace(&mut self.next, upcoming);
        self.top_out_if_blocked();
    }

    fn top_out_if_blocked(&mut self) {
        if self.board.collides(&self.active) {
            self.status = GameStatus::Over;
            self.events.push(GameEvent::GameOver {
                final_score: self.progression.score,
            });
        }
    }

    fn announce_start(&mut self) {
        self.events.push(GameEvent::Started);
        self.events
            .push(GameEvent::Reschedule(self.progression.drop_interval()));
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::piece::TetrominoType;

    pub fn empty_board() -> Board {
        Board::new()
    }

    pub fn fill_row(board: &mut Board, row: usize) {
        for col in 0..COLS {
            board.set(row, col, CellState::Filled(TetrominoType::T));
        }
    }

    pub fn fill_row_with_gap(board: &mut Board, row: usize, gap_col: usize) {
        for col in 0..COLS {
            if col != gap_col {
                board.set(row, col, CellState::Filled(TetrominoType::T));
            }
        }
    }

    pub fn fill_cell(board: &mut Board, row: usize, col: usize, kind: TetrominoType) {
        board.set(row, col, CellState::Filled(kind));
    }
}
