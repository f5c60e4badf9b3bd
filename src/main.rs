use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout, Write},
    time::Instant,
};

use blockfall::{CellState, DropTimer, Game, GameEvent, GameStatus, TetrominoType, COLS, ROWS};

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "blockfall")]
#[command(about = "Falling-block puzzle in the terminal")]
struct Cli {
    /// Seed for the piece generator; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Ring the terminal bell on line clears and game over
    #[arg(long, default_value_t = false)]
    bell: bool,
}

// ============================================================================
// Cell Glyphs
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const GHOST_CHAR: &str = "░░";
const EMPTY_CHAR: &str = "  ";

// ============================================================================
// Color Mapping
// ============================================================================

fn tetromino_color(t: TetrominoType) -> Color {
    match t {
        TetrominoType::I => Color::Cyan,
        TetrominoType::O => Color::Yellow,
        TetrominoType::T => Color::Magenta,
        TetrominoType::S => Color::Green,
        TetrominoType::Z => Color::Red,
        TetrominoType::J => Color::Blue,
        TetrominoType::L => Color::Rgb(255, 165, 0),
    }
}

// ============================================================================
// Notification Handling
// ============================================================================

/// Everything the presentation side keeps between frames.
struct Session {
    game: Game,
    timer: DropTimer,
    bell: bool,
    last_notice: String,
}

impl Session {
    fn new(cli: &Cli) -> Self {
        let game = match cli.seed {
            Some(seed) => Game::with_seed(seed),
            None => Game::new(),
        };
        let interval = game.progression().drop_interval();
        let mut session = Self {
            game,
            timer: DropTimer::new(interval, Instant::now()),
            bell: cli.bell,
            last_notice: String::new(),
        };
        session.drain_events();
        session
    }

    fn drain_events(&mut self) {
        for event in self.game.take_events() {
            match event {
                GameEvent::Reschedule(interval) => self.timer.rearm(interval, Instant::now()),
                GameEvent::LinesCleared(count) => {
                    self.last_notice = format!("{count} line(s)!");
                    self.ring();
                }
                GameEvent::LevelUp(level) => self.last_notice = format!("Level {level}"),
                GameEvent::GameOver { final_score } => {
                    self.last_notice = format!("Final {final_score}");
                    self.ring();
                }
                GameEvent::Started => self.last_notice.clear(),
                GameEvent::Moved
                | GameEvent::Locked
                | GameEvent::Paused
                | GameEvent::Resumed => {}
            }
        }
    }

    /// Audio cue. A failed write is ignored; it must never reach game state.
    fn ring(&self) {
        if self.bell {
            let mut out = stdout();
            let _ = out.write_all(b"\x07").and_then(|_| out.flush());
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

const GRID_PANEL_WIDTH: u16 = COLS as u16 * CELL_WIDTH + 2;
const GRID_PANEL_HEIGHT: u16 = ROWS as u16 + 2;
const SIDE_PANEL_WIDTH: u16 = 16;
const CONTROLS: &str =
    "←→ move  ↑ rotate  ↓ drop  space slam  p pause  r restart  q quit";

fn render(frame: &mut Frame, session: &Session) {
    let area = frame.size();
    render_playfield(frame, session, area);

    let progression = session.game.progression();
    match session.game.status() {
        GameStatus::Running => {}
        GameStatus::Paused => render_popup(
            frame,
            area,
            " Paused ",
            vec![
                styled("PAUSED", Color::Yellow),
                Line::from(""),
                styled("p to continue", Color::DarkGray),
            ],
        ),
        GameStatus::Over => render_popup(
            frame,
            area,
            " Game Over ",
            vec![
                styled("GAME OVER", Color::Red),
                Line::from(""),
                Line::from(format!("Score {}", progression.score)),
                Line::from(format!("Lines {}", progression.lines_cleared)),
                Line::from(format!("Level {}", progression.level)),
                Line::from(""),
                styled("r restart, q quit", Color::DarkGray),
            ],
        ),
    }
}

fn styled(text: &str, color: Color) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(color)))
}

fn titled(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_alignment(Alignment::Center)
}

/// Grid on the left, preview and stats stacked on the right, key help below.
fn render_playfield(frame: &mut Frame, session: &Session, area: Rect) {
    let width = GRID_PANEL_WIDTH + SIDE_PANEL_WIDTH;
    let height = GRID_PANEL_HEIGHT + 1;
    let outer = centered(area, width, height);

    let [board_row, help_row] = split2(Layout::vertical([
        Constraint::Length(GRID_PANEL_HEIGHT),
        Constraint::Length(1),
    ])
    .split(outer));
    let [grid_area, side_area] = split2(Layout::horizontal([
        Constraint::Length(GRID_PANEL_WIDTH),
        Constraint::Length(SIDE_PANEL_WIDTH),
    ])
    .split(board_row));
    let [preview_area, info_area] = split2(Layout::vertical([
        Constraint::Length(6),
        Constraint::Fill(1),
    ])
    .split(side_area));

    render_grid(frame, &session.game, grid_area);
    render_preview(frame, &session.game, preview_area);
    render_info(frame, session, info_area);

    let help = Paragraph::new(CONTROLS)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, Rect { x: area.x, width: area.width, ..help_row });
}

fn split2(chunks: std::rc::Rc<[Rect]>) -> [Rect; 2] {
    [chunks[0], chunks[1]]
}

fn render_grid(frame: &mut Frame, game: &Game, area: Rect) {
    let block = titled(" Blockfall ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active = game.active_piece();
    let drop_by = game.ghost_y() - active.y;
    let ghost: Vec<(i16, i16)> = active.cells().map(|(r, c)| (r + drop_by, c)).collect();
    let ghost_style = Style::default().fg(tetromino_color(active.tetromino_type));

    let lines: Vec<Line> = game
        .render_grid()
        .iter()
        .enumerate()
        .map(|(r, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(c, cell)| match cell {
                    CellState::Filled(kind) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(tetromino_color(*kind)))
                    }
                    CellState::Empty if ghost.contains(&(r as i16, c as i16)) => {
                        Span::styled(GHOST_CHAR, ghost_style)
                    }
                    CellState::Empty => Span::raw(EMPTY_CHAR),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_preview(frame: &mut Frame, game: &Game, area: Rect) {
    let block = titled(" Next ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let next = game.next_piece();
    let style = Style::default().fg(tetromino_color(next.tetromino_type));

    let lines: Vec<Line> = next
        .shape
        .rows()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&filled| {
                    if filled {
                        Span::styled(BLOCK_CHAR, style)
                    } else {
                        Span::raw(EMPTY_CHAR)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_info(frame: &mut Frame, session: &Session, area: Rect) {
    let block = titled(" Stats ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let p = session.game.progression();
    let stats = [
        ("Score", p.score.to_string(), Color::Yellow),
        ("Lines", p.lines_cleared.to_string(), Color::Cyan),
        ("Level", p.level.to_string(), Color::Green),
        ("Gravity", format!("{} ms", p.drop_interval_ms), Color::Magenta),
    ];

    let mut lines: Vec<Line> = Vec::new();
    for (label, value, color) in stats {
        lines.push(styled(label, color));
        lines.push(Line::from(value));
    }
    lines.push(Line::from(""));
    lines.push(styled(session.last_notice.as_str(), Color::White));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_popup(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let height = lines.len() as u16 + 2;
    let popup = centered(area, 24, height);

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(titled(title).style(Style::default().bg(Color::Black)));

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

/// A `width` x `height` rect in the middle of `area`, clipped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

// ============================================================================
// Main Loop
// ============================================================================

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, session: &mut Session) -> Result<()> {
    loop {
        terminal
            .draw(|frame| render(frame, session))
            .context("failed to draw frame")?;

        let timeout = session.timer.time_until_due(Instant::now());

        if event::poll(timeout).context("failed to poll input")? {
            if let Event::Key(key) = event::read().context("failed to read input")? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => break,
                        KeyCode::Char('p') | KeyCode::Char('P') => session.game.toggle_pause(),
                        KeyCode::Char('r') | KeyCode::Char('R') => session.game.start(),
                        // Paused input is held back here; the game itself would accept it.
                        _ if session.game.status() == GameStatus::Running => match key.code {
                            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                                session.game.move_left();
                            }
                            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                                session.game.move_right();
                            }
                            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                                session.game.soft_drop();
                            }
                            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                                session.game.rotate();
                            }
                            KeyCode::Char(' ') => session.game.hard_drop(),
                            _ => {}
                        },
                        _ => {}
                    }
                }
            }
        }

        if session.timer.fire_if_due(Instant::now()) {
            session.game.tick();
        }

        session.drain_events();
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut session = Session::new(&cli);

    enable_raw_mode().context("failed to enable raw mode")?;
    stdout()
        .execute(EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run(&mut terminal, &mut session);

    // Restore the terminal even when the loop failed.
    disable_raw_mode().context("failed to disable raw mode")?;
    stdout()
        .execute(LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}
