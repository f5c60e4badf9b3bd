use std::time::Duration;

pub const LINES_PER_LEVEL: u32 = 10;

// Points per simultaneous clear, multiplied by level.
pub const SCORE_SINGLE: u32 = 40;
pub const SCORE_DOUBLE: u32 = 100;
pub const SCORE_TRIPLE: u32 = 300;
pub const SCORE_TETRIS: u32 = 1200;

// Timing (in milliseconds)
const BASE_DROP_MS: u64 = 1000;
const MIN_DROP_MS: u64 = 100;
const SPEED_INCREASE_PER_LEVEL: u64 = 100;

pub fn line_clear_points(lines: u32) -> u32 {
    match lines {
        1 => SCORE_SINGLE,
        2 => SCORE_DOUBLE,
        3 => SCORE_TRIPLE,
        4 => SCORE_TETRIS,
        _ => 0,
    }
}

pub fn level_for_lines(lines_cleared: u32) -> u32 {
    lines_cleared / LINES_PER_LEVEL + 1
}

pub fn drop_interval_ms(level: u32) -> u64 {
    let speed_reduction = u64::from(level.saturating_sub(1)) * SPEED_INCREASE_PER_LEVEL;
    BASE_DROP_MS.saturating_sub(speed_reduction).max(MIN_DROP_MS)
}

/// Score, level, line total and gravity speed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Progression {
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub drop_interval_ms: u64,
}

impl Progression {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines_cleared: 0,
            drop_interval_ms: drop_interval_ms(1),
        }
    }

    pub fn drop_interval(&self) -> Duration {
        Duration::from_millis(self.drop_interval_ms)
    }

    /// Applies one lock's worth of cleared lines. Points use the level in
    /// effect before this clear. Returns true if the level went up.
    pub fn record_clear(&mut self, lines: u32) -> bool {
        if lines == 0 {
            return false;
        }
        self.score = self
            .score
            .saturating_add(line_clear_points(lines).saturating_mul(self.level));
        self.lines_cleared += lines;

        let previous = self.level;
        self.level = level_for_lines(self.lines_cleared);
        self.drop_interval_ms = drop_interval_ms(self.level);
        self.level > previous
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}
