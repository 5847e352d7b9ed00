use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Score values for line clears, before the level multiplier.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
///
/// Clears of more than four rows score nothing.
pub const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Points per row descended by a held soft drop.
pub const SOFT_DROP_POINTS: usize = 1;
/// Points per row descended by a hard drop.
pub const HARD_DROP_POINTS: usize = 2;
/// Cleared rows needed to advance one level.
pub const ROWS_PER_LEVEL: usize = 10;

pub const INITIAL_DROP_INTERVAL: Duration = Duration::from_millis(1000);
pub const MIN_DROP_INTERVAL: Duration = Duration::from_millis(50);
/// Multiplier applied to the drop interval per level above the first.
pub const LEVEL_SPEED_FACTOR: f64 = 0.75;
/// Multiplier applied to the drop interval while soft drop is held.
pub const SOFT_DROP_FACTOR: f64 = 0.1;

/// Returns the level reached after clearing `rows_cleared` rows.
///
/// # Examples
///
/// ```
/// use planet_tetris_engine::level_for_rows;
///
/// assert_eq!(level_for_rows(0), 1);
/// assert_eq!(level_for_rows(9), 1);
/// assert_eq!(level_for_rows(10), 2);
/// assert_eq!(level_for_rows(35), 4);
/// ```
#[must_use]
pub const fn level_for_rows(rows_cleared: usize) -> usize {
    1 + rows_cleared / ROWS_PER_LEVEL
}

/// Returns the gravity interval at `level`.
///
/// The interval shrinks by [`LEVEL_SPEED_FACTOR`] per level and by
/// [`SOFT_DROP_FACTOR`] while soft drop is held, and never goes below
/// [`MIN_DROP_INTERVAL`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use planet_tetris_engine::drop_interval;
///
/// assert_eq!(drop_interval(1, false), Duration::from_millis(1000));
/// assert_eq!(drop_interval(2, false), Duration::from_millis(750));
/// assert_eq!(drop_interval(1, true), Duration::from_millis(100));
/// assert_eq!(drop_interval(30, false), Duration::from_millis(50));
/// ```
#[must_use]
pub fn drop_interval(level: usize, soft_drop: bool) -> Duration {
    let exponent = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
    let mut interval = INITIAL_DROP_INTERVAL
        .mul_f64(LEVEL_SPEED_FACTOR.powi(exponent))
        .max(MIN_DROP_INTERVAL);
    if soft_drop {
        interval = interval.mul_f64(SOFT_DROP_FACTOR);
    }
    round_to_micros(interval).max(MIN_DROP_INTERVAL)
}

fn round_to_micros(duration: Duration) -> Duration {
    let micros = (duration.as_nanos() + 500) / 1000;
    Duration::from_micros(u64::try_from(micros).unwrap_or(u64::MAX))
}

/// Score, level and statistics of one side.
///
/// - **Score**: line clears (scaled by level) plus soft and hard drop bonuses
/// - **Level**: derived from total rows cleared (one level per 10 rows)
/// - **Completed pieces**: total number of pieces locked
/// - **Line clear distribution**: count of 0, 1, 2, 3 and 4 row clears
/// - **Elapsed**: time this side has been played
///
/// # Example
///
/// ```
/// use planet_tetris_engine::Progression;
///
/// let mut progression = Progression::new();
/// let points = progression.complete_piece_drop(4); // Tetris (4 lines)
///
/// assert_eq!(points, 800);
/// assert_eq!(progression.score(), 800);
/// assert_eq!(progression.rows_cleared(), 4);
/// assert_eq!(progression.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawProgression", into = "RawProgression")]
pub struct Progression {
    score: usize,
    rows_cleared: usize,
    level: usize,
    elapsed: Duration,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProgression {
    score: usize,
    rows_cleared: usize,
    #[serde(default)]
    level: usize,
    #[serde(default)]
    elapsed_ms: u64,
    #[serde(default)]
    completed_pieces: usize,
    #[serde(default)]
    line_cleared_counter: [usize; 5],
}

impl From<RawProgression> for Progression {
    fn from(raw: RawProgression) -> Self {
        Self {
            score: raw.score,
            rows_cleared: raw.rows_cleared,
            level: level_for_rows(raw.rows_cleared),
            elapsed: Duration::from_millis(raw.elapsed_ms),
            completed_pieces: raw.completed_pieces,
            line_cleared_counter: raw.line_cleared_counter,
        }
    }
}

impl From<Progression> for RawProgression {
    fn from(progression: Progression) -> Self {
        Self {
            score: progression.score,
            rows_cleared: progression.rows_cleared,
            level: progression.level,
            elapsed_ms: u64::try_from(progression.elapsed.as_millis()).unwrap_or(u64::MAX),
            completed_pieces: progression.completed_pieces,
            line_cleared_counter: progression.line_cleared_counter,
        }
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    /// Creates a progression at level 1 with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            rows_cleared: 0,
            level: 1,
            elapsed: Duration::ZERO,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn rows_cleared(&self) -> usize {
        self.rows_cleared
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Returns the time this side has spent in play.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns a histogram of line clears by count.
    ///
    /// Index `n` counts the locks that cleared `n` rows at once.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Returns the gravity interval at the current level.
    #[must_use]
    pub fn drop_interval(&self, soft_drop: bool) -> Duration {
        drop_interval(self.level, soft_drop)
    }

    /// Updates statistics after a piece lock and returns the points awarded.
    ///
    /// Clears are scored with the level in effect before the clear, then the
    /// level is recomputed from the new row total.
    pub fn complete_piece_drop(&mut self, cleared_rows: usize) -> usize {
        let points = SCORE_TABLE.get(cleared_rows).copied().unwrap_or(0) * self.level;
        self.score += points;
        self.completed_pieces += 1;
        self.rows_cleared += cleared_rows;
        self.level = level_for_rows(self.rows_cleared);
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_rows) {
            *count += 1;
        }
        points
    }

    /// Awards the bonus for one row descended by soft drop.
    pub fn add_soft_drop(&mut self) {
        self.score += SOFT_DROP_POINTS;
    }

    /// Awards the bonus for a hard drop of `distance` rows.
    pub fn add_hard_drop(&mut self, distance: usize) {
        self.score += distance * HARD_DROP_POINTS;
    }

    pub fn add_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = self.elapsed.saturating_add(elapsed);
    }
}
