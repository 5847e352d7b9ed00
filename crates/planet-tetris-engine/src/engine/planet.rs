use std::time::Duration;

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::SessionError;

use super::{
    config::GameConfig,
    gravity::GravityTimer,
    input::{InputEvent, SideDirection},
    piece_generator::{PieceGenerator, PieceSeed},
    side::{Side, StepOutcome},
    snapshot::SideSnapshot,
};

/// Fewest sides a planet can have.
pub const MIN_SIDES: usize = 3;
/// Most sides a planet can have.
pub const MAX_SIDES: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    /// Created but not started yet.
    #[default]
    Start,
    Playing,
    Paused,
    /// Every side is over.
    GameOver,
}

/// Emitted once when a side ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverRecord {
    pub side: usize,
    pub score: usize,
    pub level: usize,
    pub rows_cleared: usize,
    pub side_count: usize,
}

/// A planet: several independent sides, one of which is active.
///
/// Only the active side receives input and gravity. Inactive sides keep their
/// full state until they are selected again.
///
/// The session owns the gravity timer. Drivers call [`Self::advance`] with the
/// wall-clock time that passed and [`Self::apply`] for each input event; both
/// return a [`GameOverRecord`] when the active side ends.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use planet_tetris_engine::{
///     GameConfig, InputEvent, PieceSeed, PlanetSession, SessionPhase, SideDirection,
/// };
///
/// let seed = PieceSeed::from_bytes([1; 16]);
/// let mut session = PlanetSession::new("alice", 5, GameConfig::default(), seed).unwrap();
/// assert_eq!(session.phase(), SessionPhase::Start);
///
/// session.start();
/// session.advance(Duration::from_millis(2500));
/// assert_eq!(session.active_side().controller().piece().position().y, 2);
///
/// session.apply(InputEvent::SwitchSide(SideDirection::Previous));
/// assert_eq!(session.active_index(), 4);
/// assert_eq!(session.active_side().controller().piece().position().y, 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPlanetSession", into = "RawPlanetSession")]
pub struct PlanetSession {
    player_name: String,
    config: GameConfig,
    seed: PieceSeed,
    sides: Vec<Side>,
    active: usize,
    phase: SessionPhase,
    soft_drop_held: bool,
    timer: GravityTimer,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlanetSession {
    player_name: String,
    #[serde(default)]
    config: GameConfig,
    seed: PieceSeed,
    sides: Vec<Side>,
    active: usize,
    phase: SessionPhase,
    #[serde(default)]
    soft_drop_held: bool,
}

impl TryFrom<RawPlanetSession> for PlanetSession {
    type Error = SessionError;

    fn try_from(raw: RawPlanetSession) -> Result<Self, Self::Error> {
        check_side_count(raw.sides.len())?;
        if raw.active >= raw.sides.len() {
            return Err(SessionError::SideIndexOutOfRange {
                index: raw.active,
                count: raw.sides.len(),
            });
        }
        let expected = raw.config.dimensions;
        for (index, side) in raw.sides.iter().enumerate() {
            let actual = side.controller().board().dimensions();
            if actual != expected {
                return Err(SessionError::DimensionMismatch {
                    index,
                    actual,
                    expected,
                });
            }
        }

        let mut session = Self {
            player_name: raw.player_name,
            config: raw.config,
            seed: raw.seed,
            sides: raw.sides,
            active: raw.active,
            phase: raw.phase,
            soft_drop_held: raw.soft_drop_held,
            timer: GravityTimer::new(),
        };
        session.rearm_timer();
        Ok(session)
    }
}

impl From<PlanetSession> for RawPlanetSession {
    fn from(session: PlanetSession) -> Self {
        Self {
            player_name: session.player_name,
            config: session.config,
            seed: session.seed,
            sides: session.sides,
            active: session.active,
            phase: session.phase,
            soft_drop_held: session.soft_drop_held,
        }
    }
}

fn check_side_count(count: usize) -> Result<(), SessionError> {
    if !(MIN_SIDES..=MAX_SIDES).contains(&count) {
        return Err(SessionError::SideCountOutOfRange {
            count,
            min: MIN_SIDES,
            max: MAX_SIDES,
        });
    }
    Ok(())
}

fn build_sides(config: &GameConfig, seed: PieceSeed, side_count: usize) -> Vec<Side> {
    seed.split(side_count)
        .into_iter()
        .map(|seed| {
            let generator = PieceGenerator::with_seed(seed, config.selection_policy);
            Side::new(config.dimensions, generator)
        })
        .collect()
}

impl PlanetSession {
    /// Creates a session of `side_count` fresh sides in the [`SessionPhase::Start`] phase.
    pub fn new(
        player_name: impl Into<String>,
        side_count: usize,
        config: GameConfig,
        seed: PieceSeed,
    ) -> Result<Self, SessionError> {
        check_side_count(side_count)?;
        Ok(Self {
            player_name: player_name.into(),
            config,
            seed,
            sides: build_sides(&config, seed, side_count),
            active: 0,
            phase: SessionPhase::Start,
            soft_drop_held: false,
            timer: GravityTimer::new(),
        })
    }

    /// Creates a session from prepared sides, e.g. fixed positions in tests.
    pub fn with_sides(
        player_name: impl Into<String>,
        config: GameConfig,
        seed: PieceSeed,
        sides: Vec<Side>,
    ) -> Result<Self, SessionError> {
        Self::try_from(RawPlanetSession {
            player_name: player_name.into(),
            config,
            seed,
            sides,
            active: 0,
            phase: SessionPhase::Start,
            soft_drop_held: false,
        })
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn side_count(&self) -> usize {
        self.sides.len()
    }

    #[must_use]
    pub fn sides(&self) -> &[Side] {
        &self.sides
    }

    #[must_use]
    pub fn side(&self, index: usize) -> Option<&Side> {
        self.sides.get(index)
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_side(&self) -> &Side {
        &self.sides[self.active]
    }

    #[must_use]
    pub fn is_soft_drop_held(&self) -> bool {
        self.soft_drop_held
    }

    #[must_use]
    pub fn timer(&self) -> &GravityTimer {
        &self.timer
    }

    /// Returns the gravity interval of the active side, including soft drop.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.active_side().drop_interval(self.soft_drop_held)
    }

    /// Sum of the scores of all sides.
    #[must_use]
    pub fn total_score(&self) -> usize {
        self.sides.iter().map(|side| side.progression().score()).sum()
    }

    /// Snapshot of the active side.
    #[must_use]
    pub fn snapshot(&self) -> SideSnapshot {
        SideSnapshot::capture(self.active, self.active_side(), true)
    }

    /// Snapshots of every side, in index order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<SideSnapshot> {
        self.sides
            .iter()
            .enumerate()
            .map(|(index, side)| SideSnapshot::capture(index, side, index == self.active))
            .collect()
    }

    /// Leaves the start screen and arms gravity.
    pub fn start(&mut self) {
        if self.phase.is_start() {
            self.phase = SessionPhase::Playing;
            self.rearm_timer();
        }
    }

    /// Flips between playing and paused. Has no effect in other phases.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            SessionPhase::Playing => SessionPhase::Paused,
            SessionPhase::Paused => SessionPhase::Playing,
            phase => phase,
        };
        self.rearm_timer();
    }

    /// Makes `index` the active side.
    ///
    /// The previous side is left exactly as it is; no simulation step runs.
    pub fn switch_to(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.sides.len() {
            return Err(SessionError::SideIndexOutOfRange {
                index,
                count: self.sides.len(),
            });
        }
        self.active = index;
        self.rearm_timer();
        Ok(())
    }

    /// Moves to the neighbouring side, wrapping around the planet.
    pub fn switch_side(&mut self, direction: SideDirection) {
        let count = self.sides.len();
        let index = match direction {
            SideDirection::Previous => (self.active + count - 1) % count,
            SideDirection::Next => (self.active + 1) % count,
        };
        self.active = index;
        self.rearm_timer();
    }

    /// Replaces every side with `side_count` fresh sides and returns to the start
    /// phase.
    ///
    /// The new sides are seeded from a seed derived from the current one, so a
    /// seeded session stays reproducible across resets.
    pub fn reset_all(&mut self, side_count: usize) -> Result<(), SessionError> {
        check_side_count(side_count)?;
        let seed: PieceSeed = Pcg32::from_seed(self.seed.to_bytes()).random();
        self.seed = seed;
        self.sides = build_sides(&self.config, seed, side_count);
        self.active = 0;
        self.phase = SessionPhase::Start;
        self.soft_drop_held = false;
        self.timer.cancel();
        Ok(())
    }

    /// Applies one input event.
    ///
    /// Piece input only reaches the active side while playing. Returns a record
    /// when the event ended the active side.
    pub fn apply(&mut self, event: InputEvent) -> Option<GameOverRecord> {
        match event {
            InputEvent::Pause => {
                self.toggle_pause();
                return None;
            }
            InputEvent::SwitchSide(direction) => {
                self.switch_side(direction);
                return None;
            }
            InputEvent::SoftDropStart | InputEvent::SoftDropEnd => {
                let held = event.is_soft_drop_start();
                if self.soft_drop_held != held {
                    self.soft_drop_held = held;
                    self.rearm_timer();
                }
                return None;
            }
            _ => {}
        }

        if !self.phase.is_playing() {
            return None;
        }
        let side = &mut self.sides[self.active];
        let outcome = match event {
            InputEvent::MoveLeft => side.move_left(),
            InputEvent::MoveRight => side.move_right(),
            InputEvent::Rotate => side.rotate(true),
            InputEvent::RotateCcw => side.rotate(false),
            InputEvent::HardDrop => side.hard_drop(),
            InputEvent::SoftDropStart
            | InputEvent::SoftDropEnd
            | InputEvent::Pause
            | InputEvent::SwitchSide(_) => StepOutcome::Blocked,
        };
        self.finish_step(outcome)
    }

    /// Runs one gravity step on the active side immediately.
    pub fn tick(&mut self) -> Option<GameOverRecord> {
        if !self.phase.is_playing() {
            return None;
        }
        let outcome = self.sides[self.active].tick(self.soft_drop_held);
        self.finish_step(outcome)
    }

    /// Lets `elapsed` wall-clock time pass.
    ///
    /// The active side accrues play time, and one gravity step runs for every
    /// full drop interval. The interval is re-read after each step, so a level-up
    /// speeds up the remaining steps.
    pub fn advance(&mut self, elapsed: Duration) -> Option<GameOverRecord> {
        if !self.phase.is_playing() {
            return None;
        }
        self.sides[self.active].add_elapsed(elapsed);
        self.timer.add_elapsed(elapsed);
        while self.timer.take_tick() {
            if let Some(record) = self.tick() {
                return Some(record);
            }
            let interval = self.drop_interval();
            self.timer.set_interval(interval);
        }
        None
    }

    fn finish_step(&mut self, outcome: StepOutcome) -> Option<GameOverRecord> {
        if !outcome.is_game_over() {
            return None;
        }
        let side = &self.sides[self.active];
        let record = GameOverRecord {
            side: self.active,
            score: side.progression().score(),
            level: side.progression().level(),
            rows_cleared: side.progression().rows_cleared(),
            side_count: self.sides.len(),
        };
        if self.sides.iter().all(Side::is_game_over) {
            self.phase = SessionPhase::GameOver;
        }
        self.rearm_timer();
        Some(record)
    }

    /// Cancels gravity, then re-arms it with the active side's interval when that
    /// side can still play.
    fn rearm_timer(&mut self) {
        self.timer.cancel();
        if self.phase.is_playing() && !self.active_side().is_game_over() {
            self.timer.arm(self.drop_interval());
        }
    }
}
