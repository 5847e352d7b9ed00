use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{board::BoardDimensions, piece::PieceKind};

use super::{
    controller::PieceController, piece_generator::PieceGenerator, progression::Progression,
};

/// What a single operation on a side did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StepOutcome {
    /// The piece moved or rotated.
    Moved,
    /// The operation had no effect: the piece is blocked, or the side is over.
    Blocked,
    /// The piece locked into the board.
    Locked(LockOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    pub cleared_rows: usize,
    /// Points awarded for the cleared rows.
    pub points: usize,
    /// The lock ended this side.
    pub game_over: bool,
}

impl StepOutcome {
    /// Returns `true` when this step ended the side.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        matches!(self, StepOutcome::Locked(lock) if lock.game_over)
    }
}

/// One face of the planet: a board with its falling piece, progression and
/// game-over flag.
///
/// Every operation is a no-op returning [`StepOutcome::Blocked`] once the side
/// is over.
///
/// # Example
///
/// ```
/// use planet_tetris_engine::{
///     BoardDimensions, PieceGenerator, PieceKind, PieceSeed, SelectionPolicy, Side,
/// };
///
/// let generator = PieceGenerator::with_queue(
///     [PieceKind::O, PieceKind::O],
///     PieceSeed::from_bytes([0; 16]),
///     SelectionPolicy::Uniform,
/// );
/// let mut side = Side::new(BoardDimensions::DEFAULT, generator);
///
/// assert!(side.tick(false).is_moved());
/// assert!(side.hard_drop().is_locked());
/// assert_eq!(side.progression().score(), 22 * 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Side {
    controller: PieceController,
    progression: Progression,
    game_over: bool,
}

impl Side {
    #[must_use]
    pub fn new(dims: BoardDimensions, generator: PieceGenerator) -> Self {
        Self::with_controller(PieceController::new(dims, generator))
    }

    #[must_use]
    pub fn with_controller(controller: PieceController) -> Self {
        Self {
            controller,
            progression: Progression::new(),
            game_over: false,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &PieceController {
        &self.controller
    }

    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn next_kind(&self) -> PieceKind {
        self.controller.next_kind()
    }

    /// Returns the gravity interval of this side.
    #[must_use]
    pub fn drop_interval(&self, soft_drop: bool) -> Duration {
        self.progression.drop_interval(soft_drop)
    }

    pub fn move_left(&mut self) -> StepOutcome {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> StepOutcome {
        self.shift(1)
    }

    fn shift(&mut self, dx: i32) -> StepOutcome {
        if self.game_over || self.controller.try_shift(dx, 0).is_err() {
            return StepOutcome::Blocked;
        }
        StepOutcome::Moved
    }

    pub fn rotate(&mut self, clockwise: bool) -> StepOutcome {
        if self.game_over || self.controller.try_rotate(clockwise).is_err() {
            return StepOutcome::Blocked;
        }
        StepOutcome::Moved
    }

    /// Applies one gravity step.
    ///
    /// The piece falls one row, earning the soft drop bonus when
    /// `soft_drop_held`. A piece that cannot fall locks.
    pub fn tick(&mut self, soft_drop_held: bool) -> StepOutcome {
        if self.game_over {
            return StepOutcome::Blocked;
        }
        if self.controller.try_shift(0, 1).is_ok() {
            if soft_drop_held {
                self.progression.add_soft_drop();
            }
            return StepOutcome::Moved;
        }
        self.lock()
    }

    /// Drops the piece one row immediately, with the soft drop bonus.
    pub fn soft_drop(&mut self) -> StepOutcome {
        self.tick(true)
    }

    /// Drops the piece as far as it goes and locks it, even when it already rests.
    pub fn hard_drop(&mut self) -> StepOutcome {
        if self.game_over {
            return StepOutcome::Blocked;
        }
        let distance = self.controller.hard_drop_distance();
        let dy = i32::try_from(distance).unwrap_or(0);
        if self.controller.try_shift(0, dy).is_err() {
            return StepOutcome::Blocked;
        }
        self.progression.add_hard_drop(distance);
        self.lock()
    }

    /// Adds play time to this side's progression.
    pub fn add_elapsed(&mut self, elapsed: Duration) {
        if !self.game_over {
            self.progression.add_elapsed(elapsed);
        }
    }

    fn lock(&mut self) -> StepOutcome {
        let Ok(result) = self.controller.lock() else {
            // Overlapping restored state; leave the piece stalled.
            return StepOutcome::Blocked;
        };
        let points = self.progression.complete_piece_drop(result.cleared_rows);
        self.game_over = result.topped_out;
        StepOutcome::Locked(LockOutcome {
            cleared_rows: result.cleared_rows,
            points,
            game_over: result.topped_out,
        })
    }
}
