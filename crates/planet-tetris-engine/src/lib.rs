//! Simulation core of a multi-sided falling-block puzzle.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - Plain data: piece catalog, shapes, cells and the [`Board`]
//! - [`engine`] - Rules: the active-piece controller, progression and scoring,
//!   and the [`PlanetSession`] that owns every side of the planet
//!
//! Nothing here performs I/O or reads the clock. Drivers feed input events and
//! elapsed time into a [`PlanetSession`] and read snapshots back.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use planet_tetris_engine::{GameConfig, InputEvent, PieceSeed, PlanetSession};
//!
//! let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
//! let mut session = PlanetSession::new("player", 4, GameConfig::default(), seed).unwrap();
//! session.start();
//!
//! session.apply(InputEvent::MoveLeft);
//! session.apply(InputEvent::HardDrop);
//! session.advance(Duration::from_secs(3));
//!
//! assert_eq!(session.active_side().progression().completed_pieces(), 1);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board or its walls")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    #[display("a planet has {min} to {max} sides, got {count}")]
    SideCountOutOfRange { count: usize, min: usize, max: usize },
    #[display("side {index} does not exist on a planet with {count} sides")]
    SideIndexOutOfRange { index: usize, count: usize },
    #[display("side {index} has a {actual} board, expected {expected}")]
    DimensionMismatch {
        index: usize,
        actual: BoardDimensions,
        expected: BoardDimensions,
    },
}
