//! Game rules built on top of the [`core`](crate::core) data structures.
//!
//! - [`PieceController`] - Board, falling piece and piece supply of one side
//! - [`Progression`] - Score, level and drop-speed curve
//! - [`Side`] - Controller plus progression plus the game-over flag
//! - [`PlanetSession`] - All sides of a planet, the active index and gravity
//! - [`PieceGenerator`] - Seeded piece supply (uniform or 7-bag)
//! - [`GravityTimer`] - Turns elapsed time into gravity ticks
//!
//! # Game Flow
//!
//! 1. Create a [`PlanetSession`] and [`start`](PlanetSession::start) it
//! 2. Feed [`InputEvent`]s with [`PlanetSession::apply`]
//! 3. Feed elapsed time with [`PlanetSession::advance`]; gravity moves the
//!    active piece down and locks it when it rests
//! 4. Locks sweep full rows and score them; the next piece spawns
//! 5. A side ends when a piece locks inside the hidden rows or the next piece
//!    cannot spawn; the session ends when every side has ended

pub use self::{
    config::*, controller::*, gravity::*, input::*, piece_generator::*, planet::*,
    progression::*, side::*, snapshot::*,
};

mod config;
mod controller;
mod gravity;
mod input;
mod piece_generator;
mod planet;
mod progression;
mod side;
mod snapshot;
