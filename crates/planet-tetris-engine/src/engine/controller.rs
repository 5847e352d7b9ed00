use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{
    PieceCollisionError,
    core::{
        board::{Board, BoardDimensions},
        piece::{ActivePiece, PieceKind},
    },
};

use super::piece_generator::PieceGenerator;

/// Most positions a rotation tries: in place plus up to four kicks.
const MAX_ROTATION_CANDIDATES: usize = 5;

/// Result of locking the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockResult {
    pub cleared_rows: usize,
    /// The piece locked inside the hidden rows, or the next piece had no room to
    /// spawn.
    pub topped_out: bool,
}

/// Board, falling piece and piece supply of one side.
///
/// The controller enforces that the falling piece never overlaps the board:
/// every move and rotation is validated with [`Board::collides`] first and is
/// dropped when blocked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceController {
    board: Board,
    piece: ActivePiece,
    generator: PieceGenerator,
}

impl PieceController {
    /// Creates an empty board of `dims` and spawns the first piece of `generator`.
    #[must_use]
    pub fn new(dims: BoardDimensions, mut generator: PieceGenerator) -> Self {
        let piece = ActivePiece::spawn(generator.pop_next(), dims.width());
        Self {
            board: Board::new(dims),
            piece,
            generator,
        }
    }

    /// Builds a controller around an existing board, e.g. a prepared test position.
    #[must_use]
    pub fn with_board(board: Board, mut generator: PieceGenerator) -> Self {
        let piece = ActivePiece::spawn(generator.pop_next(), board.width());
        Self {
            board,
            piece,
            generator,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn piece(&self) -> &ActivePiece {
        &self.piece
    }

    #[must_use]
    pub fn generator(&self) -> &PieceGenerator {
        &self.generator
    }

    /// Returns the kind that spawns after the current piece locks.
    #[must_use]
    pub fn next_kind(&self) -> PieceKind {
        self.generator.peek_next()
    }

    /// Shifts the piece by `(dx, dy)` when the destination is free.
    pub fn try_shift(&mut self, dx: i32, dy: i32) -> Result<(), PieceCollisionError> {
        if self
            .board
            .collides(self.piece.shape(), self.piece.position(), dx, dy)
        {
            return Err(PieceCollisionError);
        }
        self.piece = self.piece.moved(dx, dy);
        Ok(())
    }

    /// Rotates the piece by 90°, trying wall kicks when the rotation collides in
    /// place.
    ///
    /// The first position that fits wins; when none fits, the piece is unchanged.
    pub fn try_rotate(&mut self, clockwise: bool) -> Result<(), PieceCollisionError> {
        let shape = self.piece.shape().rotated(clockwise);
        let origin = self.piece.position();

        let mut candidates = ArrayVec::<_, MAX_ROTATION_CANDIDATES>::new();
        candidates.push(origin);
        for &dx in self.piece.kind().kick_offsets() {
            candidates.push(origin.offset(dx, 0));
        }

        let position = candidates
            .into_iter()
            .find(|&position| !self.board.collides(&shape, position, 0, 0))
            .ok_or(PieceCollisionError)?;
        self.piece = self.piece.reshaped(shape, position);
        Ok(())
    }

    /// Returns how many rows the piece can fall before it rests.
    ///
    /// The search stops at the board height even when the piece never collides.
    #[must_use]
    pub fn hard_drop_distance(&self) -> usize {
        let max = self.board.height();
        (0..max)
            .find(|&n| {
                let dy = i32::try_from(n + 1).unwrap_or(i32::MAX);
                self.board
                    .collides(self.piece.shape(), self.piece.position(), 0, dy)
            })
            .unwrap_or(max)
    }

    /// Returns the piece moved to where a hard drop would lock it.
    #[must_use]
    pub fn ghost_piece(&self) -> ActivePiece {
        let distance = i32::try_from(self.hard_drop_distance()).unwrap_or(0);
        self.piece.moved(0, distance)
    }

    /// Merges the piece into the board, sweeps full rows and spawns the next piece.
    ///
    /// A piece whose origin lies inside the hidden rows tops the side out and no
    /// further piece is spawned. A spawned piece that already collides tops out as
    /// well.
    ///
    /// Fails without touching the board when the piece overlaps the board, which
    /// can only happen with corrupted restored state.
    pub fn lock(&mut self) -> Result<LockResult, PieceCollisionError> {
        let piece = self.piece.marked_collided();
        let cleared_rows =
            self.board
                .lock_and_sweep(piece.shape(), piece.position(), piece.color())?;
        self.piece = piece;

        if self.board.is_hidden_row(piece.position().y) {
            return Ok(LockResult {
                cleared_rows,
                topped_out: true,
            });
        }

        self.piece = ActivePiece::spawn(self.generator.pop_next(), self.board.width());
        let topped_out = self
            .board
            .collides(self.piece.shape(), self.piece.position(), 0, 0);
        Ok(LockResult {
            cleared_rows,
            topped_out,
        })
    }
}
