use serde::Serialize;

use crate::core::{
    cell::Cell,
    piece::{ActivePiece, PieceKind, Position},
};

use super::{progression::Progression, side::Side};

/// Read-only view of one side for renderers.
///
/// `rows` holds the visible play field with the falling piece already drawn in;
/// hidden buffer rows are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SideSnapshot {
    pub index: usize,
    pub active: bool,
    pub rows: Vec<Vec<Cell>>,
    /// The falling piece, absent once the side is over.
    pub piece: Option<ActivePiece>,
    /// Where a hard drop would lock the falling piece.
    pub ghost: Option<Position>,
    pub next: PieceKind,
    pub progression: Progression,
    pub game_over: bool,
}

impl SideSnapshot {
    #[must_use]
    pub fn capture(index: usize, side: &Side, active: bool) -> Self {
        let board = side.controller().board();
        let mut rows: Vec<Vec<Cell>> = board.visible_rows().map(<[Cell]>::to_vec).collect();
        let piece = (!side.is_game_over()).then(|| *side.controller().piece());
        let ghost = piece.map(|_| side.controller().ghost_piece().position());

        if let Some(piece) = &piece {
            let hidden = i32::try_from(board.hidden_rows()).unwrap_or(i32::MAX);
            for (x, y) in piece.occupied_positions() {
                let Some(y) = y.checked_sub(hidden) else {
                    continue;
                };
                let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                    continue;
                };
                if let Some(cell) = rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                    *cell = Cell::Filled(piece.color());
                }
            }
        }

        Self {
            index,
            active,
            rows,
            piece,
            ghost,
            next: side.next_kind(),
            progression: side.progression().clone(),
            game_over: side.is_game_over(),
        }
    }
}
