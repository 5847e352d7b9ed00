use std::fmt::Write as _;

use planet_tetris_engine::{Cell, PieceKind, SideSnapshot};

/// Character used for an empty cell.
const EMPTY: char = '.';

fn cell_char(cell: Cell) -> char {
    match cell.color() {
        None => EMPTY,
        Some(color) => PieceKind::ALL
            .into_iter()
            .find(|kind| kind.color() == color)
            .map_or('#', PieceKind::as_char),
    }
}

/// Draws the visible rows of a side between walls, with a status line below.
pub(crate) fn render_side(snapshot: &SideSnapshot) -> String {
    let width = snapshot.rows.first().map_or(0, Vec::len);
    let mut out = String::new();
    for row in &snapshot.rows {
        out.push('|');
        out.extend(row.iter().map(|&cell| cell_char(cell)));
        out.push_str("|\n");
    }
    out.push('+');
    out.extend(std::iter::repeat_n('-', width));
    out.push_str("+\n");

    let progression = &snapshot.progression;
    let _ = write!(
        out,
        "side {} | next {} | score {} | level {} | rows {}",
        snapshot.index + 1,
        snapshot.next.as_char(),
        progression.score(),
        progression.level(),
        progression.rows_cleared(),
    );
    if snapshot.game_over {
        out.push_str(" | GAME OVER");
    }
    out.push('\n');
    out
}
