use serde::{Deserialize, Serialize};

/// Color of a locked block.
///
/// Every piece kind has exactly one color (see [`PieceKind::color`](super::PieceKind::color)).
/// Colors serialize as their `#RRGGBB` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "#00FFFF")]
    Cyan,
    #[serde(rename = "#FFFF00")]
    Yellow,
    #[serde(rename = "#9900FF")]
    Purple,
    #[serde(rename = "#FF9900")]
    Orange,
    #[serde(rename = "#0000FF")]
    Blue,
    #[serde(rename = "#00FF00")]
    Green,
    #[serde(rename = "#FF0000")]
    Red,
}

impl Color {
    /// Returns the `#RRGGBB` code of this color.
    ///
    /// # Examples
    ///
    /// ```
    /// use planet_tetris_engine::Color;
    ///
    /// assert_eq!(Color::Cyan.hex(), "#00FFFF");
    /// ```
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Color::Cyan => "#00FFFF",
            Color::Yellow => "#FFFF00",
            Color::Purple => "#9900FF",
            Color::Orange => "#FF9900",
            Color::Blue => "#0000FF",
            Color::Green => "#00FF00",
            Color::Red => "#FF0000",
        }
    }
}

/// A single board cell.
///
/// Serializes as `null` when empty and as the color code when filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Color>", into = "Option<Color>")]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Filled(color) => Some(color),
        }
    }
}

impl From<Option<Color>> for Cell {
    fn from(value: Option<Color>) -> Self {
        value.map_or(Cell::Empty, Cell::Filled)
    }
}

impl From<Cell> for Option<Color> {
    fn from(value: Cell) -> Self {
        value.color()
    }
}
