use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{cell::Color, shape::PieceShape};

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// L-piece.
    L = 3,
    /// J-piece.
    J = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

/// Horizontal offsets tried, in order, when a rotated I piece collides.
const I_KICKS: [i32; 4] = [-1, -2, 1, 2];
/// Horizontal offsets tried, in order, when any other rotated piece collides.
const DEFAULT_KICKS: [i32; 2] = [-1, 1];

const PIECE_SHAPES: [PieceShape; PieceKind::LEN] = [
    PieceShape::square([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
    PieceShape::square([[1, 1], [1, 1]]),
    PieceShape::square([[0, 1, 0], [1, 1, 1], [0, 0, 0]]),
    PieceShape::square([[0, 0, 1], [1, 1, 1], [0, 0, 0]]),
    PieceShape::square([[1, 0, 0], [1, 1, 1], [0, 0, 0]]),
    PieceShape::square([[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
    PieceShape::square([[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
];

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Returns the canonical 0° shape of this kind.
    #[must_use]
    pub const fn shape(self) -> PieceShape {
        PIECE_SHAPES[self as usize]
    }

    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            PieceKind::I => Color::Cyan,
            PieceKind::O => Color::Yellow,
            PieceKind::T => Color::Purple,
            PieceKind::L => Color::Orange,
            PieceKind::J => Color::Blue,
            PieceKind::S => Color::Green,
            PieceKind::Z => Color::Red,
        }
    }

    /// Wall-kick offsets tried after a colliding rotation.
    ///
    /// The 4-wide I piece may shift up to two columns each way; all other kinds
    /// shift one column.
    #[must_use]
    pub const fn kick_offsets(self) -> &'static [i32] {
        match self {
            PieceKind::I => &I_KICKS,
            _ => &DEFAULT_KICKS,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use planet_tetris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use planet_tetris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Top-left corner of a piece's shape matrix in board coordinates.
///
/// `x` grows rightward, `y` grows downward. Coordinates are signed because the
/// empty border of a matrix may hang outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Moves the position by `(dx, dy)`, saturating at the `i32` range.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// The falling piece of one side.
///
/// Pieces are values: movement and rotation return new `ActivePiece` instances,
/// and the controller replaces its piece wholesale.
///
/// # Example
///
/// ```
/// use planet_tetris_engine::{ActivePiece, PieceKind, Position};
///
/// let piece = ActivePiece::spawn(PieceKind::T, 10);
/// assert_eq!(piece.position(), Position::new(4, 0));
///
/// let moved = piece.moved(1, 0);
/// assert_eq!(moved.position(), Position::new(5, 0));
/// assert_eq!(moved.shape(), piece.shape());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePiece {
    kind: PieceKind,
    shape: PieceShape,
    position: Position,
    collided: bool,
    color: Color,
}

impl ActivePiece {
    /// Creates a piece of `kind` in its canonical orientation, centered at the top
    /// of a board `board_width` cells wide.
    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let shape = kind.shape();
        let x = (board_width / 2).saturating_sub(shape.width() / 2);
        Self {
            kind,
            shape,
            position: Position::new(i32::try_from(x).unwrap_or(0), 0),
            collided: false,
            color: kind.color(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &PieceShape {
        &self.shape
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether the piece has hit the stack and is about to lock.
    #[must_use]
    pub fn is_collided(&self) -> bool {
        self.collided
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            ..*self
        }
    }

    /// Returns this piece with another orientation and position.
    #[must_use]
    pub fn reshaped(&self, shape: PieceShape, position: Position) -> Self {
        Self {
            shape,
            position,
            ..*self
        }
    }

    #[must_use]
    pub fn marked_collided(&self) -> Self {
        Self {
            collided: true,
            ..*self
        }
    }

    /// Iterates over the board coordinates covered by the piece.
    ///
    /// Cells whose coordinates overflow `i32` are skipped.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.occupied_cells().filter_map(move |(dx, dy)| {
            let dx = i32::try_from(dx).ok()?;
            let dy = i32::try_from(dy).ok()?;
            Some((
                self.position.x.checked_add(dx)?,
                self.position.y.checked_add(dy)?,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_four_cells_per_kind() {
        for kind in PieceKind::ALL {
            assert_eq!(kind.shape().cell_count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_four_clockwise_rotations_round_trip() {
        for kind in PieceKind::ALL {
            let shape = kind.shape();
            let mut rotated = shape;
            for _ in 0..4 {
                rotated = rotated.rotated(true);
            }
            assert_eq!(rotated, shape, "{kind:?}");
        }
    }

    #[test]
    fn test_four_counter_clockwise_rotations_round_trip() {
        for kind in PieceKind::ALL {
            let shape = kind.shape();
            let mut rotated = shape;
            for _ in 0..4 {
                rotated = rotated.rotated(false);
            }
            assert_eq!(rotated, shape, "{kind:?}");
        }
    }

    #[test]
    fn test_kick_offsets() {
        assert_eq!(PieceKind::I.kick_offsets(), &[-1, -2, 1, 2]);
        for kind in PieceKind::ALL.into_iter().filter(|k| *k != PieceKind::I) {
            assert_eq!(kind.kick_offsets(), &[-1, 1]);
        }
    }

    #[test]
    fn test_spawn_position_is_centered() {
        assert_eq!(ActivePiece::spawn(PieceKind::I, 10).position(), Position::new(3, 0));
        assert_eq!(ActivePiece::spawn(PieceKind::O, 10).position(), Position::new(4, 0));
        assert_eq!(ActivePiece::spawn(PieceKind::T, 10).position(), Position::new(4, 0));
        assert_eq!(ActivePiece::spawn(PieceKind::Z, 12).position(), Position::new(5, 0));
    }

    #[test]
    fn test_spawned_piece_carries_kind_color() {
        for kind in PieceKind::ALL {
            let piece = ActivePiece::spawn(kind, 10);
            assert_eq!(piece.color(), kind.color());
            assert_eq!(*piece.shape(), kind.shape());
            assert!(!piece.is_collided());
        }
    }

    #[test]
    fn test_occupied_positions() {
        let piece = ActivePiece::spawn(PieceKind::O, 10).moved(0, 3);
        let cells: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(cells, [(4, 3), (5, 3), (4, 4), (5, 4)]);
    }

    #[test]
    fn test_extreme_positions_do_not_overflow() {
        let origin = Position::new(i32::MIN, i32::MAX);
        assert_eq!(origin.offset(-2, 1), origin);
        assert_eq!(origin.offset(1, -1), Position::new(i32::MIN + 1, i32::MAX - 1));

        let piece = ActivePiece::spawn(PieceKind::O, 10).reshaped(PieceKind::O.shape(), origin);
        let cells: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(cells, [(i32::MIN, i32::MAX), (i32::MIN + 1, i32::MAX)]);
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn test_active_piece_serialization() {
        let piece = ActivePiece::spawn(PieceKind::L, 10).moved(-1, 7);
        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(
            serialized,
            r##"{"kind":"L","shape":[[0,0,1],[1,1,1],[0,0,0]],"position":{"x":3,"y":7},"collided":false,"color":"#FF9900"}"##
        );
        let deserialized: ActivePiece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }
}
