use serde::{Deserialize, Serialize};

/// Largest supported shape edge, in cells.
pub const MAX_SHAPE_SIZE: usize = 4;

/// One cell of a [`PieceShape`] matrix.
///
/// `Glow` is a cosmetic variant of `Solid` and behaves identically for collision
/// and locking.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeCell {
    #[default]
    Empty,
    Solid,
    Glow,
}

impl ShapeCell {
    #[must_use]
    pub const fn is_set(self) -> bool {
        !matches!(self, ShapeCell::Empty)
    }

    /// Converts the numeric flag used in serialized shapes (`0`, `1` or `2`).
    #[must_use]
    pub const fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            0 => Some(ShapeCell::Empty),
            1 => Some(ShapeCell::Solid),
            2 => Some(ShapeCell::Glow),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_flag(self) -> u8 {
        match self {
            ShapeCell::Empty => 0,
            ShapeCell::Solid => 1,
            ShapeCell::Glow => 2,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("shape has no rows or no columns")]
    Empty,
    #[display("shape is {height}x{width}, at most 4x4 is supported")]
    TooLarge { height: usize, width: usize },
    #[display("shape row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("invalid shape cell flag {flag} (expected 0, 1 or 2)")]
    InvalidFlag { flag: u8 },
    #[display("shape has no solid or glow cells")]
    NoSetCells,
}

/// One orientation of a piece as a small rectangular matrix.
///
/// Shapes are plain `Copy` values: rotating returns a new shape and never
/// aliases the original. Cells outside `height × width` are always empty.
///
/// Serialized as a list of rows of flags, `0` = empty, `1` = solid, `2` = glow.
///
/// # Example
///
/// ```
/// use planet_tetris_engine::{PieceKind, PieceShape};
///
/// let t = PieceKind::T.shape();
/// let rotated = t.rotated(true);
/// assert_eq!(rotated.rotated(false), t);
///
/// let parsed = PieceShape::try_from(vec![vec![0, 1, 0], vec![1, 1, 1], vec![0, 0, 0]]).unwrap();
/// assert_eq!(parsed, t);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct PieceShape {
    cells: [[ShapeCell; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
    height: usize,
    width: usize,
}

impl PieceShape {
    /// Builds a square shape from numeric flags at compile time.
    pub(crate) const fn square<const N: usize>(flags: [[u8; N]; N]) -> Self {
        assert!(N > 0 && N <= MAX_SHAPE_SIZE);
        let mut cells = [[ShapeCell::Empty; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < N {
            let mut x = 0;
            while x < N {
                cells[y][x] = match ShapeCell::from_flag(flags[y][x]) {
                    Some(cell) => cell,
                    None => panic!("invalid shape cell flag"),
                };
                x += 1;
            }
            y += 1;
        }
        Self {
            cells,
            height: N,
            width: N,
        }
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the cell at local `(x, y)`, or `Empty` outside the matrix.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> ShapeCell {
        if x >= self.width || y >= self.height {
            return ShapeCell::Empty;
        }
        self.cells[y][x]
    }

    /// Iterates over the local `(x, y)` coordinates of all set cells, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells[..self.height]
            .iter()
            .enumerate()
            .flat_map(move |(y, row)| {
                row[..self.width]
                    .iter()
                    .enumerate()
                    .filter(|(_, cell)| cell.is_set())
                    .map(move |(x, _)| (x, y))
            })
    }

    /// Returns the number of set cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.occupied_cells().count()
    }

    /// Rotates the matrix by 90°.
    ///
    /// Clockwise is a transpose followed by reversing every row; counter-clockwise
    /// is a transpose followed by reversing the row order. An `h × w` matrix
    /// becomes `w × h`.
    #[must_use]
    pub fn rotated(&self, clockwise: bool) -> Self {
        let (height, width) = (self.width, self.height);
        let mut cells = [[ShapeCell::Empty; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in cells[..height].iter_mut().enumerate() {
            for (x, cell) in row[..width].iter_mut().enumerate() {
                *cell = if clockwise {
                    self.cells[self.height - 1 - x][y]
                } else {
                    self.cells[x][self.width - 1 - y]
                };
            }
        }
        Self {
            cells,
            height,
            width,
        }
    }

    fn rows(&self) -> impl Iterator<Item = &[ShapeCell]> + '_ {
        self.cells[..self.height]
            .iter()
            .map(|row| &row[..self.width])
    }
}

impl TryFrom<Vec<Vec<u8>>> for PieceShape {
    type Error = ShapeError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(ShapeError::Empty);
        }
        if height > MAX_SHAPE_SIZE || width > MAX_SHAPE_SIZE {
            return Err(ShapeError::TooLarge { height, width });
        }

        let mut cells = [[ShapeCell::Empty; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ShapeError::Ragged {
                    row: y,
                    len: row.len(),
                    expected: width,
                });
            }
            for (x, &flag) in row.iter().enumerate() {
                cells[y][x] = ShapeCell::from_flag(flag).ok_or(ShapeError::InvalidFlag { flag })?;
            }
        }

        let shape = Self {
            cells,
            height,
            width,
        };
        if shape.cell_count() == 0 {
            return Err(ShapeError::NoSetCells);
        }
        Ok(shape)
    }
}

impl From<PieceShape> for Vec<Vec<u8>> {
    fn from(shape: PieceShape) -> Self {
        shape
            .rows()
            .map(|row| row.iter().map(|cell| cell.as_flag()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_i_clockwise() {
        let shape = PieceShape::square([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let rotated = shape.rotated(true);
        let expected =
            PieceShape::square([[0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0]]);
        assert_eq!(rotated, expected);
    }

    #[test]
    fn test_rotate_t_counter_clockwise() {
        let shape = PieceShape::square([[0, 1, 0], [1, 1, 1], [0, 0, 0]]);
        let rotated = shape.rotated(false);
        let expected = PieceShape::square([[0, 1, 0], [1, 1, 0], [0, 1, 0]]);
        assert_eq!(rotated, expected);
    }

    #[test]
    fn test_rotate_rectangular() {
        let shape = PieceShape::try_from(vec![vec![1, 1, 1], vec![1, 0, 0]]).unwrap();

        let cw = shape.rotated(true);
        assert_eq!((cw.height(), cw.width()), (3, 2));
        assert_eq!(
            Vec::<Vec<u8>>::from(cw),
            vec![vec![1, 1], vec![0, 1], vec![0, 1]]
        );

        let ccw = shape.rotated(false);
        assert_eq!(
            Vec::<Vec<u8>>::from(ccw),
            vec![vec![1, 0], vec![1, 0], vec![1, 1]]
        );
        assert_eq!(cw.rotated(false), shape);
    }

    #[test]
    fn test_glow_cells_are_set_and_preserved() {
        let shape = PieceShape::try_from(vec![vec![2, 1], vec![0, 1]]).unwrap();
        assert_eq!(shape.cell_count(), 3);
        assert_eq!(shape.get(0, 0), ShapeCell::Glow);

        let back = shape.rotated(true).rotated(false);
        assert_eq!(back.get(0, 0), ShapeCell::Glow);
    }

    #[test]
    fn test_occupied_cells_order() {
        let shape = PieceShape::square([[1, 1, 0], [0, 1, 1], [0, 0, 0]]);
        let cells: Vec<_> = shape.occupied_cells().collect();
        assert_eq!(cells, [(0, 0), (1, 0), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_get_outside_matrix_is_empty() {
        let shape = PieceShape::square([[1, 1], [1, 1]]);
        assert_eq!(shape.get(2, 0), ShapeCell::Empty);
        assert_eq!(shape.get(0, 3), ShapeCell::Empty);
    }

    #[test]
    fn test_try_from_rejects_malformed_rows() {
        assert!(matches!(
            PieceShape::try_from(vec![]),
            Err(ShapeError::Empty)
        ));
        assert!(matches!(
            PieceShape::try_from(vec![vec![]]),
            Err(ShapeError::Empty)
        ));
        assert!(matches!(
            PieceShape::try_from(vec![vec![1; 5]]),
            Err(ShapeError::TooLarge { .. })
        ));
        assert!(matches!(
            PieceShape::try_from(vec![vec![1, 1], vec![1]]),
            Err(ShapeError::Ragged { row: 1, .. })
        ));
        assert!(matches!(
            PieceShape::try_from(vec![vec![3]]),
            Err(ShapeError::InvalidFlag { flag: 3 })
        ));
        assert!(matches!(
            PieceShape::try_from(vec![vec![0, 0], vec![0, 0]]),
            Err(ShapeError::NoSetCells)
        ));
    }

    #[test]
    fn test_shape_serialization() {
        let shape = PieceShape::square([[0, 1, 1], [1, 1, 0], [0, 0, 0]]);
        let serialized = serde_json::to_string(&shape).unwrap();
        assert_eq!(serialized, "[[0,1,1],[1,1,0],[0,0,0]]");

        let deserialized: PieceShape = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, shape);

        assert!(serde_json::from_str::<PieceShape>("[[0,1],[1]]").is_err());
    }
}
