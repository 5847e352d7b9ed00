use serde::{Deserialize, Serialize};

use crate::PieceCollisionError;

use super::{
    cell::{Cell, Color},
    piece::Position,
    shape::{MAX_SHAPE_SIZE, PieceShape},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    #[display("board must be at least {min}x{min} visible cells, got {width}x{visible_height}")]
    TooSmall {
        width: usize,
        visible_height: usize,
        min: usize,
    },
    #[display("board needs at least one hidden row")]
    NoHiddenRows,
    #[display("board row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// Size of a board: visible play field plus hidden buffer rows above it.
///
/// The defaults are the classic 10×20 field with 5 hidden rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
#[display("{width}x{visible_height}+{hidden_rows}")]
#[serde(try_from = "RawDimensions", into = "RawDimensions")]
pub struct BoardDimensions {
    width: usize,
    visible_height: usize,
    hidden_rows: usize,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDimensions {
    width: usize,
    visible_height: usize,
    hidden_rows: usize,
}

impl Default for BoardDimensions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BoardDimensions {
    pub const DEFAULT: Self = Self {
        width: 10,
        visible_height: 20,
        hidden_rows: 5,
    };

    pub fn new(
        width: usize,
        visible_height: usize,
        hidden_rows: usize,
    ) -> Result<Self, BoardError> {
        if width < MAX_SHAPE_SIZE || visible_height < MAX_SHAPE_SIZE {
            return Err(BoardError::TooSmall {
                width,
                visible_height,
                min: MAX_SHAPE_SIZE,
            });
        }
        if hidden_rows == 0 {
            return Err(BoardError::NoHiddenRows);
        }
        Ok(Self {
            width,
            visible_height,
            hidden_rows,
        })
    }

    #[must_use]
    pub const fn width(self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn visible_height(self) -> usize {
        self.visible_height
    }

    #[must_use]
    pub const fn hidden_rows(self) -> usize {
        self.hidden_rows
    }

    /// Total number of rows, hidden buffer included.
    #[must_use]
    pub const fn height(self) -> usize {
        self.visible_height + self.hidden_rows
    }
}

impl TryFrom<RawDimensions> for BoardDimensions {
    type Error = BoardError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.visible_height, raw.hidden_rows)
    }
}

impl From<BoardDimensions> for RawDimensions {
    fn from(dims: BoardDimensions) -> Self {
        Self {
            width: dims.width,
            visible_height: dims.visible_height,
            hidden_rows: dims.hidden_rows,
        }
    }
}

/// A single board row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BoardRow {
    cells: Vec<Cell>,
}

impl BoardRow {
    fn empty(width: usize) -> Self {
        Self {
            cells: vec![Cell::Empty; width],
        }
    }

    fn is_filled(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

/// The grid of locked cells of one side.
///
/// Rows are indexed top to bottom, `0..height`. The first
/// [`hidden_rows`](Self::hidden_rows) rows form the buffer above the visible
/// field: pieces spawn there and are collision-checked there, but renderers
/// only show [`visible_rows`](Self::visible_rows).
///
/// # Example
///
/// ```
/// use planet_tetris_engine::{Board, BoardDimensions, PieceKind, Position};
///
/// let mut board = Board::new(BoardDimensions::default());
/// let shape = PieceKind::O.shape();
///
/// // The O piece can rest on the floor, but not below it.
/// let floor = Position::new(4, 23);
/// assert!(!board.collides(&shape, floor, 0, 0));
/// assert!(board.collides(&shape, floor, 0, 1));
///
/// let cleared = board.lock_and_sweep(&shape, floor, PieceKind::O.color()).unwrap();
/// assert_eq!(cleared, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard", into = "RawBoard")]
pub struct Board {
    rows: Vec<BoardRow>,
    width: usize,
    hidden_rows: usize,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBoard {
    hidden_rows: usize,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new(dims: BoardDimensions) -> Self {
        Self {
            rows: vec![BoardRow::empty(dims.width()); dims.height()],
            width: dims.width(),
            hidden_rows: dims.hidden_rows(),
        }
    }

    /// Builds a board from raw rows, hidden buffer rows first.
    ///
    /// Fails when the rows are ragged or the resulting dimensions are invalid.
    pub fn from_rows(rows: Vec<Vec<Cell>>, hidden_rows: usize) -> Result<Self, BoardError> {
        let width = rows.first().map_or(0, Vec::len);
        let visible_height = rows.len().saturating_sub(hidden_rows);
        BoardDimensions::new(width, visible_height, hidden_rows)?;
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(BoardError::Ragged {
                    row: y,
                    len: row.len(),
                    expected: width,
                });
            }
        }
        Ok(Self {
            rows: rows.into_iter().map(|cells| BoardRow { cells }).collect(),
            width,
            hidden_rows,
        })
    }

    #[must_use]
    pub fn dimensions(&self) -> BoardDimensions {
        BoardDimensions {
            width: self.width,
            visible_height: self.visible_height(),
            hidden_rows: self.hidden_rows,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of rows, hidden buffer included.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn hidden_rows(&self) -> usize {
        self.hidden_rows
    }

    #[must_use]
    pub fn visible_height(&self) -> usize {
        self.rows.len() - self.hidden_rows
    }

    /// Returns the cell at `(x, y)`, or `None` outside the board.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        let (x, y) = self.index(x, y)?;
        Some(self.rows[y].cells[x])
    }

    /// Overwrites the cell at `(x, y)`. Returns `false` outside the board.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some((x, y)) => {
                self.rows[y].cells[x] = cell;
                true
            }
            None => false,
        }
    }

    /// Iterates over all rows, hidden buffer first.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|row| row.cells.as_slice())
    }

    /// Iterates over the rows of the visible play field.
    pub fn visible_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows().skip(self.hidden_rows)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows().flatten().all(|cell| cell.is_empty())
    }

    /// Returns whether `y` lies inside the hidden buffer rows.
    #[must_use]
    pub fn is_hidden_row(&self, y: i32) -> bool {
        usize::try_from(y).map_or(true, |y| y < self.hidden_rows)
    }

    /// Tests a shape placed at `origin + (dx, dy)` against walls, floor and
    /// locked cells.
    ///
    /// Returns `true` as soon as one set cell of the shape lies outside the board
    /// or on a non-empty cell. Pass `dx = dy = 0` to validate a shape in place.
    #[must_use]
    pub fn collides(&self, shape: &PieceShape, origin: Position, dx: i32, dy: i32) -> bool {
        shape.occupied_cells().any(|(local_x, local_y)| {
            let Some((x, y)) = absolute(origin, local_x, local_y, dx, dy) else {
                return true;
            };
            self.get(x, y).is_none_or(|cell| !cell.is_empty())
        })
    }

    /// Writes the shape into the board with `color`, then sweeps full rows.
    ///
    /// Each full row is removed and an empty row is inserted at the top, so rows
    /// above a cleared row shift down. Returns the number of cleared rows.
    ///
    /// A colliding placement is refused and leaves the board untouched.
    pub fn lock_and_sweep(
        &mut self,
        shape: &PieceShape,
        origin: Position,
        color: Color,
    ) -> Result<usize, PieceCollisionError> {
        if self.collides(shape, origin, 0, 0) {
            return Err(PieceCollisionError);
        }
        for (local_x, local_y) in shape.occupied_cells() {
            if let Some((x, y)) = absolute(origin, local_x, local_y, 0, 0) {
                self.set(x, y, Cell::Filled(color));
            }
        }
        Ok(self.sweep())
    }

    /// Removes full rows and returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let mut count = 0;
        for y in (0..self.rows.len()).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows.swap(y, y + count);
            }
        }
        for row in &mut self.rows[..count] {
            row.clear();
        }
        count
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.rows.len())?;
        Some((x, y))
    }
}

fn absolute(origin: Position, local_x: usize, local_y: usize, dx: i32, dy: i32) -> Option<(i32, i32)> {
    let local_x = i32::try_from(local_x).ok()?;
    let local_y = i32::try_from(local_y).ok()?;
    Some((
        origin.x.checked_add(local_x)?.checked_add(dx)?,
        origin.y.checked_add(local_y)?.checked_add(dy)?,
    ))
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        Self::from_rows(raw.rows, raw.hidden_rows)
    }
}

impl From<Board> for RawBoard {
    fn from(board: Board) -> Self {
        Self {
            hidden_rows: board.hidden_rows,
            rows: board.rows.into_iter().map(|row| row.cells).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    const RED: Cell = Cell::Filled(Color::Red);

    fn fill_row(board: &mut Board, y: i32, except: &[i32]) {
        for x in 0..i32::try_from(board.width()).unwrap() {
            if !except.contains(&x) {
                board.set(x, y, RED);
            }
        }
    }

    fn bottom(board: &Board) -> i32 {
        i32::try_from(board.height()).unwrap() - 1
    }

    #[test]
    fn test_new_board_dimensions() {
        let board = Board::new(BoardDimensions::default());
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 25);
        assert_eq!(board.hidden_rows(), 5);
        assert_eq!(board.visible_height(), 20);
        assert_eq!(board.visible_rows().count(), 20);
        assert!(board.rows().all(|row| row.len() == 10));
        assert!(board.is_empty());
    }

    #[test]
    fn test_dimensions_validation() {
        assert!(BoardDimensions::new(3, 20, 5).is_err());
        assert!(BoardDimensions::new(10, 2, 5).is_err());
        assert!(matches!(
            BoardDimensions::new(10, 20, 0),
            Err(BoardError::NoHiddenRows)
        ));
        assert_eq!(BoardDimensions::new(10, 20, 5).unwrap(), BoardDimensions::DEFAULT);
    }

    #[test]
    fn test_hidden_row_boundary() {
        let board = Board::new(BoardDimensions::default());
        assert!(board.is_hidden_row(-1));
        assert!(board.is_hidden_row(0));
        assert!(board.is_hidden_row(4));
        assert!(!board.is_hidden_row(5));
    }

    #[test]
    fn test_collides_with_walls_and_floor() {
        let board = Board::new(BoardDimensions::default());
        let shape = PieceKind::O.shape();

        assert!(!board.collides(&shape, Position::new(0, 0), 0, 0));
        assert!(board.collides(&shape, Position::new(0, 0), -1, 0));
        assert!(!board.collides(&shape, Position::new(8, 0), 0, 0));
        assert!(board.collides(&shape, Position::new(8, 0), 1, 0));
        assert!(board.collides(&shape, Position::new(0, 0), 0, -1));
        assert!(!board.collides(&shape, Position::new(0, 23), 0, 0));
        assert!(board.collides(&shape, Position::new(0, 23), 0, 1));
    }

    #[test]
    fn test_collides_ignores_empty_shape_cells() {
        let board = Board::new(BoardDimensions::default());
        // Row 0 of the I matrix is empty, so the origin may sit one row above the board.
        let shape = PieceKind::I.shape();
        assert!(!board.collides(&shape, Position::new(0, -1), 0, 0));
        assert!(board.collides(&shape, Position::new(0, -2), 0, 0));
    }

    #[test]
    fn test_collides_with_locked_cells() {
        let mut board = Board::new(BoardDimensions::default());
        board.set(5, 10, RED);
        let shape = PieceKind::T.shape();

        // T occupies (1,0), (0,1), (1,1), (2,1) locally.
        assert!(board.collides(&shape, Position::new(4, 9), 0, 0));
        assert!(!board.collides(&shape, Position::new(4, 8), 0, 0));
        assert!(board.collides(&shape, Position::new(4, 8), 0, 1));
    }

    #[test]
    fn test_glow_cells_collide() {
        let mut board = Board::new(BoardDimensions::default());
        board.set(0, 0, RED);
        let shape = PieceShape::try_from(vec![vec![2]]).unwrap();
        assert!(board.collides(&shape, Position::new(0, 0), 0, 0));
        assert!(!board.collides(&shape, Position::new(1, 0), 0, 0));
    }

    #[test]
    fn test_non_colliding_cells_map_to_empty_in_bounds_cells() {
        let mut board = Board::new(BoardDimensions::default());
        fill_row(&mut board, 20, &[3, 4]);
        board.set(7, 12, RED);

        for kind in PieceKind::ALL {
            let mut shape = kind.shape();
            for _ in 0..4 {
                for y in -4..30 {
                    for x in -4..14 {
                        let origin = Position::new(x, y);
                        if board.collides(&shape, origin, 0, 0) {
                            continue;
                        }
                        for (lx, ly) in shape.occupied_cells() {
                            let cx = x + i32::try_from(lx).unwrap();
                            let cy = y + i32::try_from(ly).unwrap();
                            assert_eq!(board.get(cx, cy), Some(Cell::Empty));
                        }
                    }
                }
                shape = shape.rotated(true);
            }
        }
    }

    #[test]
    fn test_sweep_without_full_rows_is_identity() {
        let mut board = Board::new(BoardDimensions::default());
        fill_row(&mut board, 24, &[0]);
        fill_row(&mut board, 23, &[9]);
        board.set(2, 10, RED);
        let before = board.clone();

        assert_eq!(board.sweep(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_sweep_full_rows_preserves_order() {
        for k in 0..=4 {
            let mut board = Board::new(BoardDimensions::default());
            let bottom = bottom(&board);
            // Marker rows with a distinct hole each, interleaved with k full rows.
            let mut markers = Vec::new();
            let mut y = bottom;
            for i in 0..5 {
                fill_row(&mut board, y, &[i]);
                markers.push(board.rows().nth(usize::try_from(y).unwrap()).unwrap().to_vec());
                y -= 1;
                if i < k {
                    fill_row(&mut board, y, &[]);
                    y -= 1;
                }
            }

            let cleared = board.sweep();
            assert_eq!(cleared, usize::try_from(k).unwrap());

            let rows: Vec<Vec<Cell>> = board.rows().map(<[Cell]>::to_vec).collect();
            let height = rows.len();
            // Markers are now packed at the bottom, in their original relative order.
            for (i, marker) in markers.iter().enumerate() {
                assert_eq!(&rows[height - 1 - i], marker);
            }
            // Everything above the markers is empty.
            for row in &rows[..height - markers.len()] {
                assert!(row.iter().all(|cell| cell.is_empty()));
            }
        }
    }

    #[test]
    fn test_sweep_inserts_empty_rows_at_top() {
        let mut board = Board::new(BoardDimensions::default());
        board.set(0, 0, RED);
        fill_row(&mut board, 24, &[]);

        assert_eq!(board.sweep(), 1);
        assert_eq!(board.get(0, 0), Some(Cell::Empty));
        assert_eq!(board.get(0, 1), Some(RED));
        assert!(board.rows().nth(24).unwrap().iter().all(|cell| cell.is_empty()));
    }

    #[test]
    fn test_lock_and_sweep_clears_completed_row() {
        let mut board = Board::new(BoardDimensions::default());
        fill_row(&mut board, 24, &[3, 4, 5, 6]);
        // Horizontal I: its cells are in matrix row 1.
        let shape = PieceKind::I.shape();
        let cleared = board
            .lock_and_sweep(&shape, Position::new(3, 23), Color::Cyan)
            .unwrap();
        assert_eq!(cleared, 1);
        assert!(board.is_empty());
    }

    #[test]
    fn test_lock_and_sweep_writes_color() {
        let mut board = Board::new(BoardDimensions::default());
        let shape = PieceKind::S.shape();
        let cleared = board
            .lock_and_sweep(&shape, Position::new(0, 22), Color::Green)
            .unwrap();
        assert_eq!(cleared, 0);
        let green = Cell::Filled(Color::Green);
        assert_eq!(board.get(1, 22), Some(green));
        assert_eq!(board.get(2, 22), Some(green));
        assert_eq!(board.get(0, 23), Some(green));
        assert_eq!(board.get(1, 23), Some(green));
        assert_eq!(board.get(0, 22), Some(Cell::Empty));
    }

    #[test]
    fn test_lock_and_sweep_refuses_colliding_placement() {
        let mut board = Board::new(BoardDimensions::default());
        board.set(1, 24, RED);
        let before = board.clone();
        let shape = PieceKind::O.shape();

        assert!(
            board
                .lock_and_sweep(&shape, Position::new(0, 23), Color::Yellow)
                .is_err()
        );
        assert!(
            board
                .lock_and_sweep(&shape, Position::new(9, 0), Color::Yellow)
                .is_err()
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_from_rows_validation() {
        let rows = vec![vec![Cell::Empty; 10]; 25];
        let board = Board::from_rows(rows.clone(), 5).unwrap();
        assert_eq!(board, Board::new(BoardDimensions::default()));

        let mut ragged = rows.clone();
        ragged[7].pop();
        assert!(matches!(
            Board::from_rows(ragged, 5),
            Err(BoardError::Ragged { row: 7, len: 9, expected: 10 })
        ));

        assert!(Board::from_rows(Vec::new(), 5).is_err());
        assert!(Board::from_rows(rows, 0).is_err());
    }

    #[test]
    fn test_board_serialization() {
        let mut board = Board::new(BoardDimensions::default());
        board.set(2, 24, Cell::Filled(Color::Orange));

        let serialized = serde_json::to_string(&board).unwrap();
        assert!(serialized.starts_with("{\"hiddenRows\":5,\"rows\":[[null,"));
        assert!(serialized.contains("\"#FF9900\""));

        let deserialized: Board = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, board);

        let ragged = r#"{"hiddenRows":1,"rows":[[null,null,null,null],[null,null,null,null],[null,null,null,null],[null,null,null,null],[null]]}"#;
        assert!(serde_json::from_str::<Board>(ragged).is_err());
    }
}
