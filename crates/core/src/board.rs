//! Board module - manages the game grid
//!
//! The board is a 10x22 grid where each cell is empty or holds a [`Block`].
//! Rows 0-1 are the spawn buffer above the visible field.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..21 (top to bottom)

use arrayvec::ArrayVec;

use crate::pieces::PieceState;
use crate::types::{Block, Cell, BOARD_HEIGHT, BOARD_WIDTH, SPAWN_BUFFER_ROWS};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Row indices returned by a full-row scan, top to bottom
pub type FullRows = ArrayVec<usize, HEIGHT>;

/// Cell codes of the whole board, row-major
pub type U8Grid = [[u8; WIDTH]; HEIGHT];

/// The game board - 10 columns x 22 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// True iff (x, y) is in bounds and empty
    pub fn is_cell_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether every block of `piece` lands in bounds on an empty cell
    pub fn can_place(&self, piece: &PieceState) -> bool {
        piece.cells().all(|(x, y)| self.is_cell_free(x, y))
    }

    /// Write the piece's blocks into the grid without validation
    ///
    /// Callers confirm [`can_place`](Self::can_place) first. Blocks that fall
    /// outside the grid are dropped.
    pub fn commit(&mut self, piece: &PieceState) {
        for (x, y) in piece.cells() {
            self.set(x, y, Some(Block::Piece(piece.kind)));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH]
            .iter()
            .all(|cell| cell.is_some())
    }

    /// Number of rows that would be full once `piece` is committed
    pub fn rows_completed_by(&self, piece: &PieceState) -> usize {
        let mut rows: ArrayVec<i8, 4> = ArrayVec::new();
        for (_, y) in piece.cells() {
            if !rows.contains(&y) {
                rows.push(y);
            }
        }
        rows.iter()
            .filter(|&&y| {
                (0..BOARD_WIDTH as i8).all(|x| {
                    self.is_occupied(x, y) || piece.cells().any(|cell| cell == (x, y))
                })
            })
            .count()
    }

    /// Indices of full rows, top to bottom
    pub fn scan_full_rows(&self) -> FullRows {
        (0..HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Remove a row, shifting every row above it down by one and emptying row 0
    pub fn clear_row(&mut self, y: usize) {
        if y >= HEIGHT {
            return;
        }
        // copy_within handles the overlapping ranges
        for row in (1..=y).rev() {
            let src = (row - 1) * WIDTH;
            self.cells.copy_within(src..src + WIDTH, row * WIDTH);
        }
        self.cells[..WIDTH].fill(None);
    }

    /// Remove the given rows
    ///
    /// Indices must be sorted ascending (as [`scan_full_rows`](Self::scan_full_rows)
    /// returns them). Each removal only shifts rows above the current index, so
    /// rows still pending below keep their positions.
    pub fn collapse(&mut self, rows: &[usize]) {
        for &y in rows {
            self.clear_row(y);
        }
    }

    /// Scan and collapse in one step, returning the removed row indices
    pub fn clear_full_rows(&mut self) -> FullRows {
        let rows = self.scan_full_rows();
        self.collapse(&rows);
        rows
    }

    /// Whether anything occupies the spawn buffer rows
    pub fn is_topout_condition(&self) -> bool {
        self.cells[..WIDTH * SPAWN_BUFFER_ROWS as usize]
            .iter()
            .any(|cell| cell.is_some())
    }

    /// Push `count` garbage rows in from the bottom
    ///
    /// Rows `count..` move up by `count` (the top `count` rows are discarded),
    /// then the bottom `count` rows are filled except `empty_column`.
    /// `count` is clamped to the board height and `empty_column` to the last
    /// column. Returns the column left open.
    pub fn insert_garbage_rows(&mut self, count: usize, empty_column: usize) -> usize {
        let empty_column = empty_column.min(WIDTH - 1);
        let count = count.min(HEIGHT);
        if count == 0 {
            return empty_column;
        }
        self.cells.copy_within(count * WIDTH.., 0);
        let start = (HEIGHT - count) * WIDTH;
        for (i, cell) in self.cells[start..].iter_mut().enumerate() {
            *cell = if i % WIDTH == empty_column {
                None
            } else {
                Some(Block::Garbage)
            };
        }
        empty_column
    }

    /// Row `y` as a slice
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y.min(HEIGHT - 1) * WIDTH;
        &self.cells[start..start + WIDTH]
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write cell codes (0 empty, kind + 1, 8 garbage) into `out`
    pub fn write_u8_grid(&self, out: &mut U8Grid) {
        for (y, row) in out.iter_mut().enumerate() {
            for (x, code) in row.iter_mut().enumerate() {
                *code = self.cells[y * WIDTH + x].map_or(0, Block::code);
            }
        }
    }

    pub fn to_u8_grid(&self) -> U8Grid {
        let mut out = [[0u8; WIDTH]; HEIGHT];
        self.write_u8_grid(&mut out);
        out
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Build a board from a 2D vector (row-major)
    pub fn from_cells(cells_2d: &[Vec<Cell>]) -> Self {
        let mut board = Self::new();
        for (y, row) in cells_2d.iter().enumerate().take(HEIGHT) {
            for (x, cell) in row.iter().enumerate().take(WIDTH) {
                board.cells[y * WIDTH + x] = *cell;
            }
        }
        board
    }

    /// Convert to 2D vector for testing/display
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(WIDTH).map(|row| row.to_vec()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 21), Some(219));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 22), None);
    }

    #[test]
    fn test_clear_row_shifts_above() {
        let mut board = Board::new();
        board.set(0, 19, Some(Block::Piece(PieceKind::L)));
        for x in 0..10 {
            board.set(x, 20, Some(Block::Piece(PieceKind::I)));
        }
        board.clear_row(20);
        assert_eq!(board.get(0, 20), Some(Some(Block::Piece(PieceKind::L))));
        assert_eq!(board.get(0, 19), Some(None));
        assert_eq!(board.get(1, 20), Some(None));
    }

    #[test]
    fn test_topout_ignores_row_two() {
        let mut board = Board::new();
        board.set(4, 2, Some(Block::Garbage));
        assert!(!board.is_topout_condition());
        board.set(9, 1, Some(Block::Garbage));
        assert!(board.is_topout_condition());
    }

    #[test]
    fn test_u8_grid_codes() {
        let mut board = Board::new();
        board.set(0, 21, Some(Block::Piece(PieceKind::T)));
        board.set(1, 21, Some(Block::Garbage));
        let grid = board.to_u8_grid();
        assert_eq!(grid[21][0], 7);
        assert_eq!(grid[21][1], 8);
        assert_eq!(grid[21][2], 0);
    }

    #[test]
    fn test_rows_completed_by_piece() {
        let mut board = Board::new();
        for x in 0..10 {
            if !(3..=6).contains(&x) {
                board.set(x, 21, Some(Block::Garbage));
            }
        }
        let flat_i = PieceState {
            kind: PieceKind::I,
            rotation: crate::types::Rotation::North,
            x: 2,
            y: 19,
        };
        assert_eq!(board.rows_completed_by(&flat_i), 1);
        assert_eq!(board.rows_completed_by(&flat_i.shifted(0, -1)), 0);
        assert!(board.scan_full_rows().is_empty());
    }

    #[test]
    fn test_from_cells_roundtrip() {
        let mut cells_2d = vec![vec![None; 10]; 22];
        cells_2d[5][3] = Some(Block::Piece(PieceKind::O));
        cells_2d[21][7] = Some(Block::Garbage);

        let board = Board::from_cells(&cells_2d);
        assert_eq!(board.to_cells(), cells_2d);
    }
}
