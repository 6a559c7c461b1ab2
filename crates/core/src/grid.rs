//! Grid module - the authoritative board storage
//!
//! The grid is a rows x cols array where each cell is empty or holds one tile.
//! Uses a flat vector in row-major order (`row * cols + col`).
//! Coordinates: row 0 is the top, column 0 the left edge.
//!
//! The grid has no rules of its own; bounds checks return `None`/`false`
//! rather than erroring, and `swap` is a plain index exchange.

use std::fmt;

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::types::{Cell, Color, Orientation, Pos, Tile};

/// The game grid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: u8,
    cols: u8,
    /// Flat array of cells, row-major order
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows as usize * cols as usize],
        }
    }

    /// Build a grid from row-major cells; `None` if the length does not match
    pub fn from_cells(rows: u8, cols: u8, cells: Vec<Cell>) -> Option<Self> {
        if cells.len() != rows as usize * cols as usize {
            return None;
        }
        Some(Self { rows, cols, cells })
    }

    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        Some(pos.row as usize * self.cols as usize + pos.col as usize)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// Get cell at `pos`
    /// Returns None if out of bounds
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Tile at `pos`; `None` for empty or out-of-bounds cells
    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        self.get(pos).flatten()
    }

    /// Set cell at `pos`
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: Pos, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Empty the cell at `pos`, returning what was there
    pub fn take(&mut self, pos: Pos) -> Cell {
        match self.index(pos) {
            Some(idx) => self.cells[idx].take(),
            None => None,
        }
    }

    /// Exchange two cells; no-op if either is out of bounds
    pub fn swap(&mut self, a: Pos, b: Pos) {
        if let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) {
            self.cells.swap(ia, ib);
        }
    }

    pub fn is_occupied(&self, pos: Pos) -> bool {
        matches!(self.get(pos), Some(Some(_)))
    }

    /// True when no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Pos::new(row, col)))
    }

    /// Positions of one row, left to right
    pub fn row_positions(&self, row: u8) -> impl Iterator<Item = Pos> {
        (0..self.cols).map(move |col| Pos::new(row, col))
    }

    /// Positions of one column, top to bottom
    pub fn col_positions(&self, col: u8) -> impl Iterator<Item = Pos> {
        (0..self.rows).map(move |row| Pos::new(row, col))
    }

    /// Positions covered by a line blast through `pos`
    pub fn line_positions(&self, pos: Pos, orientation: Orientation) -> Vec<Pos> {
        match orientation {
            Orientation::Row => self.row_positions(pos.row).collect(),
            Orientation::Column => self.col_positions(pos.col).collect(),
        }
    }

    /// In-bounds orthogonal neighbours in reading order (up, left, right, down)
    pub fn neighbors(&self, pos: Pos) -> ArrayVec<Pos, 4> {
        let mut out = ArrayVec::new();
        if pos.row > 0 {
            out.push(Pos::new(pos.row - 1, pos.col));
        }
        if pos.col > 0 {
            out.push(Pos::new(pos.row, pos.col - 1));
        }
        if pos.col + 1 < self.cols {
            out.push(Pos::new(pos.row, pos.col + 1));
        }
        if pos.row + 1 < self.rows {
            out.push(Pos::new(pos.row + 1, pos.col));
        }
        out
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Parse a whitespace-separated board description.
    ///
    /// One line per row. Tokens: a color letter (`R O Y G B P W`) for a
    /// regular tile, the letter followed by `-` or `|` for a row- or
    /// column-clearing Line Bomb, `*` for a Color Bomb, `.` for empty.
    ///
    /// ```
    /// use match3_core::Grid;
    /// use match3_types::{Color, Orientation, Pos, Tile};
    ///
    /// let grid = Grid::parse("R G B\nY- * .").unwrap();
    /// assert_eq!(grid.rows(), 2);
    /// assert_eq!(grid.tile(Pos::new(0, 1)), Some(Tile::Regular(Color::Green)));
    /// assert_eq!(
    ///     grid.tile(Pos::new(1, 0)),
    ///     Some(Tile::LineBomb { orientation: Orientation::Row, base: Color::Yellow })
    /// );
    /// assert_eq!(grid.tile(Pos::new(1, 1)), Some(Tile::ColorBomb));
    /// assert_eq!(grid.tile(Pos::new(1, 2)), None);
    /// ```
    pub fn parse(text: &str) -> Result<Self, GridParseError> {
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = line
                .split_whitespace()
                .map(parse_token)
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(GridParseError::RaggedRow {
                        row: rows.len(),
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            rows.push(row);
        }

        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(GridParseError::Empty);
        }
        let (Ok(h), Ok(w)) = (u8::try_from(height), u8::try_from(width)) else {
            return Err(GridParseError::TooLarge);
        };

        let cells = rows.into_iter().flatten().collect();
        Ok(Self {
            rows: h,
            cols: w,
            cells,
        })
    }
}

/// Errors from [`Grid::parse`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridParseError {
    #[error("board description is empty")]
    Empty,
    #[error("board description exceeds 255 rows or columns")]
    TooLarge,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown cell token {0:?}")]
    UnknownToken(String),
}

fn color_letter(color: Color) -> char {
    match color {
        Color::Red => 'R',
        Color::Orange => 'O',
        Color::Yellow => 'Y',
        Color::Green => 'G',
        Color::Blue => 'B',
        Color::Purple => 'P',
        Color::White => 'W',
    }
}

fn color_from_letter(letter: char) -> Option<Color> {
    Color::ALL
        .iter()
        .copied()
        .find(|&c| color_letter(c) == letter.to_ascii_uppercase())
}

fn parse_token(token: &str) -> Result<Cell, GridParseError> {
    let unknown = || GridParseError::UnknownToken(token.to_string());
    let mut chars = token.chars();
    let first = chars.next().ok_or_else(unknown)?;
    let suffix = chars.next();
    if chars.next().is_some() {
        return Err(unknown());
    }

    match (first, suffix) {
        ('.', None) => Ok(None),
        ('*', None) => Ok(Some(Tile::ColorBomb)),
        (letter, None) => color_from_letter(letter)
            .map(|c| Some(Tile::Regular(c)))
            .ok_or_else(unknown),
        (letter, Some(marker)) => {
            let orientation = match marker {
                '-' => Orientation::Row,
                '|' => Orientation::Column,
                _ => return Err(unknown()),
            };
            let base = color_from_letter(letter).ok_or_else(unknown)?;
            Ok(Some(Tile::LineBomb { orientation, base }))
        }
    }
}

fn format_cell(cell: Cell) -> String {
    match cell {
        None => ".".to_string(),
        Some(Tile::Regular(c)) => color_letter(c).to_string(),
        Some(Tile::LineBomb { orientation, base }) => {
            let marker = match orientation {
                Orientation::Row => '-',
                Orientation::Column => '|',
            };
            format!("{}{}", color_letter(base), marker)
        }
        Some(Tile::ColorBomb) => "*".to_string(),
    }
}

/// Same token format accepted by [`Grid::parse`]
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line = self
                .row_positions(row)
                .map(|p| format!("{:<2}", format_cell(self.get(p).flatten())))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
