use crate::grid::Grid;
use crate::types::{Phase, Pos, Tile, EMPTY_CODE};

/// FNV-1a 64-bit over a byte stream
pub fn fnv1a64(bytes: impl IntoIterator<Item = u8>) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    bytes.into_iter().fold(OFFSET_BASIS, |h, b| {
        (h ^ b as u64).wrapping_mul(PRIME)
    })
}

/// Flat copy of the controller state for presentation layers and tests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardSnapshot {
    pub rows: u8,
    pub cols: u8,
    /// Row-major tile codes (see [`Tile::code`]); 0 for empty
    pub cells: Vec<u8>,
    pub board_hash: u64,
    pub score: u32,
    pub combo: u32,
    pub phase: Phase,
    pub active_colors: u8,
}

impl BoardSnapshot {
    pub fn capture(grid: &Grid, score: u32, combo: u32, phase: Phase, active_colors: u8) -> Self {
        let cells: Vec<u8> = grid
            .cells()
            .iter()
            .map(|cell| cell.map_or(EMPTY_CODE, |t| t.code()))
            .collect();
        let board_hash = fnv1a64([grid.rows(), grid.cols()].into_iter().chain(cells.iter().copied()));
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            cells,
            board_hash,
            score,
            combo,
            phase,
            active_colors,
        }
    }

    /// Tile at `pos`, decoded
    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        let idx = pos.row as usize * self.cols as usize + pos.col as usize;
        self.cells.get(idx).copied().and_then(Tile::from_code)
    }

    /// Cells as rows, for wire formats that want a 2-D array
    pub fn rows_iter(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.cols.max(1) as usize)
    }

    /// Rebuild the grid this snapshot was taken from
    pub fn to_grid(&self) -> Option<Grid> {
        let cells = self.cells.iter().map(|&code| Tile::from_code(code)).collect();
        Grid::from_cells(self.rows, self.cols, cells)
    }
}
