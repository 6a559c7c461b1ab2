//! Cascade engine - gravity and refill
//!
//! Columns are independent. `collapse` compacts each column downward;
//! `refill` then tops every column up with fresh regular tiles.

use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::types::{FallMove, Pos, SpawnedTile, Tile};

/// Drop every tile onto the lowest empty cell below it.
///
/// Moves are listed column by column (left to right), bottom-up within a
/// column. Tiles that do not move are not listed.
pub fn collapse(grid: &mut Grid) -> Vec<FallMove> {
    let mut moves = Vec::new();
    for col in 0..grid.cols() {
        // Lowest row not yet filled by the compaction.
        let mut write = grid.rows();
        for row in (0..grid.rows()).rev() {
            let from = Pos::new(row, col);
            if !grid.is_occupied(from) {
                continue;
            }
            write -= 1;
            if write != row {
                let to = Pos::new(write, col);
                let cell = grid.take(from);
                grid.set(to, cell);
                moves.push(FallMove { from, to });
            }
        }
    }
    moves
}

/// Fill every empty cell with a random regular tile from the first `active`
/// colors.
///
/// Expects a collapsed grid. Columns are filled left to right, each top to
/// bottom; a tile's `fall` is the number of empty cells in its column, as if
/// the new tiles were stacked just above the board.
pub fn refill(grid: &mut Grid, rng: &mut SimpleRng, active: u8) -> Vec<SpawnedTile> {
    let mut spawned = Vec::new();
    for col in 0..grid.cols() {
        let empty: Vec<Pos> = grid
            .col_positions(col)
            .filter(|&p| !grid.is_occupied(p))
            .collect();
        let fall = empty.len() as u8;
        for pos in empty {
            let tile = Tile::Regular(rng.next_color(active));
            grid.set(pos, Some(tile));
            spawned.push(SpawnedTile { pos, tile, fall });
        }
    }
    spawned
}
