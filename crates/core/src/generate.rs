//! Board generation for new games and reshuffles.
//!
//! Cells are filled row by row. A color is excluded for a cell when the
//! `min_match - 1` cells to its left, or above it, already share that color,
//! so the finished board never contains a match. Boards without a valid move
//! are discarded and regenerated.

use tracing::{debug, instrument, warn};

use crate::grid::Grid;
use crate::moves::has_valid_moves;
use crate::rng::SimpleRng;
use crate::types::{Color, Pos, Tile};

/// Default attempts before settling for a board without a valid move
pub const MAX_GENERATION_ATTEMPTS: u32 = 64;

/// A fresh match-free board with at least one valid move.
///
/// If all `attempts` yield a dead board the last one is returned; the
/// controller's stalemate check will reshuffle it again.
#[instrument(level = "debug", skip(rng))]
pub fn generate_board(
    rows: u8,
    cols: u8,
    min_match: u8,
    active: u8,
    attempts: u32,
    rng: &mut SimpleRng,
) -> Grid {
    let mut grid = Grid::new(rows, cols);
    for attempt in 1..=attempts.max(1) {
        fill_without_matches(&mut grid, min_match, active, rng);
        if has_valid_moves(&grid, min_match) {
            debug!(attempt, rows, cols, active, "generated board");
            return grid;
        }
    }
    warn!(
        attempts,
        "no board with a valid move found; keeping the last attempt"
    );
    grid
}

/// Overwrite every cell with a regular tile, never completing a run
pub fn fill_without_matches(grid: &mut Grid, min_match: u8, active: u8, rng: &mut SimpleRng) {
    let active = active.clamp(1, Color::ALL.len() as u8) as usize;
    let palette = &Color::ALL[..active];
    for pos in grid.positions().collect::<Vec<_>>() {
        let left = run_color(grid, pos, min_match, |p, d| {
            p.col.checked_sub(d).map(|c| Pos::new(p.row, c))
        });
        let above = run_color(grid, pos, min_match, |p, d| {
            p.row.checked_sub(d).map(|r| Pos::new(r, p.col))
        });
        let allowed: Vec<Color> = palette
            .iter()
            .copied()
            .filter(|&c| Some(c) != left && Some(c) != above)
            .collect();
        let color = rng
            .pick(&allowed)
            .unwrap_or_else(|| rng.next_color(active as u8));
        grid.set(pos, Some(Tile::Regular(color)));
    }
}

/// Color shared by the `min_match - 1` cells walking back from `pos`
fn run_color(
    grid: &Grid,
    pos: Pos,
    min_match: u8,
    step_back: impl Fn(Pos, u8) -> Option<Pos>,
) -> Option<Color> {
    let need = min_match.saturating_sub(1);
    if need == 0 {
        return None;
    }
    let mut color: Option<Color> = None;
    for d in 1..=need {
        let c = step_back(pos, d)
            .and_then(|p| grid.tile(p))
            .and_then(|t| t.color())?;
        match color {
            None => color = Some(c),
            Some(prev) if prev != c => return None,
            Some(_) => {}
        }
    }
    color
}
