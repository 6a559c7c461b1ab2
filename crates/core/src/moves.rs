//! Move validator - is there any swap that does something?
//!
//! Every cell is paired with its right and lower neighbour. A pair touching a
//! Color Bomb always counts (its detonation is the payoff). Any other pair is
//! tried: swapped on a scratch copy, scanned for matches, swapped back.

use tracing::trace;

use crate::grid::Grid;
use crate::matcher::find_matches;
use crate::types::{Pos, Tile};

/// Adjacent pairs in scan order: for each cell, (cell, right) then (cell, down)
fn candidate_pairs(grid: &Grid) -> impl Iterator<Item = (Pos, Pos)> + '_ {
    grid.positions().flat_map(move |p| {
        grid.neighbors(p)
            .into_iter()
            .filter(move |&q| q > p)
            .map(move |q| (p, q))
    })
}

fn involves_color_bomb(grid: &Grid, a: Pos, b: Pos) -> bool {
    matches!(grid.tile(a), Some(Tile::ColorBomb)) || matches!(grid.tile(b), Some(Tile::ColorBomb))
}

/// Matched cells produced by swapping `a` and `b` (0 if none).
///
/// The grid is restored before returning.
pub fn trial_swap(grid: &mut Grid, a: Pos, b: Pos, min_match: u8) -> usize {
    grid.swap(a, b);
    let matched = find_matches(grid, min_match)
        .iter()
        .map(|g| g.positions.len())
        .sum();
    grid.swap(a, b);
    matched
}

/// True if at least one swap is worth making
pub fn has_valid_moves(grid: &Grid, min_match: u8) -> bool {
    let mut scratch = grid.clone();
    for (a, b) in candidate_pairs(grid) {
        if !grid.is_occupied(a) || !grid.is_occupied(b) {
            continue;
        }
        if involves_color_bomb(grid, a, b) {
            trace!(%a, %b, "color bomb adjacency counts as a move");
            return true;
        }
        if trial_swap(&mut scratch, a, b, min_match) > 0 {
            trace!(%a, %b, "found valid swap");
            return true;
        }
    }
    false
}

/// Best swap for a hint.
///
/// Picks the trial swap with the most matched cells; the first one found wins
/// ties. If no trial matches, falls back to the first Color Bomb pair.
pub fn find_valid_move(grid: &Grid, min_match: u8) -> Option<(Pos, Pos)> {
    let mut scratch = grid.clone();
    let mut best: Option<((Pos, Pos), usize)> = None;
    let mut bomb_pair: Option<(Pos, Pos)> = None;

    for (a, b) in candidate_pairs(grid) {
        if !grid.is_occupied(a) || !grid.is_occupied(b) {
            continue;
        }
        if involves_color_bomb(grid, a, b) {
            bomb_pair.get_or_insert((a, b));
            continue;
        }
        let matched = trial_swap(&mut scratch, a, b, min_match);
        if matched > best.map_or(0, |(_, n)| n) {
            best = Some(((a, b), matched));
        }
    }

    best.map(|(pair, _)| pair).or(bomb_pair)
}
