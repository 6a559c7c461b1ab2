//! Match finder - scans the grid for runs of same-colored tiles
//!
//! Each row is scanned left to right, then each column top to bottom.
//! Line Bombs act as wildcards: they extend whatever run they sit in, and a
//! run made only of Line Bombs still counts. Color Bombs and empty cells
//! break runs and never appear in a group.
//!
//! When a run is broken by a different color, the next run starts at the
//! wildcard streak just before the breaking cell, so one Line Bomb may belong
//! to two neighbouring runs. Groups are reported independently; a cell shared
//! by a row group and a column group appears in both.

use crate::grid::Grid;
use crate::types::{Axis, Cell, Color, Pos, Tile};

/// A contiguous run of matching tiles along one axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    /// Positions in scan order (left to right, or top to bottom)
    pub positions: Vec<Pos>,
    pub axis: Axis,
    /// Run color; `None` when every tile in the run is a wildcard
    pub color: Option<Color>,
}

impl MatchGroup {
    pub fn contains(&self, pos: Pos) -> bool {
        self.positions.contains(&pos)
    }

    /// The regular color of the run, resolving an all-wildcard run through
    /// its first Line Bomb's base color
    pub fn resolved_color(&self, grid: &Grid) -> Option<Color> {
        self.color.or_else(|| {
            self.positions
                .iter()
                .find_map(|&p| grid.tile(p).and_then(|t| t.color()))
        })
    }
}

/// How a cell takes part in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKey {
    Color(Color),
    Wild,
    Breaks,
}

fn run_key(cell: Cell) -> RunKey {
    match cell {
        Some(Tile::Regular(c)) => RunKey::Color(c),
        Some(Tile::LineBomb { .. }) => RunKey::Wild,
        Some(Tile::ColorBomb) | None => RunKey::Breaks,
    }
}

/// Find every run of at least `min_match` tiles.
///
/// Output order: rows top to bottom, then columns left to right.
pub fn find_matches(grid: &Grid, min_match: u8) -> Vec<MatchGroup> {
    let mut groups = Vec::new();
    for row in 0..grid.rows() {
        let line: Vec<Pos> = grid.row_positions(row).collect();
        scan_line(grid, &line, Axis::Row, min_match, &mut groups);
    }
    for col in 0..grid.cols() {
        let line: Vec<Pos> = grid.col_positions(col).collect();
        scan_line(grid, &line, Axis::Column, min_match, &mut groups);
    }
    groups
}

/// True if the grid holds at least one run
pub fn has_match(grid: &Grid, min_match: u8) -> bool {
    !find_matches(grid, min_match).is_empty()
}

fn scan_line(grid: &Grid, line: &[Pos], axis: Axis, min_match: u8, out: &mut Vec<MatchGroup>) {
    let mut flush = |range: &[Pos], color: Option<Color>| {
        if range.len() >= min_match as usize {
            out.push(MatchGroup {
                positions: range.to_vec(),
                axis,
                color,
            });
        }
    };

    let mut start = 0usize;
    let mut run_color: Option<Color> = None;
    // Start of the wildcard streak ending at the previous cell, if any.
    let mut wild_start: Option<usize> = None;

    for (i, &pos) in line.iter().enumerate() {
        match run_key(grid.get(pos).flatten()) {
            RunKey::Breaks => {
                flush(&line[start..i], run_color);
                start = i + 1;
                run_color = None;
                wild_start = None;
            }
            RunKey::Wild => {
                wild_start.get_or_insert(i);
            }
            RunKey::Color(c) => {
                match run_color {
                    None => run_color = Some(c),
                    Some(rc) if rc == c => {}
                    Some(_) => {
                        flush(&line[start..i], run_color);
                        start = wild_start.unwrap_or(i);
                        run_color = Some(c);
                    }
                }
                wild_start = None;
            }
        }
    }
    if start < line.len() {
        flush(&line[start..], run_color);
    }
}
