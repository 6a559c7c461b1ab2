//! Detonation engine - bomb blasts and chain reactions
//!
//! A detonation never clears cells itself. It reads the grid, decides which
//! cells go, and records them in the caller's `claimed` set; the controller
//! clears everything in one pass afterward.
//!
//! Chains run off an explicit worklist. A bomb caught in a blast is queued
//! instead of being destroyed, and its own detonation removes its cell:
//! - Line Bomb: clears its row or column
//! - Color Bomb: clears one color; a chained Color Bomb picks a random color
//!   still on the board
//!
//! Each bomb fires at most once, so the chain ends after at most one
//! detonation per bomb on the board.
//!
//! Cells in `protected` (this step's bonus spawn cells) are never destroyed.
//! A bomb sitting on a protected cell still fires.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::scoring::ScoreTracker;
use crate::types::{BombKind, Color, Orientation, Pos, Tile};

/// Which cells a Color Bomb clears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    /// Every tile counting as this color (Line Bombs by their base color)
    Color(Color),
    /// A color picked at random from the tiles still standing
    Random,
    /// Every occupied cell (two Color Bombs swapped together)
    Everything,
}

/// Blast shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blast {
    Line(Orientation),
    Color(ColorTarget),
}

impl Blast {
    pub fn kind(&self) -> BombKind {
        match self {
            Blast::Line(_) => BombKind::Line,
            Blast::Color(_) => BombKind::Color,
        }
    }

    /// Blast a caught bomb produces when chain-triggered
    pub fn chained(tile: Tile) -> Option<Self> {
        match tile {
            Tile::LineBomb { orientation, .. } => Some(Blast::Line(orientation)),
            Tile::ColorBomb => Some(Blast::Color(ColorTarget::Random)),
            Tile::Regular(_) => None,
        }
    }
}

/// A bomb about to go off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub pos: Pos,
    pub blast: Blast,
}

/// Outcome of one bomb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detonation {
    pub pos: Pos,
    pub kind: BombKind,
    /// Cells this bomb destroyed, including its own
    pub destroyed: Vec<Pos>,
    /// Tile points at the current combo plus the flat bomb bonus
    pub score: u32,
}

/// Every detonation of one chain, in firing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlastReport {
    pub detonations: Vec<Detonation>,
}

impl BlastReport {
    pub fn total_score(&self) -> u32 {
        self.detonations
            .iter()
            .fold(0u32, |acc, d| acc.saturating_add(d.score))
    }
}

/// Run `triggers` and every bomb they chain into.
///
/// `claimed` holds cells already doomed this step (matched tiles); it grows
/// with every destroyed cell. Scores use the tracker's current combo level;
/// nothing is awarded here.
pub fn detonate(
    grid: &Grid,
    triggers: impl IntoIterator<Item = Trigger>,
    claimed: &mut HashSet<Pos>,
    protected: &HashSet<Pos>,
    scores: &ScoreTracker,
    rng: &mut SimpleRng,
) -> BlastReport {
    let mut queue: VecDeque<Trigger> = VecDeque::new();
    let mut fired: HashSet<Pos> = HashSet::new();
    for trigger in triggers {
        if fired.insert(trigger.pos) {
            queue.push_back(trigger);
        }
    }

    let mut report = BlastReport::default();
    while let Some(Trigger { pos, blast }) = queue.pop_front() {
        debug_assert!(
            grid.tile(pos).is_some_and(|t| t.is_bomb()),
            "detonation at {pos} without a bomb"
        );

        let mut destroyed = Vec::new();
        if !protected.contains(&pos) && claimed.insert(pos) {
            destroyed.push(pos);
        }

        for target in blast_area(grid, pos, blast, claimed, protected, &fired, rng) {
            if target == pos || claimed.contains(&target) || protected.contains(&target) {
                continue;
            }
            let Some(tile) = grid.tile(target) else {
                continue;
            };
            match Blast::chained(tile) {
                Some(next) => {
                    if fired.insert(target) {
                        queue.push_back(Trigger {
                            pos: target,
                            blast: next,
                        });
                    }
                }
                None => {
                    claimed.insert(target);
                    destroyed.push(target);
                }
            }
        }

        let kind = blast.kind();
        let score = scores
            .tile_points(destroyed.len())
            .saturating_add(scores.bomb_bonus(kind));
        debug!(%pos, kind = kind.as_str(), destroyed = destroyed.len(), score, "bomb detonated");
        report.detonations.push(Detonation {
            pos,
            kind,
            destroyed,
            score,
        });
    }

    report
}

/// Cells a blast from `pos` reaches, before claimed/protected filtering
fn blast_area(
    grid: &Grid,
    pos: Pos,
    blast: Blast,
    claimed: &HashSet<Pos>,
    protected: &HashSet<Pos>,
    fired: &HashSet<Pos>,
    rng: &mut SimpleRng,
) -> Vec<Pos> {
    match blast {
        Blast::Line(orientation) => grid.line_positions(pos, orientation),
        Blast::Color(ColorTarget::Everything) => {
            grid.positions().filter(|&p| grid.is_occupied(p)).collect()
        }
        Blast::Color(ColorTarget::Color(color)) => cells_of_color(grid, color),
        Blast::Color(ColorTarget::Random) => {
            let standing = standing_colors(grid, pos, claimed, protected, fired);
            match rng.pick(&standing) {
                Some(color) => {
                    debug!(%pos, color = color.as_str(), "chained color bomb picked target");
                    cells_of_color(grid, color)
                }
                None => Vec::new(),
            }
        }
    }
}

fn cells_of_color(grid: &Grid, color: Color) -> Vec<Pos> {
    grid.positions()
        .filter(|&p| grid.tile(p).and_then(|t| t.color()) == Some(color))
        .collect()
}

/// Distinct colors still standing, in order of first appearance
fn standing_colors(
    grid: &Grid,
    origin: Pos,
    claimed: &HashSet<Pos>,
    protected: &HashSet<Pos>,
    fired: &HashSet<Pos>,
) -> Vec<Color> {
    let mut colors = Vec::new();
    for p in grid.positions() {
        if p == origin || claimed.contains(&p) || protected.contains(&p) || fired.contains(&p) {
            continue;
        }
        if let Some(c) = grid.tile(p).and_then(|t| t.color()) {
            if !colors.contains(&c) {
                colors.push(c);
            }
        }
    }
    colors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreConfig;

    fn grid(text: &str) -> Grid {
        Grid::parse(text).unwrap()
    }

    fn run(g: &Grid, triggers: Vec<Trigger>) -> (BlastReport, HashSet<Pos>) {
        let mut claimed = HashSet::new();
        let scores = ScoreTracker::new(ScoreConfig::default());
        let mut rng = SimpleRng::new(1);
        let report = detonate(g, triggers, &mut claimed, &HashSet::new(), &scores, &mut rng);
        (report, claimed)
    }

    fn line(pos: Pos, orientation: Orientation) -> Trigger {
        Trigger {
            pos,
            blast: Blast::Line(orientation),
        }
    }

    #[test]
    fn test_row_bomb_clears_its_row() {
        let g = grid(
            "R G B Y
             G R- G B
             B Y R G",
        );
        let (report, claimed) = run(&g, vec![line(Pos::new(1, 1), Orientation::Row)]);
        assert_eq!(report.detonations.len(), 1);
        let d = &report.detonations[0];
        assert_eq!(d.kind, BombKind::Line);
        assert_eq!(d.destroyed.len(), 4);
        assert_eq!(d.destroyed[0], Pos::new(1, 1));
        // 4 tiles at combo 0 (multiplier 1) plus the flat bonus
        assert_eq!(d.score, 40 + 50);
        assert_eq!(claimed.len(), 4);
        assert!((0..4).all(|c| claimed.contains(&Pos::new(1, c))));
    }

    #[test]
    fn test_column_bomb_skips_empty_cells() {
        let g = grid(
            "R G
             . B
             G| R
             B Y",
        );
        let (report, _) = run(&g, vec![line(Pos::new(2, 0), Orientation::Column)]);
        assert_eq!(report.detonations[0].destroyed.len(), 3);
    }

    #[test]
    fn test_caught_line_bomb_chains() {
        let g = grid(
            "R G B Y
             G R- G B|
             B Y R G
             Y B G R",
        );
        let (report, claimed) = run(&g, vec![line(Pos::new(1, 1), Orientation::Row)]);
        assert_eq!(report.detonations.len(), 2);
        // The caught bomb is not in the first blast's destroyed list.
        assert!(!report.detonations[0].destroyed.contains(&Pos::new(1, 3)));
        assert_eq!(report.detonations[1].pos, Pos::new(1, 3));
        assert!(report.detonations[1].destroyed.contains(&Pos::new(1, 3)));
        // Row blast takes 3 cells, the column blast 4 including its own.
        assert_eq!(report.detonations[0].destroyed.len(), 3);
        assert_eq!(report.detonations[1].destroyed.len(), 4);
        assert_eq!(claimed.len(), 7);
        assert_eq!(report.total_score(), (30 + 50) + (40 + 50));
    }

    #[test]
    fn test_caught_color_bomb_chains_on_a_standing_color() {
        let g = grid(
            "B B B B
             R- G * G
             B B B B",
        );
        let (report, claimed) = run(&g, vec![line(Pos::new(1, 0), Orientation::Row)]);
        let kinds: Vec<BombKind> = report.detonations.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![BombKind::Line, BombKind::Color]);

        // The row blast leaves the Color Bomb standing for its own detonation.
        assert_eq!(report.detonations[0].destroyed.len(), 3);
        assert!(!report.detonations[0].destroyed.contains(&Pos::new(1, 2)));

        // Only blue is still standing, so the chained bomb takes every blue.
        let color = &report.detonations[1];
        assert_eq!(color.pos, Pos::new(1, 2));
        assert_eq!(color.destroyed[0], Pos::new(1, 2));
        assert_eq!(color.destroyed.len(), 9);
        assert_eq!(claimed.len(), 12);
        assert_eq!(report.total_score(), (30 + 50) + (90 + 100));
    }

    #[test]
    fn test_color_bomb_targets_base_color_line_bombs() {
        let g = grid(
            "R G *
             G R- B
             B Y R",
        );
        let trigger = Trigger {
            pos: Pos::new(0, 2),
            blast: Blast::Color(ColorTarget::Color(Color::Red)),
        };
        let (report, claimed) = run(&g, vec![trigger]);
        // Color bomb takes (0,0) and (2,2); the red Line Bomb chains and clears row 1.
        assert_eq!(report.detonations.len(), 2);
        assert_eq!(report.detonations[0].kind, BombKind::Color);
        assert_eq!(report.detonations[0].destroyed.len(), 3);
        assert_eq!(report.detonations[1].kind, BombKind::Line);
        assert_eq!(report.detonations[1].destroyed.len(), 3);
        assert_eq!(claimed.len(), 6);
    }

    #[test]
    fn test_double_color_bomb_clears_everything() {
        let g = grid(
            "R G B
             G * *
             B Y R",
        );
        let trigger = Trigger {
            pos: Pos::new(1, 1),
            blast: Blast::Color(ColorTarget::Everything),
        };
        let (report, claimed) = run(&g, vec![trigger]);
        assert_eq!(claimed.len(), 9);
        // The partner bomb chains with nothing left to target.
        assert_eq!(report.detonations.len(), 2);
        assert_eq!(report.detonations[1].destroyed, vec![Pos::new(1, 2)]);
    }

    #[test]
    fn test_protected_cells_survive_but_bombs_there_fire() {
        let g = grid(
            "R G B
             G R- B
             B Y R",
        );
        let mut claimed = HashSet::new();
        let protected: HashSet<Pos> = [Pos::new(1, 1), Pos::new(1, 2)].into_iter().collect();
        let scores = ScoreTracker::new(ScoreConfig::default());
        let mut rng = SimpleRng::new(1);
        let report = detonate(
            &g,
            vec![line(Pos::new(1, 1), Orientation::Row)],
            &mut claimed,
            &protected,
            &scores,
            &mut rng,
        );
        assert_eq!(report.detonations[0].destroyed, vec![Pos::new(1, 0)]);
        assert!(!claimed.contains(&Pos::new(1, 2)));
    }

    #[test]
    fn test_claimed_cells_are_not_counted_twice() {
        let g = grid("R- G B Y");
        let mut claimed: HashSet<Pos> = [Pos::new(0, 1)].into_iter().collect();
        let scores = ScoreTracker::new(ScoreConfig::default());
        let mut rng = SimpleRng::new(1);
        let report = detonate(
            &g,
            vec![line(Pos::new(0, 0), Orientation::Row)],
            &mut claimed,
            &HashSet::new(),
            &scores,
            &mut rng,
        );
        assert_eq!(report.detonations[0].destroyed.len(), 3);
        assert_eq!(claimed.len(), 4);
    }

    #[test]
    fn test_random_target_picks_standing_color() {
        let g = grid(
            "* G G
             G G G",
        );
        let trigger = Trigger {
            pos: Pos::new(0, 0),
            blast: Blast::Color(ColorTarget::Random),
        };
        let (report, claimed) = run(&g, vec![trigger]);
        // Only green is standing, so every green goes.
        assert_eq!(report.detonations[0].destroyed.len(), 6);
        assert_eq!(claimed.len(), 6);
    }

    #[test]
    fn test_duplicate_triggers_fire_once() {
        let g = grid("R- G B");
        let t = line(Pos::new(0, 0), Orientation::Row);
        let (report, _) = run(&g, vec![t, t]);
        assert_eq!(report.detonations.len(), 1);
    }
}
