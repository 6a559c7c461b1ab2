//! Bonus determiner - which matches turn into bombs, and where.
//!
//! A group of exactly `line` tiles spawns a Line Bomb clearing along the
//! group's own axis; a group of `color` tiles or more spawns a Color Bomb.
//!
//! Spawn cell priority for each group:
//! 1. the swap destination, if it is in the group
//! 2. the swap origin, if it is in the group
//! 3. the middle of the run, searching outward (lower index first)
//!
//! A chosen cell is reserved for the rest of the step; a later group whose
//! preferred cell is taken falls through to its next candidate. Groups are
//! processed in [`find_matches`](crate::matcher::find_matches) order, so a row
//! group beats a column group for a shared swap cell.

use crate::grid::Grid;
use crate::matcher::MatchGroup;
use crate::types::{Pos, Tile};

/// Run lengths that produce bombs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusRules {
    pub line: u8,
    pub color: u8,
}

/// A bomb to place once the step's matched tiles are cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusSpawn {
    pub pos: Pos,
    pub tile: Tile,
}

/// The player's swap, as (origin, destination)
pub type SwapPair = (Pos, Pos);

/// Indices of a run of `len` cells, middle first then outward, lower side first
fn middle_out(len: usize) -> impl Iterator<Item = usize> {
    let mid = len.saturating_sub(1) / 2;
    (0..len).flat_map(move |d| {
        let below = mid.checked_sub(d);
        let above = (d > 0 && mid + d < len).then_some(mid + d);
        below.into_iter().chain(above)
    })
}

/// Decide the bonus tiles produced by one resolution step.
///
/// `swap` is supplied only for the step triggered directly by a player swap;
/// cascaded steps pass `None` and always use the middle-out placement.
pub fn determine_bonuses(
    grid: &Grid,
    groups: &[MatchGroup],
    swap: Option<SwapPair>,
    rules: BonusRules,
) -> Vec<BonusSpawn> {
    let mut spawns: Vec<BonusSpawn> = Vec::new();

    for group in groups {
        let len = group.positions.len();
        if len < rules.line as usize {
            continue;
        }

        let tile = if len >= rules.color as usize {
            Tile::ColorBomb
        } else {
            let Some(base) = group.resolved_color(grid) else {
                debug_assert!(false, "match group without any colored tile");
                continue;
            };
            Tile::LineBomb {
                orientation: group.axis.orientation(),
                base,
            }
        };

        let preferred = swap
            .into_iter()
            .flat_map(|(origin, destination)| [destination, origin])
            .filter(|&p| group.contains(p));
        let fallback = middle_out(len).map(|i| group.positions[i]);

        let free = preferred
            .chain(fallback)
            .find(|p| spawns.iter().all(|s| s.pos != *p));
        if let Some(pos) = free {
            spawns.push(BonusSpawn { pos, tile });
        }
    }

    spawns
}
