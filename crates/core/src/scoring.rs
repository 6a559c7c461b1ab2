//! Scoring module - per-tile points, combo multiplier and bomb bonuses
//!
//! Rules:
//! - Every destroyed tile is worth `points_per_tile * multiplier`.
//! - The multiplier is `base + step * (combo - 1)` for combo level 1 and up;
//!   combo level 0 (before the first destruction of a move) uses `base`.
//! - The combo level resets once per accepted player swap and rises by one
//!   for every destruction step of the chain that follows.
//! - Bomb bonuses are flat and never multiplied.

use crate::config::ScoreConfig;
use crate::types::BombKind;

/// Multiplier in effect at `combo`
pub fn combo_multiplier(combo: u32, config: &ScoreConfig) -> u32 {
    let extra_levels = combo.saturating_sub(1);
    config
        .combo_multiplier_base
        .saturating_add(config.combo_multiplier_step.saturating_mul(extra_levels))
}

/// Points for destroying `tiles` tiles at `combo`
pub fn calculate_tile_score(tiles: usize, combo: u32, config: &ScoreConfig) -> u32 {
    (tiles as u32)
        .saturating_mul(config.points_per_tile)
        .saturating_mul(combo_multiplier(combo, config))
}

/// Flat bonus for one detonation
pub fn bomb_bonus(kind: BombKind, config: &ScoreConfig) -> u32 {
    match kind {
        BombKind::Line => config.line_bomb_bonus,
        BombKind::Color => config.color_bomb_bonus,
    }
}

/// Running score and combo level, owned by the board controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTracker {
    config: ScoreConfig,
    score: u32,
    combo: u32,
}

impl ScoreTracker {
    pub fn new(config: ScoreConfig) -> Self {
        Self {
            config,
            score: 0,
            combo: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn multiplier(&self) -> u32 {
        combo_multiplier(self.combo, &self.config)
    }

    /// Start a new player move
    pub fn reset_combo(&mut self) {
        self.combo = 0;
    }

    /// Enter the next destruction step of the chain; returns the new level
    pub fn advance_combo(&mut self) -> u32 {
        self.combo = self.combo.saturating_add(1);
        self.combo
    }

    /// Points for `tiles` destroyed tiles at the current combo level
    pub fn tile_points(&self, tiles: usize) -> u32 {
        calculate_tile_score(tiles, self.combo, &self.config)
    }

    pub fn bomb_bonus(&self, kind: BombKind) -> u32 {
        bomb_bonus(kind, &self.config)
    }

    /// Add points; returns the new total
    pub fn award(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        self.score
    }
}
