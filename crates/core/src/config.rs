//! Engine configuration consumed at construction.
//!
//! All fields have defaults matching the constants in the types crate, so a
//! partial JSON document (or `EngineConfig::default()`) is always usable.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generate::MAX_GENERATION_ATTEMPTS;
use crate::types::{
    COLOR_BOMB_BONUS, COLOR_BOMB_THRESHOLD, COLOR_COUNT, COLOR_SCORE_STEP, COMBO_MULTIPLIER_BASE,
    COMBO_MULTIPLIER_STEP, DEFAULT_COLS, DEFAULT_MIN_MATCH, DEFAULT_ROWS, INITIAL_ACTIVE_COLORS,
    LINE_BOMB_BONUS, LINE_BOMB_THRESHOLD, MAX_GRID_DIM, MIN_ACTIVE_COLORS, POINTS_PER_TILE,
};

/// Scoring constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub points_per_tile: u32,
    /// Multiplier at combo level 1
    pub combo_multiplier_base: u32,
    /// Added to the multiplier for every further combo level
    pub combo_multiplier_step: u32,
    pub line_bomb_bonus: u32,
    pub color_bomb_bonus: u32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            points_per_tile: POINTS_PER_TILE,
            combo_multiplier_base: COMBO_MULTIPLIER_BASE,
            combo_multiplier_step: COMBO_MULTIPLIER_STEP,
            line_bomb_bonus: LINE_BOMB_BONUS,
            color_bomb_bonus: COLOR_BOMB_BONUS,
        }
    }
}

/// How many colors are in play as the score grows
///
/// `active = min(max, initial + score / score_step)`; a `score_step` of 0
/// keeps the count fixed at `initial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSchedule {
    pub initial: u8,
    pub max: u8,
    pub score_step: u32,
}

impl ColorSchedule {
    pub fn active_count(&self, score: u32) -> u8 {
        if self.score_step == 0 {
            return self.initial;
        }
        let extra = (score / self.score_step).min(u8::MAX as u32) as u8;
        self.initial.saturating_add(extra).min(self.max)
    }
}

impl Default for ColorSchedule {
    fn default() -> Self {
        Self {
            initial: INITIAL_ACTIVE_COLORS,
            max: COLOR_COUNT,
            score_step: COLOR_SCORE_STEP,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rows: u8,
    pub cols: u8,
    pub min_match: u8,
    pub line_bomb_threshold: u8,
    pub color_bomb_threshold: u8,
    pub scoring: ScoreConfig,
    pub colors: ColorSchedule,
    /// Boards tried per generation before keeping one without a move
    pub generation_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            min_match: DEFAULT_MIN_MATCH,
            line_bomb_threshold: LINE_BOMB_THRESHOLD,
            color_bomb_threshold: COLOR_BOMB_THRESHOLD,
            scoring: ScoreConfig::default(),
            colors: ColorSchedule::default(),
            generation_attempts: MAX_GENERATION_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    /// Check the configuration is playable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_match < 2 {
            return Err(ConfigError::MinMatchTooSmall(self.min_match));
        }
        for dim in [self.rows, self.cols] {
            if dim < self.min_match || dim > MAX_GRID_DIM {
                return Err(ConfigError::BadDimensions {
                    rows: self.rows,
                    cols: self.cols,
                });
            }
        }
        if self.line_bomb_threshold <= self.min_match
            || self.color_bomb_threshold <= self.line_bomb_threshold
        {
            return Err(ConfigError::BadThresholds {
                min_match: self.min_match,
                line: self.line_bomb_threshold,
                color: self.color_bomb_threshold,
            });
        }
        let ColorSchedule { initial, max, .. } = self.colors;
        if initial < MIN_ACTIVE_COLORS || max > COLOR_COUNT || initial > max {
            return Err(ConfigError::BadColorSchedule { initial, max });
        }
        if self.scoring.points_per_tile == 0 {
            return Err(ConfigError::ZeroTilePoints);
        }
        if self.generation_attempts == 0 {
            return Err(ConfigError::ZeroGenerationAttempts);
        }
        Ok(())
    }

    /// Colors in play at the given score
    pub fn active_colors(&self, score: u32) -> u8 {
        self.colors.active_count(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rows, 8);
        assert_eq!(config.cols, 8);
        assert_eq!(config.min_match, 3);
        assert_eq!(config.line_bomb_threshold, 4);
        assert_eq!(config.color_bomb_threshold, 5);
    }

    #[test]
    fn test_color_schedule_grows_and_caps() {
        let schedule = ColorSchedule {
            initial: 5,
            max: 7,
            score_step: 1000,
        };
        assert_eq!(schedule.active_count(0), 5);
        assert_eq!(schedule.active_count(999), 5);
        assert_eq!(schedule.active_count(1000), 6);
        assert_eq!(schedule.active_count(2500), 7);
        assert_eq!(schedule.active_count(u32::MAX), 7);
    }

    #[test]
    fn test_color_schedule_fixed_when_step_is_zero() {
        let schedule = ColorSchedule {
            initial: 4,
            max: 7,
            score_step: 0,
        };
        assert_eq!(schedule.active_count(1_000_000), 4);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.rows = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadDimensions { .. })
        ));

        let mut config = EngineConfig::default();
        config.color_bomb_threshold = 4;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadThresholds { .. })
        ));

        let mut config = EngineConfig::default();
        config.colors.initial = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadColorSchedule { .. })
        ));

        let mut config = EngineConfig::default();
        config.scoring.points_per_tile = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTilePoints));

        let mut config = EngineConfig::default();
        config.generation_attempts = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroGenerationAttempts));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"rows": 9, "scoring": {"points_per_tile": 20}}"#).unwrap();
        assert_eq!(config.rows, 9);
        assert_eq!(config.cols, 8);
        assert_eq!(config.scoring.points_per_tile, 20);
        assert_eq!(config.scoring.line_bomb_bonus, 50);
        assert!(config.validate().is_ok());
    }
}
