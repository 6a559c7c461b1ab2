//! Error types for the rules engine.
//!
//! Nothing here is fatal: a rejected swap leaves the board untouched and the
//! controller Idle, and configuration errors surface before a board exists.

use thiserror::Error;

use crate::types::Pos;

/// Why a swap request was refused before any state changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("a previous swap is still resolving")]
    Busy,
    #[error("position {0} is outside the board")]
    OutOfBounds(Pos),
    #[error("positions {0} and {1} are not adjacent")]
    NotAdjacent(Pos, Pos),
    #[error("cell {0} is empty")]
    EmptyCell(Pos),
}

impl SwapError {
    /// Stable wire code
    pub fn code(self) -> &'static str {
        match self {
            SwapError::Busy => "busy",
            SwapError::OutOfBounds(_) | SwapError::NotAdjacent(..) | SwapError::EmptyCell(_) => {
                "invalid_swap"
            }
        }
    }
}

/// Invalid [`EngineConfig`](crate::config::EngineConfig)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("minimum match length {0} is below 2")]
    MinMatchTooSmall(u8),
    #[error("board {rows}x{cols} is smaller than the minimum match or larger than the maximum")]
    BadDimensions { rows: u8, cols: u8 },
    #[error("bomb thresholds must satisfy min_match ({min_match}) < line ({line}) < color ({color})")]
    BadThresholds { min_match: u8, line: u8, color: u8 },
    #[error("color schedule {initial}..={max} must lie within 3..=7")]
    BadColorSchedule { initial: u8, max: u8 },
    #[error("points per tile must be positive")]
    ZeroTilePoints,
    #[error("board generation needs at least one attempt")]
    ZeroGenerationAttempts,
    #[error("grid is {found_rows}x{found_cols}, configuration expects {rows}x{cols}")]
    GridMismatch {
        rows: u8,
        cols: u8,
        found_rows: u8,
        found_cols: u8,
    },
}
