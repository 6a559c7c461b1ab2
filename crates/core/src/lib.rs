//! Core rules engine - pure, deterministic, and testable
//!
//! This crate contains every rule of the match-3 game: matching, bonus
//! creation, bomb detonation, gravity, refill, scoring and the resolution
//! state machine. It has **no dependencies** on rendering, input, or I/O:
//!
//! - **Deterministic**: same seed and same swaps give identical event streams
//! - **Testable**: every component is a plain function or small struct
//! - **Headless**: the presentation layer only sees [`GameEvent`](types::GameEvent)s
//!
//! # Module Structure
//!
//! - [`grid`]: rows x cols board storage and a text format for tests
//! - [`matcher`]: run detection with Line Bombs as wildcards
//! - [`moves`]: valid-move search and hints
//! - [`bonus`]: which matches become bombs, and where
//! - [`detonate`]: bomb blasts and chain reactions
//! - [`cascade`]: gravity compaction and refill
//! - [`scoring`]: per-tile points, combo multiplier, bomb bonuses
//! - [`generate`]: match-free board generation for new games and reshuffles
//! - [`controller`]: the phase-by-phase resolution pipeline
//!
//! # Example
//!
//! ```
//! use match3_core::{Controller, EngineConfig};
//!
//! let mut game = Controller::new(EngineConfig::default(), 12345).unwrap();
//! let (a, b) = game.hint().unwrap();
//! game.submit_swap(a, b).unwrap();
//! game.resolve();
//!
//! assert!(!game.is_busy());
//! assert!(game.score() > 0);
//! ```

pub mod bonus;
pub mod cascade;
pub mod config;
pub mod controller;
pub mod detonate;
pub mod error;
pub mod generate;
pub mod grid;
pub mod matcher;
pub mod moves;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use bonus::{determine_bonuses, BonusRules, BonusSpawn};
pub use cascade::{collapse, refill};
pub use config::{ColorSchedule, EngineConfig, ScoreConfig};
pub use controller::Controller;
pub use detonate::{detonate, Blast, BlastReport, ColorTarget, Detonation, Trigger};
pub use error::{ConfigError, SwapError};
pub use generate::generate_board;
pub use grid::{Grid, GridParseError};
pub use matcher::{find_matches, has_match, MatchGroup};
pub use moves::{find_valid_move, has_valid_moves};
pub use rng::SimpleRng;
pub use scoring::{calculate_tile_score, combo_multiplier, ScoreTracker};
pub use snapshot::BoardSnapshot;
