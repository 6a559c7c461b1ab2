//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (rules engine, presentation layer, wire protocol).
//!
//! # Board Dimensions
//!
//! - **Rows**: 8 by default (row 0 is the top)
//! - **Columns**: 8 by default (column 0 is the left edge)
//! - **Maximum**: 32 in either direction
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_MIN_MATCH` | 3 | Shortest run that counts as a match |
//! | `LINE_BOMB_THRESHOLD` | 4 | Run length that spawns a Line Bomb |
//! | `COLOR_BOMB_THRESHOLD` | 5 | Run length that spawns a Color Bomb |
//! | `POINTS_PER_TILE` | 10 | Base points per destroyed tile |
//! | `LINE_BOMB_BONUS` | 50 | Flat bonus per Line Bomb detonation |
//! | `COLOR_BOMB_BONUS` | 100 | Flat bonus per Color Bomb detonation |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Color, Orientation, Pos, Tile};
//!
//! let red = Tile::Regular(Color::Red);
//! assert_eq!(red.color(), Some(Color::Red));
//!
//! let bomb = Tile::LineBomb { orientation: Orientation::Row, base: Color::Blue };
//! assert_eq!(bomb.color(), Some(Color::Blue));
//! assert!(Tile::ColorBomb.color().is_none());
//!
//! assert!(Pos::new(2, 3).is_adjacent(Pos::new(2, 4)));
//! assert!(!Pos::new(2, 3).is_adjacent(Pos::new(3, 4)));
//! assert_eq!(Color::from_str("GREEN"), Some(Color::Green));
//! ```

use std::fmt;

/// Default board height in rows
pub const DEFAULT_ROWS: u8 = 8;

/// Default board width in columns
pub const DEFAULT_COLS: u8 = 8;

/// Largest supported board dimension
pub const MAX_GRID_DIM: u8 = 32;

/// Shortest run counted as a match
pub const DEFAULT_MIN_MATCH: u8 = 3;

/// Run length that spawns a Line Bomb
pub const LINE_BOMB_THRESHOLD: u8 = 4;

/// Run length (and above) that spawns a Color Bomb
pub const COLOR_BOMB_THRESHOLD: u8 = 5;

/// Base points for each destroyed tile (before the combo multiplier)
pub const POINTS_PER_TILE: u32 = 10;

/// Combo multiplier at combo level 1
pub const COMBO_MULTIPLIER_BASE: u32 = 1;

/// Multiplier increase per additional combo level
pub const COMBO_MULTIPLIER_STEP: u32 = 1;

/// Flat bonus for each Line Bomb detonation
pub const LINE_BOMB_BONUS: u32 = 50;

/// Flat bonus for each Color Bomb detonation
pub const COLOR_BOMB_BONUS: u32 = 100;

/// Number of distinct regular colors
pub const COLOR_COUNT: u8 = 7;

/// Fewest colors ever in play
pub const MIN_ACTIVE_COLORS: u8 = 3;

/// Colors in play at score 0
pub const INITIAL_ACTIVE_COLORS: u8 = 5;

/// Score needed for each extra active color
pub const COLOR_SCORE_STEP: u32 = 2500;


/// The regular tile colors
///
/// Only the first `active` colors of [`Color::ALL`] are drawn at any time;
/// the active count grows with score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    White,
}

impl Color {
    /// Every color, in draw order
    pub const ALL: [Color; COLOR_COUNT as usize] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
        Color::White,
    ];

    /// Position of this color in [`Color::ALL`]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Color at `index` in [`Color::ALL`]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_types::Color;
    ///
    /// assert_eq!(Color::from_str("red"), Some(Color::Red));
    /// assert_eq!(Color::from_str("Purple"), Some(Color::Purple));
    /// assert_eq!(Color::from_str("black"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "orange" => Some(Color::Orange),
            "yellow" => Some(Color::Yellow),
            "green" => Some(Color::Green),
            "blue" => Some(Color::Blue),
            "purple" => Some(Color::Purple),
            "white" => Some(Color::White),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::White => "white",
        }
    }
}

/// Clearing direction of a Line Bomb
///
/// - **Row**: clears the bomb's entire row
/// - **Column**: clears the bomb's entire column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Row,
    Column,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Row => "row",
            Orientation::Column => "column",
        }
    }
}

/// Direction of a match run
///
/// A row-wise run lies along a single row (horizontal), a column-wise run
/// along a single column (vertical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    /// Line Bombs clear along the same axis as the run that created them.
    pub fn orientation(self) -> Orientation {
        match self {
            Axis::Row => Orientation::Row,
            Axis::Column => Orientation::Column,
        }
    }
}

/// Kind of special tile, used in detonation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BombKind {
    Line,
    Color,
}

impl BombKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BombKind::Line => "line",
            BombKind::Color => "color",
        }
    }
}

/// A tile on the board
///
/// - `Regular`: a plain colored tile
/// - `LineBomb`: clears a row or column when detonated; matches as a wildcard
///   and remembers the color of the run that created it
/// - `ColorBomb`: clears every tile of one color; never part of a passive match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Regular(Color),
    LineBomb {
        orientation: Orientation,
        base: Color,
    },
    ColorBomb,
}

/// Wire code for an empty cell
pub const EMPTY_CODE: u8 = 0;

const LINE_BOMB_ROW_CODE: u8 = 16;
const LINE_BOMB_COLUMN_CODE: u8 = 24;
const COLOR_BOMB_CODE: u8 = 32;

impl Tile {
    /// The color this tile counts as, if any
    ///
    /// Line Bombs report their base color; Color Bombs have none.
    pub fn color(&self) -> Option<Color> {
        match *self {
            Tile::Regular(c) => Some(c),
            Tile::LineBomb { base, .. } => Some(base),
            Tile::ColorBomb => None,
        }
    }

    pub fn is_bomb(&self) -> bool {
        self.bomb_kind().is_some()
    }

    pub fn bomb_kind(&self) -> Option<BombKind> {
        match self {
            Tile::Regular(_) => None,
            Tile::LineBomb { .. } => Some(BombKind::Line),
            Tile::ColorBomb => Some(BombKind::Color),
        }
    }

    /// Compact code used by snapshots and the wire protocol
    ///
    /// | Code | Tile |
    /// |------|------|
    /// | 1..=7 | regular color (index + 1) |
    /// | 16..=22 | row-clearing Line Bomb (16 + color index) |
    /// | 24..=30 | column-clearing Line Bomb (24 + color index) |
    /// | 32 | Color Bomb |
    pub fn code(&self) -> u8 {
        match *self {
            Tile::Regular(c) => c.index() + 1,
            Tile::LineBomb {
                orientation: Orientation::Row,
                base,
            } => LINE_BOMB_ROW_CODE + base.index(),
            Tile::LineBomb {
                orientation: Orientation::Column,
                base,
            } => LINE_BOMB_COLUMN_CODE + base.index(),
            Tile::ColorBomb => COLOR_BOMB_CODE,
        }
    }

    /// Inverse of [`Tile::code`]; `None` for the empty code or unknown values
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1..=COLOR_COUNT => Color::from_index(code - 1).map(Tile::Regular),
            LINE_BOMB_ROW_CODE..=23 => Color::from_index(code - LINE_BOMB_ROW_CODE).map(|base| {
                Tile::LineBomb {
                    orientation: Orientation::Row,
                    base,
                }
            }),
            LINE_BOMB_COLUMN_CODE..=31 => {
                Color::from_index(code - LINE_BOMB_COLUMN_CODE).map(|base| Tile::LineBomb {
                    orientation: Orientation::Column,
                    base,
                })
            }
            COLOR_BOMB_CODE => Some(Tile::ColorBomb),
            _ => None,
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell (only transient, between destruction and refill)
/// - `Some(Tile)`: Occupied cell
pub type Cell = Option<Tile>;

/// Board position; row 0 is the top, column 0 the left edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// True if `other` shares one coordinate and differs by exactly 1 in the other
    pub fn is_adjacent(&self, other: Pos) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr + dc == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Board controller state
///
/// - **Idle**: accepting swaps
/// - **Resolving**: a swap has been applied and awaits validation
/// - **Chaining**: destroy / fall / refill loop in progress
/// - **Stalemate**: no legal move remains; the next step reshuffles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Resolving,
    Chaining,
    Stalemate,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Resolving => "resolving",
            Phase::Chaining => "chaining",
            Phase::Stalemate => "stalemate",
        }
    }
}

/// Why a swap did not go through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Out of bounds, not adjacent, or an empty cell
    Invalid,
    /// Legal adjacency but no match; the swap is reverted
    NoMatch,
    /// A previous swap is still resolving
    Busy,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Invalid => "invalid",
            RejectReason::NoMatch => "noMatch",
            RejectReason::Busy => "busy",
        }
    }
}

/// One tile sliding down a column during a cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallMove {
    pub from: Pos,
    pub to: Pos,
}

impl FallMove {
    /// Rows traversed
    pub fn distance(&self) -> u8 {
        self.to.row - self.from.row
    }
}

/// A fresh tile entering a column from above the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnedTile {
    pub pos: Pos,
    pub tile: Tile,
    /// Rows traversed, counting the offset above the visible board
    pub fall: u8,
}

/// Events emitted by the board controller for the presentation layer
///
/// Each event carries enough data to animate without reading the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    TilesSwapped {
        a: Pos,
        b: Pos,
    },
    SwapRejected {
        a: Pos,
        b: Pos,
        reason: RejectReason,
    },
    TilesMatched {
        positions: Vec<Pos>,
        score_delta: u32,
    },
    BonusSpawned {
        pos: Pos,
        tile: Tile,
    },
    BombDetonated {
        pos: Pos,
        kind: BombKind,
        destroyed: Vec<Pos>,
        score_delta: u32,
    },
    TilesFell {
        moves: Vec<FallMove>,
    },
    TilesSpawned {
        tiles: Vec<SpawnedTile>,
    },
    ScoreChanged {
        score: u32,
        combo: u32,
    },
    NoValidMoves,
    BoardReshuffled {
        rows: u8,
        cols: u8,
        cells: Vec<Cell>,
    },
}

impl GameEvent {
    /// camelCase event name used on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::TilesSwapped { .. } => "tilesSwapped",
            GameEvent::SwapRejected { .. } => "swapRejected",
            GameEvent::TilesMatched { .. } => "tilesMatched",
            GameEvent::BonusSpawned { .. } => "bonusSpawned",
            GameEvent::BombDetonated { .. } => "bombDetonated",
            GameEvent::TilesFell { .. } => "tilesFell",
            GameEvent::TilesSpawned { .. } => "tilesSpawned",
            GameEvent::ScoreChanged { .. } => "scoreChanged",
            GameEvent::NoValidMoves => "noValidMoves",
            GameEvent::BoardReshuffled { .. } => "boardReshuffled",
        }
    }
}
