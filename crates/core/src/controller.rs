//! Board controller - the resolution pipeline for one player move
//!
//! The controller owns the grid, the score tracker and the RNG. A swap is
//! resolved one visual phase at a time:
//!
//! ```text
//! submit_swap ──> TilesSwapped                         (Resolving)
//! advance     ──> SwapRejected(NoMatch) + revert       (-> Idle)
//!             or  TilesMatched / BombDetonated /
//!                 BonusSpawned / ScoreChanged          (Chaining)
//! advance     ──> TilesFell
//! advance     ──> TilesSpawned, then rescan:
//!                   matches  -> next advance destroys them
//!                   none     -> Idle, or NoValidMoves  (Stalemate)
//! advance     ──> BoardReshuffled                      (-> Idle)
//! ```
//!
//! Each `advance` call acknowledges the events of the previous one, so a
//! presentation layer calls it when its animation finishes. Headless callers
//! use [`Controller::resolve`].

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::bonus::{determine_bonuses, BonusRules, SwapPair};
use crate::cascade::{collapse, refill};
use crate::config::EngineConfig;
use crate::detonate::{detonate, Blast, BlastReport, ColorTarget, Trigger};
use crate::error::{ConfigError, SwapError};
use crate::generate::generate_board;
use crate::grid::Grid;
use crate::matcher::{find_matches, MatchGroup};
use crate::moves::{find_valid_move, has_valid_moves};
use crate::rng::SimpleRng;
use crate::scoring::ScoreTracker;
use crate::snapshot::BoardSnapshot;
use crate::types::{GameEvent, Phase, Pos, RejectReason, Tile};

/// Work waiting for the next `advance`
#[derive(Debug, Clone)]
enum Step {
    Validate { origin: Pos, destination: Pos },
    Destroy {
        groups: Vec<MatchGroup>,
        swap: Option<SwapPair>,
    },
    Collapse,
    Refill,
    Reshuffle,
}

/// The rules engine for one game
#[derive(Debug, Clone)]
pub struct Controller {
    config: EngineConfig,
    grid: Grid,
    scores: ScoreTracker,
    rng: SimpleRng,
    phase: Phase,
    pending: Option<Step>,
    events: Vec<GameEvent>,
}

impl Controller {
    /// New game on a freshly generated board.
    ///
    /// If generation could not find a board with a move, the game starts in
    /// Stalemate with `NoValidMoves` queued and a reshuffle pending.
    pub fn new(config: EngineConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = SimpleRng::new(seed);
        let grid = generate_board(
            config.rows,
            config.cols,
            config.min_match,
            config.active_colors(0),
            config.generation_attempts,
            &mut rng,
        );
        let mut controller = Self::assemble(config, grid, rng);
        controller.settle();
        Ok(controller)
    }

    /// New game on a given board (the board is used as-is)
    pub fn from_grid(config: EngineConfig, grid: Grid, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        if grid.rows() != config.rows || grid.cols() != config.cols {
            return Err(ConfigError::GridMismatch {
                rows: config.rows,
                cols: config.cols,
                found_rows: grid.rows(),
                found_cols: grid.cols(),
            });
        }
        Ok(Self::assemble(config, grid, SimpleRng::new(seed)))
    }

    fn assemble(config: EngineConfig, grid: Grid, rng: SimpleRng) -> Self {
        let scores = ScoreTracker::new(config.scoring);
        Self {
            config,
            grid,
            scores,
            rng,
            phase: Phase::Idle,
            pending: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a swap is resolving; swaps are rejected until Idle
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn score(&self) -> u32 {
        self.scores.score()
    }

    pub fn combo(&self) -> u32 {
        self.scores.combo()
    }

    /// Colors currently drawn by refills
    pub fn active_colors(&self) -> u8 {
        self.config.active_colors(self.scores.score())
    }

    pub fn has_valid_moves(&self) -> bool {
        has_valid_moves(&self.grid, self.config.min_match)
    }

    /// Best available swap, if any
    pub fn hint(&self) -> Option<(Pos, Pos)> {
        find_valid_move(&self.grid, self.config.min_match)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(
            &self.grid,
            self.scores.score(),
            self.scores.combo(),
            self.phase,
            self.active_colors(),
        )
    }

    /// Events queued since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Request a swap of the tile at `origin` into `destination`.
    ///
    /// On success the tiles are exchanged and `TilesSwapped` is queued; the
    /// next [`advance`](Self::advance) validates the move. Rejections queue
    /// `SwapRejected` and change nothing else.
    #[instrument(level = "debug", skip(self), fields(phase = self.phase.as_str()))]
    pub fn submit_swap(&mut self, origin: Pos, destination: Pos) -> Result<(), SwapError> {
        let checked = if self.is_busy() {
            Err(SwapError::Busy)
        } else {
            self.check_swap(origin, destination)
        };
        if let Err(err) = checked {
            let reason = match err {
                SwapError::Busy => RejectReason::Busy,
                _ => RejectReason::Invalid,
            };
            debug!(%origin, %destination, code = err.code(), "swap rejected: {err}");
            self.events.push(GameEvent::SwapRejected {
                a: origin,
                b: destination,
                reason,
            });
            return Err(err);
        }

        self.grid.swap(origin, destination);
        self.events.push(GameEvent::TilesSwapped {
            a: origin,
            b: destination,
        });
        self.phase = Phase::Resolving;
        self.pending = Some(Step::Validate {
            origin,
            destination,
        });
        debug!(%origin, %destination, "swap accepted");
        Ok(())
    }

    fn check_swap(&self, origin: Pos, destination: Pos) -> Result<(), SwapError> {
        for pos in [origin, destination] {
            if !self.grid.contains(pos) {
                return Err(SwapError::OutOfBounds(pos));
            }
        }
        if !origin.is_adjacent(destination) {
            return Err(SwapError::NotAdjacent(origin, destination));
        }
        for pos in [origin, destination] {
            if !self.grid.is_occupied(pos) {
                return Err(SwapError::EmptyCell(pos));
            }
        }
        Ok(())
    }

    /// Run the next phase, acknowledging the previous one.
    ///
    /// Returns false when there was nothing to do (the controller is Idle).
    pub fn advance(&mut self) -> bool {
        let Some(step) = self.pending.take() else {
            return false;
        };
        match step {
            Step::Validate {
                origin,
                destination,
            } => self.validate(origin, destination),
            Step::Destroy { groups, swap } => self.destroy(groups, swap),
            Step::Collapse => self.collapse(),
            Step::Refill => self.refill(),
            Step::Reshuffle => self.reshuffle(),
        }
        true
    }

    /// Advance until Idle; returns the number of phases run
    pub fn resolve(&mut self) -> usize {
        let mut phases = 0;
        while self.advance() {
            phases += 1;
        }
        phases
    }

    fn validate(&mut self, origin: Pos, destination: Pos) {
        if let Some(trigger) = color_bomb_trigger(&self.grid, origin, destination) {
            self.scores.reset_combo();
            self.phase = Phase::Chaining;
            self.detonate_swapped_bomb(trigger);
            return;
        }

        let groups = find_matches(&self.grid, self.config.min_match);
        if groups.is_empty() {
            self.grid.swap(origin, destination);
            self.events.push(GameEvent::SwapRejected {
                a: origin,
                b: destination,
                reason: RejectReason::NoMatch,
            });
            self.phase = Phase::Idle;
            debug!(%origin, %destination, "no match; swap reverted");
            return;
        }

        self.scores.reset_combo();
        self.phase = Phase::Chaining;
        self.destroy(groups, Some((origin, destination)));
    }

    fn detonate_swapped_bomb(&mut self, trigger: Trigger) {
        let combo = self.scores.advance_combo();
        let mut claimed = HashSet::new();
        let report = detonate(
            &self.grid,
            [trigger],
            &mut claimed,
            &HashSet::new(),
            &self.scores,
            &mut self.rng,
        );
        self.emit_detonations(&report);
        self.clear(&claimed);
        let score = self.scores.award(report.total_score());
        self.events.push(GameEvent::ScoreChanged { score, combo });
        debug!(pos = %trigger.pos, destroyed = claimed.len(), score, "color bomb swap");
        self.pending = Some(Step::Collapse);
    }

    fn destroy(&mut self, groups: Vec<MatchGroup>, swap: Option<SwapPair>) {
        let combo = self.scores.advance_combo();
        let rules = BonusRules {
            line: self.config.line_bomb_threshold,
            color: self.config.color_bomb_threshold,
        };
        let spawns = determine_bonuses(&self.grid, &groups, swap, rules);
        let protected: HashSet<Pos> = spawns.iter().map(|s| s.pos).collect();

        // Overlapping groups share cells; count each once.
        let mut seen = HashSet::new();
        let mut cleared = Vec::new();
        let mut triggers = Vec::new();
        for pos in groups.iter().flat_map(|g| g.positions.iter().copied()) {
            if !seen.insert(pos) {
                continue;
            }
            match self.grid.tile(pos) {
                Some(Tile::LineBomb { orientation, .. }) => triggers.push(Trigger {
                    pos,
                    blast: Blast::Line(orientation),
                }),
                Some(_) if protected.contains(&pos) => {}
                Some(_) => cleared.push(pos),
                None => debug_assert!(false, "match group references empty cell {pos}"),
            }
        }

        let match_points = self.scores.tile_points(cleared.len() + protected.len());
        self.events.push(GameEvent::TilesMatched {
            positions: cleared.clone(),
            score_delta: match_points,
        });

        let mut claimed: HashSet<Pos> = cleared.into_iter().collect();
        let report = detonate(
            &self.grid,
            triggers,
            &mut claimed,
            &protected,
            &self.scores,
            &mut self.rng,
        );
        self.emit_detonations(&report);
        self.clear(&claimed);

        for spawn in &spawns {
            self.grid.set(spawn.pos, Some(spawn.tile));
            self.events.push(GameEvent::BonusSpawned {
                pos: spawn.pos,
                tile: spawn.tile,
            });
        }

        let gained = match_points.saturating_add(report.total_score());
        let score = self.scores.award(gained);
        self.events.push(GameEvent::ScoreChanged { score, combo });
        debug!(
            groups = groups.len(),
            combo,
            multiplier = self.scores.multiplier(),
            destroyed = claimed.len(),
            bonuses = spawns.len(),
            detonations = report.detonations.len(),
            score,
            "destroy step"
        );
        self.pending = Some(Step::Collapse);
    }

    fn emit_detonations(&mut self, report: &BlastReport) {
        for d in &report.detonations {
            self.events.push(GameEvent::BombDetonated {
                pos: d.pos,
                kind: d.kind,
                destroyed: d.destroyed.clone(),
                score_delta: d.score,
            });
        }
    }

    fn clear(&mut self, cells: &HashSet<Pos>) {
        for &pos in cells {
            self.grid.take(pos);
        }
    }

    fn collapse(&mut self) {
        let moves = collapse(&mut self.grid);
        debug!(moves = moves.len(), "tiles fell");
        self.events.push(GameEvent::TilesFell { moves });
        self.pending = Some(Step::Refill);
    }

    fn refill(&mut self) {
        let active = self.active_colors();
        let tiles = refill(&mut self.grid, &mut self.rng, active);
        debug!(spawned = tiles.len(), active, "refilled");
        self.events.push(GameEvent::TilesSpawned { tiles });

        let groups = find_matches(&self.grid, self.config.min_match);
        if groups.is_empty() {
            self.settle();
        } else {
            debug!(groups = groups.len(), "cascade produced matches");
            self.pending = Some(Step::Destroy { groups, swap: None });
        }
    }

    fn settle(&mut self) {
        if self.has_valid_moves() {
            self.phase = Phase::Idle;
            debug!(score = self.score(), combo = self.combo(), "board settled");
        } else {
            self.events.push(GameEvent::NoValidMoves);
            self.phase = Phase::Stalemate;
            self.pending = Some(Step::Reshuffle);
            debug!("stalemate; reshuffle pending");
        }
    }

    fn reshuffle(&mut self) {
        self.grid = generate_board(
            self.config.rows,
            self.config.cols,
            self.config.min_match,
            self.active_colors(),
            self.config.generation_attempts,
            &mut self.rng,
        );
        self.events.push(GameEvent::BoardReshuffled {
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            cells: self.grid.cells().to_vec(),
        });
        debug!("board reshuffled");
        self.settle();
    }
}

/// Detonation for a swap involving a Color Bomb, read after the tiles moved.
///
/// Two Color Bombs clear everything; otherwise the bomb clears the color of
/// the tile it was swapped with.
fn color_bomb_trigger(grid: &Grid, origin: Pos, destination: Pos) -> Option<Trigger> {
    let at_origin = grid.tile(origin)?;
    let at_destination = grid.tile(destination)?;
    let (pos, partner) = match (at_destination, at_origin) {
        (Tile::ColorBomb, partner) => (destination, partner),
        (partner, Tile::ColorBomb) => (origin, partner),
        _ => return None,
    };
    let target = match partner {
        Tile::ColorBomb => ColorTarget::Everything,
        other => match other.color() {
            Some(color) => ColorTarget::Color(color),
            None => ColorTarget::Everything,
        },
    };
    Some(Trigger {
        pos,
        blast: Blast::Color(target),
    })
}
