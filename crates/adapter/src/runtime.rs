//! Session runtime.
//!
//! Drives one [`Controller`] from protocol lines. In the default mode each
//! `ack` runs the next phase, so the client paces the resolution with its
//! animations; with `auto_ack` a swap resolves to Idle immediately.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::{Controller, EngineConfig};
use crate::protocol::{
    create_error, create_event, create_hint, create_snapshot, extract_seq_best_effort,
    parse_message, pos_from_wire, ErrorCode, ParsedMessage,
};

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub engine: EngineConfig,
    pub seed: u32,
    /// Resolve every swap without waiting for acknowledgments
    pub auto_ack: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            seed: 1,
            auto_ack: false,
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    ///
    /// - `MATCH3_CONFIG`: path to a JSON [`EngineConfig`] (optional)
    /// - `MATCH3_SEED`: RNG seed (default 1)
    /// - `MATCH3_AUTO_ACK`: "1" or "true" to resolve without acknowledgments
    pub fn from_env() -> Result<Self> {
        use std::env;

        let engine = match env::var("MATCH3_CONFIG")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            Some(path) => load_engine_config(Path::new(&path))?,
            None => EngineConfig::default(),
        };

        let seed = env::var("MATCH3_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1);

        let auto_ack = env::var("MATCH3_AUTO_ACK")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            engine,
            seed,
            auto_ack,
        })
    }
}

/// Read and validate an engine configuration file
pub fn load_engine_config(path: &Path) -> Result<EngineConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading engine config {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing engine config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid engine config {}", path.display()))?;
    Ok(config)
}

/// One game driven by protocol lines
#[derive(Debug, Clone)]
pub struct Session {
    controller: Controller,
    auto_ack: bool,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let controller =
            Controller::new(config.engine, config.seed).context("creating board controller")?;
        info!(seed = config.seed, auto_ack = config.auto_ack, "session started");
        Ok(Self::from_controller(controller, config.auto_ack))
    }

    pub fn from_controller(controller: Controller, auto_ack: bool) -> Self {
        Self {
            controller,
            auto_ack,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Snapshot line, e.g. to greet a client before any request
    pub fn snapshot_line(&self, seq: u64) -> Vec<String> {
        let mut out = Vec::new();
        push_json(&mut out, &create_snapshot(seq, &self.controller.snapshot()));
        out
    }

    /// Handle one inbound line; returns the outbound lines in order
    pub fn handle_line(&mut self, line: &str) -> Vec<String> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::new();
        let msg = match parse_message(line) {
            Ok(msg) => msg,
            Err(e) => {
                let seq = extract_seq_best_effort(line).unwrap_or(0);
                debug!(seq, error = %e, "unparseable line");
                push_json(
                    &mut out,
                    &create_error(seq, ErrorCode::InvalidCommand, &e.to_string()),
                );
                return out;
            }
        };

        match msg {
            ParsedMessage::Swap(swap) => {
                let result = self
                    .controller
                    .submit_swap(pos_from_wire(swap.from), pos_from_wire(swap.to));
                if result.is_ok() && self.auto_ack {
                    self.controller.resolve();
                }
                self.flush_events(swap.seq, &mut out);
                if let Err(err) = result {
                    push_json(
                        &mut out,
                        &create_error(swap.seq, err.into(), &err.to_string()),
                    );
                }
            }
            ParsedMessage::Ack(ack) => {
                if self.controller.advance() {
                    self.flush_events(ack.seq, &mut out);
                }
            }
            ParsedMessage::Hint(req) => {
                push_json(&mut out, &create_hint(req.seq, self.controller.hint()));
            }
            ParsedMessage::Snapshot(req) => {
                push_json(
                    &mut out,
                    &create_snapshot(req.seq, &self.controller.snapshot()),
                );
            }
            ParsedMessage::Unknown(m) => {
                let message = format!("unknown message type {:?}", m.msg_type);
                push_json(
                    &mut out,
                    &create_error(m.seq, ErrorCode::InvalidCommand, &message),
                );
            }
        }
        out
    }

    fn flush_events(&mut self, seq: u64, out: &mut Vec<String>) {
        for event in self.controller.drain_events() {
            push_json(out, &create_event(seq, &event));
        }
    }
}

fn push_json<T: Serialize>(out: &mut Vec<String>, msg: &T) {
    match serde_json::to_string(msg) {
        Ok(line) => out.push(line),
        Err(e) => warn!(error = %e, "failed to encode outbound message"),
    }
}
