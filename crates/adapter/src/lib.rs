//! Adapter module - drive the rules engine with line-delimited JSON
//!
//! A presentation layer (renderer, bot, test harness) talks to the engine
//! through one JSON object per line. The engine never blocks on animation:
//! it sends the events of one phase and waits for an `ack` before running
//! the next.
//!
//! # Message Types
//!
//! ## Client → Engine
//!
//! - **swap**: move the tile at `from` into `to`
//! - **ack**: the last batch of events has been animated
//! - **hint**: ask for the best swap
//! - **snapshot**: ask for the full board
//!
//! ## Engine → Client
//!
//! - **event**: one engine event (`tilesSwapped`, `tilesMatched`, ...)
//! - **hint**: reply with a swap or `null`
//! - **snapshot**: board codes, hash, score, combo, phase
//! - **error**: error response with code and message
//!
//! # Environment Variables
//!
//! - `MATCH3_CONFIG`: path to a JSON engine configuration
//! - `MATCH3_SEED`: RNG seed (default 1)
//! - `MATCH3_AUTO_ACK`: set to "1" or "true" to resolve swaps without acks
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Engine: {"type":"swap","seq":1,"from":[3,6],"to":[3,5]}
//! Engine -> Client: {"type":"event","seq":1,"event":{"kind":"tilesSwapped","a":[3,6],"b":[3,5]}}
//! Client -> Engine: {"type":"ack","seq":2}
//! Engine -> Client: {"type":"event","seq":2,"event":{"kind":"tilesMatched","positions":[[3,2],[3,3],[3,4]],"scoreDelta":40}}
//! Engine -> Client: {"type":"event","seq":2,"event":{"kind":"bonusSpawned","pos":[3,5],"tile":{"kind":"lineBomb","orientation":"row","color":"red"}}}
//! Engine -> Client: {"type":"event","seq":2,"event":{"kind":"scoreChanged","score":40,"combo":1}}
//! ```

pub mod protocol;
pub mod runtime;

pub use match3_core as core;
pub use match3_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{load_engine_config, Session, SessionConfig};
