//! Match-3 rules engine (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `match3::{core,adapter,types}`.

pub use match3_adapter as adapter;
pub use match3_core as core;
pub use match3_types as types;
