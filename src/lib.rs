//! Blox (workspace facade crate).
//!
//! This package keeps the public `blox::{core,engine,types}` API in one place
//! while the implementation lives in dedicated crates under `crates/`.

pub use blox_core as core;
pub use blox_engine as engine;
pub use blox_types as types;
