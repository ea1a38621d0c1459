//! Engine module - the game loop controller built on `blox-core`.
//!
//! Hosts construct a `GameSession` from a validated `SessionConfig` and a
//! piece catalog, then drive it with `tick` and commands while draining the
//! event queue.

pub mod config;
pub mod session;

pub use config::SessionConfig;
pub use session::{GameSession, StartError};
