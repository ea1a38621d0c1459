//! Core module - pure game logic with no I/O dependencies.
//!
//! This crate contains the grid, piece catalog, transactional placement,
//! row resolution, and the queue/hold state machine. The loop controller in
//! `blox-engine` drives these against a single session.

pub mod grid;
pub mod piece;
pub mod placement;
pub mod queue;
pub mod rng;
pub mod rows;
pub mod scoring;

// Re-export commonly used types
pub use grid::Grid;
pub use piece::{CatalogError, PieceCatalog, PieceInstance, PieceTemplate};
pub use placement::{ghost_of, project_drop, try_transform, DropProjection};
pub use queue::{Draw, PieceFeed};
pub use rng::SimpleRng;
pub use rows::{lock_instance, resolve_full_rows, LockReport};
pub use scoring::ScoreKeeper;
