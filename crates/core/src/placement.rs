//! Placement module - transactional movement and rotation.
//!
//! Every positional or rotational change to a live piece funnels through
//! `try_transform`: apply the delta, test the resulting cells against the
//! grid, and either commit or revert both components exactly. Nothing outside
//! this function ever observes a partially applied transform.

use blox_types::Vec2;

use crate::grid::Grid;
use crate::piece::{PieceInstance, PieceTemplate};

/// Apply `delta` and `spin_degrees` to the instance, then verify that every
/// resulting cell is free on the grid. On any collision or out-of-bounds cell
/// the transform is fully reverted (inverse delta, inverse spin) and the call
/// returns false; otherwise it is committed and the call returns true.
pub fn try_transform(
    grid: &Grid,
    template: &PieceTemplate,
    instance: &mut PieceInstance,
    delta: Vec2,
    spin_degrees: i32,
) -> bool {
    instance.position = instance.position + delta;
    instance.rotation = instance.rotation.turned(spin_degrees);

    let fits = instance
        .cell_positions(template)
        .iter()
        .all(|&(x, y)| grid.is_free(x, y));

    if !fits {
        instance.position = instance.position - delta;
        instance.rotation = instance.rotation.turned(-spin_degrees);
    }

    fits
}

/// Result of projecting a piece straight down until it rests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropProjection {
    /// Number of single-cell downward steps that succeeded.
    pub steps: u32,
    /// The instance at its resting location (equal to the input when the
    /// piece is already grounded).
    pub resting: PieceInstance,
}

/// Step a copy of `live` down one cell at a time until the move is rejected.
pub fn project_drop(grid: &Grid, template: &PieceTemplate, live: &PieceInstance) -> DropProjection {
    let mut shadow = *live;
    let mut steps = 0u32;
    while try_transform(grid, template, &mut shadow, Vec2::new(0.0, -1.0), 0) {
        steps += 1;
    }
    DropProjection {
        steps,
        resting: shadow,
    }
}

/// The drop preview for `live`, mirroring its position and rotation at the
/// moment of projection. None when the piece is already resting: a ghost that
/// overlaps the live piece is not shown.
pub fn ghost_of(
    grid: &Grid,
    template: &PieceTemplate,
    live: &PieceInstance,
) -> Option<PieceInstance> {
    let projection = project_drop(grid, template, live);
    (projection.steps > 0).then_some(projection.resting)
}
