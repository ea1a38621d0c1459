//! Row resolution - locking pieces into the grid and clearing full rows.
//!
//! Locking records the band of rows the piece touched so the full-row scan
//! only ever looks at rows that could have changed, instead of the whole
//! field.

use blox_types::BlockId;

use crate::grid::Grid;
use crate::piece::{PieceInstance, PieceTemplate};

/// The changed-row range produced by one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    pub min_y: i32,
    pub max_y: i32,
}

/// Freeze the instance's cells permanently into the grid. Each cell receives
/// a fresh identity derived from the piece serial. Returns the touched row
/// band for the follow-up full-row scan.
///
/// The placement engine guarantees a live piece only ever occupies free
/// in-bounds cells, so every write is expected to land.
pub fn lock_instance(
    grid: &mut Grid,
    template: &PieceTemplate,
    instance: &PieceInstance,
    piece_serial: u32,
) -> LockReport {
    let mut min_y = i32::MAX;
    let mut max_y = i32::MIN;

    for (cell, &(x, y)) in instance.cell_positions(template).iter().enumerate() {
        let stored = grid.set(
            x,
            y,
            BlockId {
                piece: piece_serial,
                cell: cell as u8,
                kind: instance.kind,
            },
        );
        debug_assert!(stored, "locked cell ({x}, {y}) out of bounds");
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    LockReport { min_y, max_y }
}

/// Scan the changed range from its top down to its bottom, removing every
/// full row. Returns the number of rows removed. Scanning downward means a
/// row shift caused by one removal never invalidates the remaining indices:
/// rows still to be visited sit below the deletion point and are untouched by
/// the shift.
pub fn resolve_full_rows(grid: &mut Grid, min_y: i32, max_y: i32) -> u32 {
    let mut removed = 0;
    let mut y = max_y;
    while y >= min_y {
        if grid.is_row_full(y) {
            grid.remove_row(y);
            removed += 1;
        }
        y -= 1;
    }
    removed
}
