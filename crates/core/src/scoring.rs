//! Scoring module - an event-driven score tally.
//!
//! The loop controller never computes points; it only reports how many rows a
//! lock removed. This keeper is a collaborator that folds those reports into
//! a score: clearing n rows at once awards `per_row * n * (n + 1) / 2`, so
//! multi-row clears pay progressively better, and every spawned piece is
//! worth a single point for surviving.

use blox_types::GameEvent;

pub const DEFAULT_POINTS_PER_ROW: u32 = 100;

#[derive(Debug, Clone)]
pub struct ScoreKeeper {
    points_per_row: u32,
    score: u32,
}

impl ScoreKeeper {
    pub fn new(points_per_row: u32) -> Self {
        Self {
            points_per_row,
            score: 0,
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }

    pub fn total(&self) -> u32 {
        self.score
    }

    /// Triangular payout for a batch of `rows` cleared in one lock.
    pub fn rows_cleared(&mut self, rows: u32) {
        if rows < 1 {
            return;
        }
        self.score = self
            .score
            .saturating_add(self.points_per_row * rows * (rows + 1) / 2);
    }

    pub fn piece_spawned(&mut self) {
        self.score = self.score.saturating_add(1);
    }

    /// Fold one engine event into the tally. Events the keeper does not score
    /// are ignored.
    pub fn observe(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RowsRemoved(rows) => self.rows_cleared(*rows),
            GameEvent::PieceSpawned(_) => self.piece_spawned(),
            GameEvent::GameStarted => self.reset(),
            _ => {}
        }
    }
}

impl Default for ScoreKeeper {
    fn default() -> Self {
        Self::new(DEFAULT_POINTS_PER_ROW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blox_types::KindId;

    #[test]
    fn test_triangular_row_awards() {
        let mut keeper = ScoreKeeper::new(10);
        keeper.rows_cleared(1);
        assert_eq!(keeper.total(), 10);

        keeper.reset();
        keeper.rows_cleared(2);
        assert_eq!(keeper.total(), 30);

        keeper.reset();
        keeper.rows_cleared(3);
        assert_eq!(keeper.total(), 60);

        keeper.reset();
        keeper.rows_cleared(4);
        assert_eq!(keeper.total(), 100);
    }

    #[test]
    fn test_zero_rows_award_nothing() {
        let mut keeper = ScoreKeeper::new(10);
        keeper.rows_cleared(0);
        assert_eq!(keeper.total(), 0);
    }

    #[test]
    fn test_observe_scores_spawns_and_clears() {
        let mut keeper = ScoreKeeper::new(10);
        keeper.observe(&GameEvent::PieceSpawned(KindId(0)));
        keeper.observe(&GameEvent::RowsRemoved(2));
        keeper.observe(&GameEvent::RowsRemoved(0));
        keeper.observe(&GameEvent::PieceHeld(KindId(1)));
        assert_eq!(keeper.total(), 31);

        keeper.observe(&GameEvent::GameStarted);
        assert_eq!(keeper.total(), 0);
    }
}
