//! Session module - the game loop controller.
//!
//! A `GameSession` owns the grid, the piece feed, and the live piece, and
//! advances through discrete host-driven steps: the host calls `tick` with
//! elapsed wall time and feeds commands in between. There is no suspension
//! construct anywhere; the fall "wait" is a deadline consulted inside `tick`,
//! re-validated on every call, so a command that removes the live piece
//! (hard drop, hold) interrupts the wait by construction.

use std::collections::VecDeque;

use anyhow::Result;

use blox_core::{
    ghost_of, lock_instance, project_drop, resolve_full_rows, try_transform, Grid, PieceCatalog,
    PieceFeed, PieceInstance,
};
use blox_types::{GameCommand, GameEvent, KindId, SessionPhase, Vec2};

use crate::config::SessionConfig;

/// Rejected `start` operations. Non-fatal: session state is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    AlreadyRunning,
}

impl StartError {
    pub fn code(self) -> &'static str {
        match self {
            StartError::AlreadyRunning => "already_running",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            StartError::AlreadyRunning => "cannot start a game that has not ended yet",
        }
    }
}

/// One authoritative game session. Exclusively owns its grid; a new start
/// resets everything.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    catalog: PieceCatalog,
    grid: Grid,
    feed: PieceFeed,
    current: Option<PieceInstance>,
    ghost: Option<PieceInstance>,
    phase: SessionPhase,
    fall_timer_ms: u32,
    /// Serial of the most recently spawned piece; stamps block identities.
    piece_serial: u32,
    events: VecDeque<GameEvent>,
}

impl GameSession {
    /// Validate the configuration and build an idle session.
    pub fn new(config: SessionConfig, catalog: PieceCatalog) -> Result<Self> {
        config.validate()?;

        let grid = Grid::new(config.field_width, config.field_height);
        let feed = PieceFeed::new(catalog.len(), config.queue_capacity, config.seed);
        let mut events = VecDeque::new();
        events.push_back(GameEvent::Initialized);

        Ok(Self {
            config,
            catalog,
            grid,
            feed,
            current: None,
            ghost: None,
            phase: SessionPhase::Idle,
            fall_timer_ms: 0,
            piece_serial: 0,
            events,
        })
    }

    /// Begin a fresh game. Starting while one is running is rejected and
    /// changes nothing; starting after a game over resets and goes again.
    pub fn start(&mut self) -> Result<(), StartError> {
        if self.phase == SessionPhase::Running {
            return Err(StartError::AlreadyRunning);
        }

        self.grid.reset();
        self.feed = PieceFeed::new(
            self.catalog.len(),
            self.config.queue_capacity,
            self.config.seed,
        );
        self.current = None;
        self.ghost = None;
        self.fall_timer_ms = 0;
        self.piece_serial = 0;
        self.phase = SessionPhase::Running;

        self.events.push_back(GameEvent::GameStarted);
        for kind in self.feed.prefill() {
            self.events.push_back(GameEvent::PieceQueued(kind));
        }

        // Run the first loop step immediately so a piece is in play before
        // the first tick arrives.
        self.ensure_current_piece();
        Ok(())
    }

    /// Advance the loop by `elapsed_ms` of wall time. One call performs at
    /// most one forced downward step.
    pub fn tick(&mut self, elapsed_ms: u32) {
        if self.phase != SessionPhase::Running {
            return;
        }
        if !self.ensure_current_piece() {
            return;
        }

        self.fall_timer_ms = self.fall_timer_ms.saturating_add(elapsed_ms);
        if self.fall_timer_ms >= self.config.fall_interval_ms {
            self.fall_timer_ms = 0;
            // A command drained earlier this step may have dropped the piece
            // already; the deadline only acts on a piece that still exists.
            if self.current.is_some() {
                self.soft_drop_step();
            }
        }
    }

    /// Apply one external command. Returns whether it had any effect.
    pub fn command(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::Start => self.start().is_ok(),
            GameCommand::MoveLeft => self.try_current_transform(Vec2::new(-1.0, 0.0), 0),
            GameCommand::MoveRight => self.try_current_transform(Vec2::new(1.0, 0.0), 0),
            GameCommand::RotateLeft => self.try_current_transform(Vec2::ZERO, -90),
            GameCommand::RotateRight => self.try_current_transform(Vec2::ZERO, 90),
            GameCommand::SoftDrop => self.soft_drop_step(),
            GameCommand::HardDrop => self.hard_drop(),
            GameCommand::Hold => self.hold(),
        }
    }

    /// One forced downward step. A rejected step means the piece came to
    /// rest: it locks into the grid and full rows resolve. Returns whether
    /// the piece moved (false also when there is no piece).
    pub fn soft_drop_step(&mut self) -> bool {
        if self.current.is_none() {
            return false;
        }
        if self.try_current_transform(Vec2::new(0.0, -1.0), 0) {
            true
        } else {
            self.lock_current();
            false
        }
    }

    /// Teleport the live piece to its drop projection in a single transform,
    /// then lock and resolve immediately.
    pub fn hard_drop(&mut self) -> bool {
        let Some(live) = &self.current else {
            return false;
        };
        let template = self.catalog.template(live.kind);
        let projection = project_drop(&self.grid, template, live);

        // Zero steps degenerates to an in-place transform that trivially
        // succeeds; the piece locks where it stands.
        let delta = Vec2::new(0.0, -(projection.steps as f32));
        self.try_current_transform(delta, 0);
        self.lock_current();
        true
    }

    /// Set the live piece aside. With nothing held yet the piece is simply
    /// stored and the next loop step spawns from the queue; with a piece
    /// already held the two swap, the held one returning through the front
    /// of the queue. Silently ignored when the hold ability is spent or no
    /// piece is in play.
    pub fn hold(&mut self) -> bool {
        let Some(live) = &self.current else {
            return false;
        };
        let kind = live.kind;
        if !self.feed.hold(kind) {
            return false;
        }

        self.events.push_back(GameEvent::PieceHeld(kind));
        // Dropping the live piece interrupts the fall wait; the next tick
        // spawns the replacement.
        self.current = None;
        self.ghost = None;
        true
    }

    /// Pop the oldest pending event, if any.
    pub fn poll_event(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    /// Drain all pending events in emission order.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current(&self) -> Option<&PieceInstance> {
        self.current.as_ref()
    }

    /// Drop preview for the live piece; None while no piece is falling or
    /// the piece already rests on the stack.
    pub fn ghost(&self) -> Option<&PieceInstance> {
        self.ghost.as_ref()
    }

    pub fn held(&self) -> Option<KindId> {
        self.feed.held()
    }

    pub fn hold_available(&self) -> bool {
        self.feed.hold_available()
    }

    /// Pending queue contents, front first.
    pub fn queue_preview(&self) -> Vec<KindId> {
        self.feed.pending().collect()
    }

    /// The common spawn reference point; templates add their own offset.
    fn spawn_reference(&self) -> Vec2 {
        Vec2::new(
            self.config.field_width as f32 / 2.0 - 0.5,
            self.config.field_height as f32 - 0.5,
        )
    }

    /// Loop step: make sure a piece is in play, spawning one if needed. A
    /// failed spawn is the sole game-over trigger.
    fn ensure_current_piece(&mut self) -> bool {
        if self.current.is_some() {
            return true;
        }
        if self.spawn_piece() {
            return true;
        }
        self.phase = SessionPhase::GameOver;
        self.events.push_back(GameEvent::GameOver);
        false
    }

    /// Draw the next kind and place it at the spawn point. The placement
    /// feasibility check is a zero-delta transform through the same choke
    /// point every other movement uses.
    fn spawn_piece(&mut self) -> bool {
        let draw = self.feed.dequeue();
        if let Some(queued) = draw.queued {
            self.events.push_back(GameEvent::PieceQueued(queued));
        }

        let template = self.catalog.template(draw.kind);
        let spawn = self.spawn_reference() + template.spawn_offset;
        let mut instance = PieceInstance::new(draw.kind, spawn);
        if !try_transform(&self.grid, template, &mut instance, Vec2::ZERO, 0) {
            return false;
        }

        self.piece_serial = self.piece_serial.wrapping_add(1);
        self.current = Some(instance);
        self.fall_timer_ms = 0;
        self.events.push_back(GameEvent::PieceSpawned(draw.kind));
        self.refresh_ghost();
        true
    }

    /// Single entry point for moving or rotating the live piece; refreshes
    /// the ghost on success. No-op without a live piece.
    fn try_current_transform(&mut self, delta: Vec2, spin_degrees: i32) -> bool {
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        let template = self.catalog.template(current.kind);
        let moved = try_transform(&self.grid, template, current, delta, spin_degrees);
        if moved {
            self.refresh_ghost();
        }
        moved
    }

    fn refresh_ghost(&mut self) {
        self.ghost = match &self.current {
            Some(live) => {
                let template = self.catalog.template(live.kind);
                ghost_of(&self.grid, template, live)
            }
            None => None,
        };
    }

    /// Freeze the live piece into the grid, resolve the changed row band,
    /// and report the clear count. Re-arms the hold ability.
    fn lock_current(&mut self) {
        let Some(instance) = self.current.take() else {
            return;
        };
        self.ghost = None;

        let template = self.catalog.template(instance.kind);
        let report = lock_instance(&mut self.grid, template, &instance, self.piece_serial);
        let removed = resolve_full_rows(&mut self.grid, report.min_y, report.max_y);

        self.feed.rearm_hold();
        self.events.push_back(GameEvent::RowsRemoved(removed));
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blox_types::{BlockId, KindId};

    fn session() -> GameSession {
        GameSession::new(SessionConfig::default(), PieceCatalog::standard()).unwrap()
    }

    fn drain(session: &mut GameSession) -> Vec<GameEvent> {
        session.take_events()
    }

    #[test]
    fn test_new_session_is_idle_and_initialized() {
        let mut s = session();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(s.poll_event(), Some(GameEvent::Initialized));
        assert_eq!(s.poll_event(), None);
        assert!(s.current().is_none());
    }

    #[test]
    fn test_start_spawns_and_reports() {
        let mut s = session();
        drain(&mut s);

        s.start().unwrap();
        assert_eq!(s.phase(), SessionPhase::Running);
        assert!(s.current().is_some());

        let events = drain(&mut s);
        assert_eq!(events[0], GameEvent::GameStarted);
        // Two prefill draws, one draw during the spawn dequeue, one spawn.
        let queued = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PieceQueued(_)))
            .count();
        assert_eq!(queued, 3);
        assert!(matches!(events.last(), Some(GameEvent::PieceSpawned(_))));
        assert_eq!(s.queue_preview().len(), 2);
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let mut s = session();
        s.start().unwrap();
        let before = s.current().copied();

        let err = s.start().unwrap_err();
        assert_eq!(err, StartError::AlreadyRunning);
        assert_eq!(err.code(), "already_running");
        assert_eq!(s.current().copied(), before);
        assert_eq!(s.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_commands_without_piece_are_noops() {
        let mut s = session();
        drain(&mut s);

        assert!(!s.command(GameCommand::MoveLeft));
        assert!(!s.command(GameCommand::RotateRight));
        assert!(!s.command(GameCommand::SoftDrop));
        assert!(!s.command(GameCommand::HardDrop));
        assert!(!s.command(GameCommand::Hold));
        assert!(drain(&mut s).is_empty());
    }

    #[test]
    fn test_gravity_steps_on_deadline() {
        let mut s = session();
        s.start().unwrap();
        let y0 = s.current().unwrap().position.y;

        s.tick(s.config().fall_interval_ms - 1);
        assert_eq!(s.current().unwrap().position.y, y0);

        s.tick(1);
        assert_eq!(s.current().unwrap().position.y, y0 - 1.0);
    }

    #[test]
    fn test_hold_then_swap_round_trip() {
        let mut s = session();
        s.start().unwrap();
        drain(&mut s);

        let first = s.current().unwrap().kind;
        assert!(s.command(GameCommand::Hold));
        assert_eq!(s.held(), Some(first));
        assert!(s.current().is_none());
        assert!(!s.hold_available());
        assert_eq!(drain(&mut s), vec![GameEvent::PieceHeld(first)]);

        // Second hold in the same piece cycle is silently ignored.
        s.tick(0);
        assert!(s.current().is_some());
        assert!(!s.command(GameCommand::Hold));

        // Lock re-arms the hold; the next hold swaps, and the previously
        // held kind comes back into play ahead of any fresh draw.
        s.command(GameCommand::HardDrop);
        s.tick(0);
        assert!(s.hold_available());
        let third = s.current().unwrap().kind;
        assert!(s.command(GameCommand::Hold));
        assert_eq!(s.held(), Some(third));
        s.tick(0);
        assert_eq!(s.current().unwrap().kind, first);
    }

    #[test]
    fn test_topped_out_spawn_ends_game() {
        let mut s = session();
        s.start().unwrap();
        s.command(GameCommand::HardDrop);
        drain(&mut s);

        // Wall off the spawn rows so the next spawn cannot place.
        let height = s.config().field_height;
        let width = s.config().field_width;
        for y in (height - 2)..height {
            for x in 0..width {
                s.grid_mut().set(
                    x,
                    y,
                    BlockId {
                        piece: 999,
                        cell: 0,
                        kind: KindId(0),
                    },
                );
            }
        }

        s.tick(0);
        assert_eq!(s.phase(), SessionPhase::GameOver);
        let events = drain(&mut s);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver))
                .count(),
            1
        );
        assert!(!events.iter().any(|e| matches!(e, GameEvent::PieceSpawned(_))));

        // Further ticks change nothing.
        s.tick(10_000);
        assert!(drain(&mut s).is_empty());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut s = session();
        s.start().unwrap();
        s.grid_mut().set(
            4,
            18,
            BlockId {
                piece: 1,
                cell: 0,
                kind: KindId(0),
            },
        );
        // Force game over by stacking.
        for _ in 0..200 {
            s.tick(0);
            if s.phase() == SessionPhase::GameOver {
                break;
            }
            s.command(GameCommand::HardDrop);
        }
        assert_eq!(s.phase(), SessionPhase::GameOver);

        s.start().unwrap();
        assert_eq!(s.phase(), SessionPhase::Running);
        assert!(s.current().is_some());
        assert!(s.held().is_none());
        // Only the freshly locked cells of the new game remain.
        assert_eq!(s.grid().occupied_cells(), 0);
    }

    #[test]
    fn test_ghost_tracks_live_piece() {
        let mut s = session();
        s.start().unwrap();

        let ghost = s.ghost().copied().expect("fresh piece has headroom");
        assert_eq!(ghost.rotation, s.current().unwrap().rotation);
        assert!(ghost.position.y < s.current().unwrap().position.y);

        s.command(GameCommand::MoveLeft);
        let moved_ghost = s.ghost().copied().unwrap();
        assert_eq!(moved_ghost.position.x, s.current().unwrap().position.x);
    }

    #[test]
    fn test_rows_removed_emitted_on_every_lock() {
        let mut s = session();
        s.start().unwrap();
        drain(&mut s);

        s.command(GameCommand::HardDrop);
        let events = drain(&mut s);
        assert!(events.contains(&GameEvent::RowsRemoved(0)));
    }
}
