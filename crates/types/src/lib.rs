//! Core types shared across the engine workspace.
//! This crate contains pure data types with no external dependencies.

/// Minimum playing field dimensions. The field must also be even in both axes.
pub const MIN_FIELD_WIDTH: i32 = 10;
pub const MIN_FIELD_HEIGHT: i32 = 20;

/// Canonical field dimensions.
pub const DEFAULT_FIELD_WIDTH: i32 = 10;
pub const DEFAULT_FIELD_HEIGHT: i32 = 20;

/// Default number of pieces kept pending in the preview queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 2;

/// Default interval between automatic downward steps (milliseconds).
pub const DEFAULT_FALL_INTERVAL_MS: u32 = 1000;

/// Upper bound on cells per piece template, so per-piece scratch buffers can
/// live on the stack.
pub const MAX_PIECE_CELLS: usize = 8;

/// Index of a piece template in the catalog.
///
/// Kinds are catalog positions, not a fixed enum: the set of shapes is
/// supplied as external data and may contain any number of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindId(pub u8);

impl KindId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Opaque identity of a single locked cell on the grid.
///
/// Collaborators that render the field map these to visuals through their own
/// side tables; the engine treats the whole value as an identity token and
/// never consults it for game logic. Uniqueness is by construction: each
/// spawned piece gets a fresh serial and each of its cells a distinct index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId {
    /// Serial of the piece this cell came from (1-based, per session).
    pub piece: u32,
    /// Index of the cell within its piece template.
    pub cell: u8,
    /// Template kind, for color/identity use only.
    pub kind: KindId,
}

/// Continuous 2D position. Piece positions stay on a half-cell lattice, so
/// all arithmetic the engine performs on these values is exact.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl core::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl core::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Piece rotation in degrees, always a multiple of 90 normalized to [0, 360).
///
/// Quarter-turn offset rotation is pure integer negate/swap, so turning by a
/// delta and then by its inverse restores the exact starting value. The
/// transactional placement check relies on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotation(u16);

impl Rotation {
    pub const ZERO: Rotation = Rotation(0);

    /// Current angle in degrees, in [0, 360).
    pub fn degrees(self) -> u16 {
        self.0
    }

    /// Rotation after turning by `delta_degrees` (any multiple of 90,
    /// positive or negative). A non-quarter angle is a programmer error and
    /// panics.
    pub fn turned(self, delta_degrees: i32) -> Rotation {
        assert!(
            delta_degrees % 90 == 0,
            "rotation delta must be a multiple of 90, got {delta_degrees}"
        );
        let deg = (self.0 as i32 + delta_degrees).rem_euclid(360);
        Rotation(deg as u16)
    }

    /// Apply this rotation to a relative cell offset (exact integer math).
    pub fn apply(self, offset: (i32, i32)) -> (i32, i32) {
        let (x, y) = offset;
        match self.0 {
            0 => (x, y),
            90 => (-y, x),
            180 => (-x, -y),
            270 => (y, -x),
            _ => unreachable!("rotation is always a normalized quarter turn"),
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::ZERO
    }
}

/// Lifecycle phase of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running,
    GameOver,
}

impl SessionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Running => "running",
            SessionPhase::GameOver => "game_over",
        }
    }
}

/// Commands collaborators feed into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Start,
    MoveLeft,
    MoveRight,
    RotateLeft,
    RotateRight,
    SoftDrop,
    HardDrop,
    Hold,
}

impl GameCommand {
    /// Parse a command from its config/protocol name (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(GameCommand::Start),
            "moveleft" => Some(GameCommand::MoveLeft),
            "moveright" => Some(GameCommand::MoveRight),
            "rotateleft" => Some(GameCommand::RotateLeft),
            "rotateright" => Some(GameCommand::RotateRight),
            "softdrop" => Some(GameCommand::SoftDrop),
            "harddrop" => Some(GameCommand::HardDrop),
            "hold" => Some(GameCommand::Hold),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameCommand::Start => "start",
            GameCommand::MoveLeft => "moveLeft",
            GameCommand::MoveRight => "moveRight",
            GameCommand::RotateLeft => "rotateLeft",
            GameCommand::RotateRight => "rotateRight",
            GameCommand::SoftDrop => "softDrop",
            GameCommand::HardDrop => "hardDrop",
            GameCommand::Hold => "hold",
        }
    }
}

/// Lifecycle notifications the engine emits, in emission order.
/// Fire-and-forget: the engine never expects a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Emitted exactly once, when the session is constructed.
    Initialized,
    GameStarted,
    /// A freshly drawn kind entered the pending queue. Not emitted when a
    /// hold-returned piece is consumed from an over-capacity queue.
    PieceQueued(KindId),
    PieceHeld(KindId),
    PieceSpawned(KindId),
    /// Emitted once per lock cycle, including zero-clear locks.
    RowsRemoved(u32),
    GameOver,
}
