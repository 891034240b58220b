/// All game entity types: plain data with a few small accessors.

use std::time::Duration;

use crate::config::Tuning;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Player ───────────────────────────────────────────────────────────────────

/// World coordinates grow right and down; `(x, y)` is the sprite's top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Vertical velocity, negative is upward.
    pub vy: f32,
    /// Set by a jump, cleared on floor contact.
    pub airborne: bool,
}

// ── World content ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Collectible {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub collected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    /// Maximum distance from `origin_x` before the enemy turns around.
    pub patrol_range: f32,
    pub origin_x: f32,
}

/// Generation cursor: where the last coin and enemy were placed.
#[derive(Clone, Debug, PartialEq)]
pub struct Frontier {
    pub collectible_x: f32,
    pub enemy_x: f32,
    pub next_id: u64,
}

// ── Session ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub health: u32,
    pub score: u32,
    pub status: GameStatus,
}

// ── Input ────────────────────────────────────────────────────────────────────

/// Which controls are held this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    /// Append-only; collected coins stay with `collected` set.
    pub collectibles: Vec<Collectible>,
    /// Append-only.
    pub enemies: Vec<Enemy>,
    pub session: Session,
    pub frontier: Frontier,
    pub tuning: Tuning,
    pub frame: u64,
    /// Wall time fed through `tick` so far.  Movement is per frame, not per
    /// second, so this is bookkeeping only.
    pub elapsed: Duration,
    pub last_dt: Duration,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        self.session.status == GameStatus::GameOver
    }

    /// Coins still in play, in spawn order.
    pub fn visible_collectibles(&self) -> impl Iterator<Item = &Collectible> {
        self.collectibles.iter().filter(|c| !c.collected)
    }
}
