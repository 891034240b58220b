/// Tuning constants and the TOML-backed runtime configuration.
///
/// The `const`s are the stock values; every field of [`GameConfig`] defaults
/// to them, so a config file only needs to name what it changes.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

// ── Stock values ─────────────────────────────────────────────────────────────

pub const GRAVITY: f32 = 0.5;
pub const JUMP_FORCE: f32 = 15.0;
pub const FLOOR_Y: f32 = 350.0;
pub const CEILING_Y: f32 = 50.0;
pub const WORLD_WIDTH: f32 = 10_000.0;
pub const VIEWPORT_WIDTH: f32 = 800.0;
pub const PLAYER_SPEED: f32 = 5.0;
pub const ENEMY_SPEED: f32 = 1.5;
pub const PLAYER_MIN_X: f32 = 25.0;
pub const PLAYER_RIGHT_MARGIN: f32 = 75.0;
pub const PLAYER_HEIGHT: f32 = 50.0;

pub const PICKUP_RADIUS: f32 = 30.0;
pub const HIT_RADIUS: f32 = 40.0;
pub const KNOCKBACK: f32 = 60.0;
pub const COIN_VALUE: u32 = 10;
pub const MAX_HEALTH: u32 = 3;

pub const DEFAULT_FPS: u32 = 60;

// ── Sections ─────────────────────────────────────────────────────────────────

/// Player and enemy kinematics, world bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    pub gravity: f32,
    pub jump_force: f32,
    pub floor_y: f32,
    pub ceiling_y: f32,
    pub world_width: f32,
    pub viewport_width: f32,
    pub player_speed: f32,
    pub enemy_speed: f32,
    pub player_min_x: f32,
    /// Distance kept between the player's x and the right world edge.
    pub player_right_margin: f32,
    pub player_height: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            floor_y: FLOOR_Y,
            ceiling_y: CEILING_Y,
            world_width: WORLD_WIDTH,
            viewport_width: VIEWPORT_WIDTH,
            player_speed: PLAYER_SPEED,
            enemy_speed: ENEMY_SPEED,
            player_min_x: PLAYER_MIN_X,
            player_right_margin: PLAYER_RIGHT_MARGIN,
            player_height: PLAYER_HEIGHT,
        }
    }
}

impl Physics {
    pub fn max_x(&self) -> f32 {
        self.world_width - self.player_right_margin
    }

    /// The y a standing sprite rests at (its top edge on the floor line).
    pub fn ground_y(&self) -> f32 {
        self.floor_y - self.player_height
    }

    pub fn clamp_x(&self, x: f32) -> f32 {
        x.max(self.player_min_x).min(self.max_x())
    }
}

/// Procedural generation of coins and enemies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spawn {
    pub initial_collectibles: usize,
    pub initial_enemies: usize,
    pub collectible_batch: usize,
    pub enemy_batch: usize,
    /// More content is generated once the player is this close to a frontier.
    pub lookahead: f32,
    pub collectible_start_x: f32,
    pub enemy_start_x: f32,
    pub collectible_gap_min: f32,
    pub collectible_gap_max: f32,
    pub enemy_gap_min: f32,
    pub enemy_gap_max: f32,
    pub patrol_range_min: f32,
    pub patrol_range_max: f32,
    /// Coins spawn this far above the floor line at the lowest.
    pub collectible_floor_clearance: f32,
}

impl Default for Spawn {
    fn default() -> Self {
        Self {
            initial_collectibles: 20,
            initial_enemies: 10,
            collectible_batch: 5,
            enemy_batch: 3,
            lookahead: 1000.0,
            collectible_start_x: 200.0,
            enemy_start_x: 400.0,
            collectible_gap_min: 100.0,
            collectible_gap_max: 300.0,
            enemy_gap_min: 200.0,
            enemy_gap_max: 500.0,
            patrol_range_min: 50.0,
            patrol_range_max: 150.0,
            collectible_floor_clearance: 100.0,
        }
    }
}

/// Pickup / contact radii and the session's scoring and health rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Combat {
    pub pickup_radius: f32,
    pub hit_radius: f32,
    pub knockback: f32,
    pub coin_value: u32,
    pub max_health: u32,
}

impl Default for Combat {
    fn default() -> Self {
        Self {
            pickup_radius: PICKUP_RADIUS,
            hit_radius: HIT_RADIUS,
            knockback: KNOCKBACK,
            coin_value: COIN_VALUE,
            max_health: MAX_HEALTH,
        }
    }
}

/// The subset of the config the simulation itself reads.  Carried inside
/// the game state so `tick` needs nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub physics: Physics,
    pub spawn: Spawn,
    pub combat: Combat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub fps: u32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { fps: DEFAULT_FPS }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log destination.  Without one no logger is installed.
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Open the log file for appending, if one is configured.
    pub fn open_target(&self) -> Result<Option<File>> {
        match &self.file {
            Some(path) => Ok(Some(
                OpenOptions::new().create(true).append(true).open(path)?,
            )),
            None => Ok(None),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    #[serde(flatten)]
    pub tuning: Tuning,
    pub terminal: TerminalConfig,
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or fall back to the stock config when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let src = std::fs::read_to_string(path)?;
                log::debug!("Loaded config from {}", path.display());
                Self::from_toml_str(&src)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.tuning.validate()?;
        if !(1..=240).contains(&self.terminal.fps) {
            return Err(GameError::InvalidConfig(format!(
                "terminal.fps must be between 1 and 240, got {}",
                self.terminal.fps
            )));
        }
        Ok(())
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<()> {
        let p = &self.physics;
        let s = &self.spawn;
        let c = &self.combat;

        for (field, value) in self.float_fields() {
            if !value.is_finite() {
                return Err(GameError::InvalidConfig(format!(
                    "{field} must be a finite number, got {value}"
                )));
            }
        }

        positive("physics.world_width", p.world_width)?;
        positive("physics.viewport_width", p.viewport_width)?;
        positive("physics.player_speed", p.player_speed)?;
        positive("physics.enemy_speed", p.enemy_speed)?;
        positive("physics.jump_force", p.jump_force)?;
        positive("physics.player_height", p.player_height)?;
        if p.gravity < 0.0 {
            return Err(invalid("physics.gravity must not be negative"));
        }
        if p.ceiling_y >= p.ground_y() {
            return Err(invalid(
                "physics.ceiling_y must lie above floor_y - player_height",
            ));
        }
        if p.player_min_x >= p.max_x() {
            return Err(invalid(
                "physics.player_min_x must be left of world_width - player_right_margin",
            ));
        }

        range("spawn.collectible_gap", s.collectible_gap_min, s.collectible_gap_max)?;
        range("spawn.enemy_gap", s.enemy_gap_min, s.enemy_gap_max)?;
        range("spawn.patrol_range", s.patrol_range_min, s.patrol_range_max)?;
        if p.ceiling_y >= p.floor_y - s.collectible_floor_clearance {
            return Err(invalid(
                "spawn.collectible_floor_clearance leaves no room below the ceiling",
            ));
        }

        if c.max_health == 0 {
            return Err(invalid("combat.max_health must be at least 1"));
        }
        positive("combat.pickup_radius", c.pickup_radius)?;
        positive("combat.hit_radius", c.hit_radius)?;
        Ok(())
    }

    fn float_fields(&self) -> [(&'static str, f32); 24] {
        let p = &self.physics;
        let s = &self.spawn;
        let c = &self.combat;
        [
            ("physics.gravity", p.gravity),
            ("physics.jump_force", p.jump_force),
            ("physics.floor_y", p.floor_y),
            ("physics.ceiling_y", p.ceiling_y),
            ("physics.world_width", p.world_width),
            ("physics.viewport_width", p.viewport_width),
            ("physics.player_speed", p.player_speed),
            ("physics.enemy_speed", p.enemy_speed),
            ("physics.player_min_x", p.player_min_x),
            ("physics.player_right_margin", p.player_right_margin),
            ("physics.player_height", p.player_height),
            ("spawn.lookahead", s.lookahead),
            ("spawn.collectible_start_x", s.collectible_start_x),
            ("spawn.enemy_start_x", s.enemy_start_x),
            ("spawn.collectible_gap_min", s.collectible_gap_min),
            ("spawn.collectible_gap_max", s.collectible_gap_max),
            ("spawn.enemy_gap_min", s.enemy_gap_min),
            ("spawn.enemy_gap_max", s.enemy_gap_max),
            ("spawn.patrol_range_min", s.patrol_range_min),
            ("spawn.patrol_range_max", s.patrol_range_max),
            ("spawn.collectible_floor_clearance", s.collectible_floor_clearance),
            ("combat.pickup_radius", c.pickup_radius),
            ("combat.hit_radius", c.hit_radius),
            ("combat.knockback", c.knockback),
        ]
    }
}

fn invalid(msg: &str) -> GameError {
    GameError::InvalidConfig(msg.to_string())
}

fn positive(field: &str, value: f32) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(GameError::InvalidConfig(format!(
            "{field} must be positive, got {value}"
        )))
    }
}

/// Random ranges are half-open, so `min` must be strictly below `max`.
fn range(field: &str, min: f32, max: f32) -> Result<()> {
    if min > 0.0 && min < max {
        Ok(())
    } else {
        Err(GameError::InvalidConfig(format!(
            "{field}_min must be positive and below {field}_max, got {min}..{max}"
        )))
    }
}
