/// World → terminal-cell projection.
///
/// The camera follows the player horizontally; vertically the whole world
/// height (ceiling to the bottom of the floor strip) is always on screen.

use crate::config::Physics;
use crate::error::{GameError, Result};

/// Background scroll speed relative to the player.
pub const PARALLAX_FACTOR: f32 = 0.2;

/// The player is drawn this far left of the viewport's centre.
pub const CAMERA_LEAD: f32 = 50.0;

pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 12;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Play-area size in cells.
    pub cols: u16,
    pub rows: u16,
    /// World units visible across / down the play area.
    pub span_x: f32,
    pub span_y: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, physics: &Physics) -> Self {
        Self {
            cols,
            rows,
            span_x: physics.viewport_width,
            span_y: physics.floor_y + physics.player_height,
        }
    }

    /// Reject terminals too small to show anything useful.
    pub fn checked(cols: u16, rows: u16, physics: &Physics) -> Result<Self> {
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(GameError::TerminalTooSmall {
                width: cols,
                height: rows,
                min_width: MIN_COLS,
                min_height: MIN_ROWS,
            });
        }
        Ok(Self::new(cols, rows, physics))
    }

    /// World x of the viewport's left edge.
    pub fn camera_left(&self, player_x: f32) -> f32 {
        player_x - self.span_x / 2.0 + CAMERA_LEAD
    }

    pub fn units_per_col(&self) -> f32 {
        self.span_x / self.cols as f32
    }

    pub fn units_per_row(&self) -> f32 {
        self.span_y / self.rows as f32
    }

    /// Column of `world_x`, or `None` when it is off screen.
    pub fn column(&self, world_x: f32, camera_left: f32) -> Option<u16> {
        let rel = world_x - camera_left;
        if rel < 0.0 || rel >= self.span_x {
            return None;
        }
        Some(((rel / self.units_per_col()) as u16).min(self.cols - 1))
    }

    /// Row of `world_y` within the play area, or `None` outside it.
    pub fn row(&self, world_y: f32) -> Option<u16> {
        if world_y < 0.0 || world_y >= self.span_y {
            return None;
        }
        Some(((world_y / self.units_per_row()) as u16).min(self.rows - 1))
    }

    /// How many columns the background has scrolled.
    pub fn parallax_offset(&self, player_x: f32) -> usize {
        (player_x * PARALLAX_FACTOR / self.units_per_col()).max(0.0) as usize
    }
}
