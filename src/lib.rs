//! Side-scrolling platformer: pure game logic plus the terminal-facing
//! helpers (input tracking, viewport projection) the binary builds on.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod viewport;

pub use error::{GameError, Result};
