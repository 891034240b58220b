/// Held-key tracking for terminals.
///
/// Instead of acting on each key event individually, we record the frame
/// number of the last press/repeat event for every key.  Each frame the
/// keys that are still "fresh" become the `InputState` handed to `tick`.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol etc.): proper
///   `Press` / `Repeat` / `Release` events, so keys are dropped on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire after `HOLD_WINDOW` frames of silence.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::entities::InputState;

/// A key counts as held if its last press/repeat event arrived within
/// this many frames.
pub const HOLD_WINDOW: u64 = 4;

/// One-shot actions, handled outside the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Restart,
}

#[derive(Clone, Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one key event into the tracker.  Returns a command for keys
    /// that trigger one.
    pub fn handle(&mut self, event: &KeyEvent, frame: u64) -> Option<Command> {
        let code = normalize(event.code);
        match event.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(code, frame);
                command_for(code, event.modifiers)
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(code, frame);
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
                None
            }
        }
    }

    pub fn is_held(&self, key: KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Controls held at `frame`.
    pub fn snapshot(&self, frame: u64) -> InputState {
        let held = |keys: &[KeyCode]| keys.iter().any(|&k| self.is_held(k, frame));
        InputState {
            left: held(&[KeyCode::Left, KeyCode::Char('a')]),
            right: held(&[KeyCode::Right, KeyCode::Char('d')]),
            jump: held(&[KeyCode::Up, KeyCode::Char(' '), KeyCode::Char('w')]),
        }
    }

    pub fn clear(&mut self) {
        self.key_frame.clear();
    }
}

/// Letter keys are tracked case-insensitively so Shift or Caps Lock
/// doesn't split a press from its release.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

fn command_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('r') => Some(Command::Restart),
        _ => None,
    }
}
