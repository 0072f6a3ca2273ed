//! Action to key mapping.

use crate::decide::Action;
use serde::{Deserialize, Serialize};

/// Keys the game expects for each action.
///
/// Defaults match the common WASD-style layout: `a`/`d` to move,
/// `s` to drop, `w` to rotate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Key for a leftward shift.
    pub left: char,
    /// Key for a rightward shift.
    pub right: char,
    /// Key for a soft drop.
    pub down: char,
    /// Key for a rotation.
    pub rotate: char,
}

impl KeyBindings {
    /// Returns the key bound to `action`.
    pub fn key_for(&self, action: Action) -> char {
        match action {
            Action::Left => self.left,
            Action::Right => self.right,
            Action::Down => self.down,
            Action::Rotate => self.rotate,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: 'a',
            right: 'd',
            down: 's',
            rotate: 'w',
        }
    }
}
