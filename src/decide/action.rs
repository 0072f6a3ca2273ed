//! Player actions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One key press worth of game input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Shift the active piece one column left.
    Left,
    /// Shift the active piece one column right.
    Right,
    /// Drop the active piece faster.
    Down,
    /// Rotate the active piece.
    Rotate,
}

impl Action {
    /// Every action in evaluation order.
    ///
    /// The decision loop scores candidates in this order and breaks
    /// ties toward the earlier entry, so the order is part of the
    /// observable behavior.
    pub const ALL: [Action; 4] = [Action::Left, Action::Right, Action::Down, Action::Rotate];

    /// Returns the lowercase name used in logs and traces.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Down => "down",
            Action::Rotate => "rotate",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
