//! Key synthesis backed by the `enigo` crate.
//!
//! Only compiled when the `input` feature is enabled. Keys are held
//! for a short configurable interval because some games poll the
//! keyboard and miss an instantaneous press/release pair.

use super::{DispatchError, InputDriver};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use std::time::Duration;

/// Driver that synthesizes real key presses.
pub struct EnigoDriver {
    enigo: Enigo,
    hold: Duration,
}

impl EnigoDriver {
    /// Connects to the platform input backend.
    ///
    /// `hold` is how long each key stays down before release.
    pub fn new(hold: Duration) -> Result<Self, DispatchError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| DispatchError::Unavailable(e.to_string()))?;

        tracing::debug!(hold_ms = hold.as_millis() as u64, "Input driver ready");
        Ok(Self { enigo, hold })
    }
}

impl InputDriver for EnigoDriver {
    fn tap(&mut self, key: char) -> Result<(), DispatchError> {
        let code = Key::Unicode(key);
        press_and_release(|direction| self.enigo.key(code, direction), key, self.hold)
    }
}

/// Sends a press, holds, then releases.
///
/// A failed release leaves the key logically held and the game keeps
/// reading it, so the release is retried once before the failure is
/// reported.
fn press_and_release<E: std::fmt::Display>(
    mut send: impl FnMut(Direction) -> Result<(), E>,
    key: char,
    hold: Duration,
) -> Result<(), DispatchError> {
    send(Direction::Press).map_err(|e| DispatchError::SendFailed {
        key,
        reason: e.to_string(),
    })?;

    std::thread::sleep(hold);

    send(Direction::Release)
        .or_else(|_| send(Direction::Release))
        .map_err(|e| DispatchError::SendFailed {
            key,
            reason: e.to_string(),
        })
}

impl std::fmt::Debug for EnigoDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnigoDriver")
            .field("hold", &self.hold)
            .finish()
    }
}
