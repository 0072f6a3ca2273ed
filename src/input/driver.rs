//! Key dispatch abstraction.
//!
//! This module provides a trait-based abstraction over keyboard
//! injection, allowing for both real key synthesis and recording
//! implementations for testing.

use std::collections::VecDeque;
use thiserror::Error;

/// Errors that can occur while dispatching a key press.
///
/// Dispatch errors are transient: the session logs them and moves to
/// the next iteration rather than shutting down.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The input backend could not be opened at all.
    #[error("input backend unavailable: {0}")]
    Unavailable(String),
    /// A single key press was refused.
    #[error("failed to send key {key:?}: {reason}")]
    SendFailed {
        /// The key that was being sent.
        key: char,
        /// What the backend reported.
        reason: String,
    },
}

/// Trait for input driver implementations.
///
/// This abstraction allows swapping between real key synthesis and
/// recording implementations for testing.
pub trait InputDriver {
    /// Presses and releases a single key.
    fn tap(&mut self, key: char) -> Result<(), DispatchError>;
}

/// Driver that records taps instead of sending them.
///
/// Failures can be queued to exercise the dispatch retry path; each
/// queued failure consumes one tap.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    taps: Vec<char>,
    failures: VecDeque<String>,
}

impl RecordingDriver {
    /// Creates a driver with no recorded taps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every key tapped so far, in order.
    pub fn taps(&self) -> &[char] {
        &self.taps
    }

    /// Queues a failure for an upcoming tap.
    pub fn push_failure(&mut self, reason: impl Into<String>) {
        self.failures.push_back(reason.into());
    }
}

impl InputDriver for RecordingDriver {
    fn tap(&mut self, key: char) -> Result<(), DispatchError> {
        if let Some(reason) = self.failures.pop_front() {
            return Err(DispatchError::SendFailed { key, reason });
        }
        self.taps.push(key);
        Ok(())
    }
}
