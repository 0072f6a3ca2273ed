//! Screen abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over screen capture,
//! allowing for both real monitor grabs and scripted implementations
//! for testing.

use super::{Frame, ScreenRegion};
use std::collections::VecDeque;
use thiserror::Error;

/// Errors that can occur during frame capture.
///
/// Capture errors are transient: the session logs them and retries
/// after a backoff rather than shutting down.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The backend failed to grab a frame.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    /// The backend returned a frame that does not describe its pixels.
    #[error("captured frame is malformed: {0}")]
    InvalidFrame(String),
    /// The requested region does not fit on the screen.
    #[error("capture region {region} exceeds screen bounds {width}x{height}")]
    RegionOutOfBounds {
        /// The requested capture rectangle.
        region: ScreenRegion,
        /// Screen width in pixels.
        width: u32,
        /// Screen height in pixels.
        height: u32,
    },
    /// A scripted source ran out of queued frames.
    #[error("no frames left to capture")]
    Exhausted,
}

/// Trait for frame source implementations.
///
/// This abstraction allows swapping between real screen capture
/// and scripted implementations for testing.
pub trait FrameSource {
    /// Captures a single frame of the game region.
    fn capture(&mut self) -> Result<Frame, CaptureError>;
}

/// Scripted source that replays queued frames in order.
///
/// Failures can be interleaved with frames to exercise the retry
/// path. Once the queue is empty every capture reports
/// [`CaptureError::Exhausted`], which bounded runs treat as the end
/// of input.
#[derive(Debug, Default)]
pub struct ScriptedScreen {
    queue: VecDeque<Result<Frame, CaptureError>>,
}

impl ScriptedScreen {
    /// Creates an empty scripted source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source preloaded with the given frames.
    pub fn from_frames(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            queue: frames.into_iter().map(Ok).collect(),
        }
    }

    /// Queues a frame for a later capture call.
    pub fn push_frame(&mut self, frame: Frame) {
        self.queue.push_back(Ok(frame));
    }

    /// Queues a transient capture failure.
    pub fn push_failure(&mut self, message: impl Into<String>) {
        self.queue
            .push_back(Err(CaptureError::CaptureFailed(message.into())));
    }

    /// Returns how many scripted captures remain.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl FrameSource for ScriptedScreen {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        self.queue.pop_front().unwrap_or(Err(CaptureError::Exhausted))
    }
}
