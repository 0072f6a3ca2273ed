//! Window discovery for capture targeting.
//!
//! The game is located once at startup by a substring match on window
//! titles; the resulting screen rectangle is what every subsequent
//! frame capture crops to. Location failures are fatal (there is no
//! point running the loop against an absent window), unlike the
//! transient capture failures handled downstream.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while locating the game window.
#[derive(Debug, Error)]
pub enum WindowError {
    /// No window title contained the requested substring.
    #[error("no window title contains {0:?}")]
    NotFound(String),
    /// The window system refused to list windows.
    #[error("window enumeration failed: {0}")]
    EnumerationFailed(String),
}

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRegion {
    /// Left edge in screen coordinates (may be negative on multi-monitor setups).
    pub x: i32,
    /// Top edge in screen coordinates.
    pub y: i32,
    /// Region width in pixels.
    pub width: u32,
    /// Region height in pixels.
    pub height: u32,
}

impl ScreenRegion {
    /// Creates a new region.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if the region covers at least one pixel.
    pub fn is_non_empty(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl std::fmt::Display for ScreenRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Trait for window locator implementations.
///
/// This abstraction allows swapping between a real window manager
/// query and fixed regions for testing and headless runs.
pub trait WindowLocator {
    /// Finds the first window whose title contains `title_substring`
    /// and returns its screen rectangle.
    fn locate(&self, title_substring: &str) -> Result<ScreenRegion, WindowError>;
}

/// Locator that always returns a fixed region.
///
/// Used when the capture region is configured explicitly and in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator {
    region: ScreenRegion,
}

impl FixedLocator {
    /// Creates a locator pinned to `region`.
    pub fn new(region: ScreenRegion) -> Self {
        Self { region }
    }
}

impl WindowLocator for FixedLocator {
    fn locate(&self, _title_substring: &str) -> Result<ScreenRegion, WindowError> {
        Ok(self.region)
    }
}
