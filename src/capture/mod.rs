//! Screen input and frame handling.
//!
//! This module provides abstractions for locating the game window and
//! capturing frames of it. A frame is treated as raw pixels only;
//! turning pixels into a board is the job of the `board` module.

mod frame;
#[cfg(feature = "screen")]
mod live;
mod screen;
mod window;

pub use frame::{Frame, BYTES_PER_PIXEL};
#[cfg(feature = "screen")]
pub use live::{list_windows, XcapLocator, XcapScreen};
pub use screen::{CaptureError, FrameSource, ScriptedScreen};
pub use window::{FixedLocator, ScreenRegion, WindowError, WindowLocator};
