//! Key dispatch.
//!
//! This module carries a decision the rest of the way: bindings turn
//! an action into a key, and a driver delivers that key to the game.

mod bindings;
mod driver;
#[cfg(feature = "input")]
mod live;

pub use bindings::KeyBindings;
pub use driver::{DispatchError, InputDriver, RecordingDriver};
#[cfg(feature = "input")]
pub use live::EnigoDriver;
