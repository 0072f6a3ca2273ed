//! Board inference from captured frames.
//!
//! This module turns raw pixels into a small grid of cell ids: the
//! extractor samples one pixel per cell and the classifier maps exact
//! colors to session-stable ids. Nothing here knows what the colors
//! mean; scoring assigns meaning downstream.

mod classifier;
mod extractor;
mod grid;

pub use classifier::ColorClassifier;
pub use extractor::BoardExtractor;
pub use grid::{CellId, Grid};
