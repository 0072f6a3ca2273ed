//! Session-scoped color classification.
//!
//! The game is not told which colors its pieces use. Instead every
//! exact RGB value seen at a cell center is assigned a small id in
//! first-seen order, so identical colors always compare equal within
//! a session. Ids carry no meaning across sessions.

use super::CellId;
use std::collections::HashMap;

/// Maps exact RGB values to session-stable cell ids.
///
/// Classification is total: an unseen color is registered on the
/// spot rather than rejected. Ids start at 1 because 0 is reserved
/// for empty cells in [`Grid`](super::Grid).
#[derive(Debug, Default)]
pub struct ColorClassifier {
    ids: HashMap<(u8, u8, u8), CellId>,
    /// Registered colors in id order (index `id - 1`).
    colors: Vec<(u8, u8, u8)>,
}

impl ColorClassifier {
    /// Creates a classifier with no registered colors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `rgb`, registering it if unseen.
    pub fn classify(&mut self, rgb: (u8, u8, u8)) -> CellId {
        if let Some(&id) = self.ids.get(&rgb) {
            return id;
        }

        let id = self.colors.len() as CellId + 1;
        self.ids.insert(rgb, id);
        self.colors.push(rgb);

        tracing::debug!(
            id,
            r = rgb.0,
            g = rgb.1,
            b = rgb.2,
            "Registered new cell color"
        );
        id
    }

    /// Returns the id for `rgb` without registering it.
    pub fn lookup(&self, rgb: (u8, u8, u8)) -> Option<CellId> {
        self.ids.get(&rgb).copied()
    }

    /// Returns the color registered under `id`.
    pub fn color_of(&self, id: CellId) -> Option<(u8, u8, u8)> {
        if id == 0 {
            return None;
        }
        self.colors.get(id as usize - 1).copied()
    }

    /// Returns all registered (id, color) pairs in id order.
    pub fn entries(&self) -> impl Iterator<Item = (CellId, (u8, u8, u8))> + '_ {
        self.colors
            .iter()
            .enumerate()
            .map(|(i, &rgb)| (i as CellId + 1, rgb))
    }

    /// Returns how many colors have been registered.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns true if no colors have been registered.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
