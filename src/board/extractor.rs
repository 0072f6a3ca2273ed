//! Frame to grid conversion.
//!
//! Divides a captured frame into equal cells and samples one pixel at
//! the center of each, where the fill color is steady. Edge pixels
//! are avoided on purpose: cell borders and anti-aliased outlines
//! vary between repaints while centers do not.

use super::{ColorClassifier, Grid};
use crate::capture::Frame;

/// Samples a frame into a grid of cell ids.
///
/// The extractor owns the board shape and is otherwise stateless;
/// color memory lives in the [`ColorClassifier`] passed to each call.
#[derive(Debug, Clone, Copy)]
pub struct BoardExtractor {
    rows: usize,
    cols: usize,
}

impl BoardExtractor {
    /// Creates an extractor for a board with the given shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Returns the number of board rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of board columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Converts a frame into a grid, registering unseen colors.
    ///
    /// A frame that is malformed or too small to give every cell at
    /// least one pixel yields an all-empty grid instead of an error;
    /// one bad capture should read as a blank board, not a crash.
    pub fn extract(&self, frame: &Frame, classifier: &mut ColorClassifier) -> Grid {
        let mut grid = Grid::new(self.rows, self.cols);
        if self.rows == 0 || self.cols == 0 {
            return grid;
        }

        let cell_w = frame.width() as usize / self.cols;
        let cell_h = frame.height() as usize / self.rows;
        if !frame.is_valid() || cell_w == 0 || cell_h == 0 {
            tracing::warn!(
                frame_width = frame.width(),
                frame_height = frame.height(),
                rows = self.rows,
                cols = self.cols,
                "Frame unusable for board sampling; emitting empty grid"
            );
            return grid;
        }

        for row in 0..self.rows {
            for col in 0..self.cols {
                let x = (col * cell_w + cell_w / 2) as u32;
                let y = (row * cell_h + cell_h / 2) as u32;
                if let Some(rgb) = frame.pixel(x, y) {
                    grid.set(row, col, classifier.classify(rgb));
                }
            }
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKGROUND: (u8, u8, u8) = (10, 10, 10);
    const RED: (u8, u8, u8) = (200, 30, 30);
    const BLUE: (u8, u8, u8) = (30, 30, 200);

    /// 3x3 board on a 6x6 frame, so cells are 2x2 with centers at
    /// odd pixel coordinates.
    fn extractor() -> BoardExtractor {
        BoardExtractor::new(3, 3)
    }

    #[test]
    fn test_samples_cell_centers() {
        let mut frame = Frame::filled(6, 6, BACKGROUND, 1);
        frame.set_pixel(1, 1, RED); // center of cell (0, 0)
        frame.set_pixel(5, 5, BLUE); // center of cell (2, 2)

        let mut classifier = ColorClassifier::new();
        let grid = extractor().extract(&frame, &mut classifier);

        let background_id = classifier.lookup(BACKGROUND).unwrap();
        let red_id = classifier.lookup(RED).unwrap();
        let blue_id = classifier.lookup(BLUE).unwrap();

        assert_eq!(grid.at(0, 0), red_id);
        assert_eq!(grid.at(2, 2), blue_id);
        assert_eq!(grid.at(1, 1), background_id);
        assert_eq!(classifier.len(), 3);
    }

    #[test]
    fn test_ignores_cell_corners() {
        let mut frame = Frame::filled(6, 6, BACKGROUND, 1);
        // Corner pixel of cell (0, 0); its center at (1, 1) stays background
        frame.set_pixel(0, 0, RED);

        let mut classifier = ColorClassifier::new();
        let grid = extractor().extract(&frame, &mut classifier);

        assert_eq!(grid.at(0, 0), classifier.lookup(BACKGROUND).unwrap());
        assert_eq!(classifier.lookup(RED), None);
    }

    #[test]
    fn test_undersized_frame_yields_empty_grid() {
        let frame = Frame::filled(4, 4, RED, 1);
        let mut classifier = ColorClassifier::new();

        // 12 rows cannot each get a pixel from 4
        let grid = BoardExtractor::new(12, 6).extract(&frame, &mut classifier);

        assert_eq!(grid.occupied(), 0);
        assert!(classifier.is_empty());
    }

    #[test]
    fn test_ids_stable_across_frames() {
        let mut classifier = ColorClassifier::new();
        let first = extractor().extract(&Frame::filled(6, 6, RED, 1), &mut classifier);
        let second = extractor().extract(&Frame::filled(6, 6, RED, 2), &mut classifier);

        assert_eq!(first, second);
        assert_eq!(classifier.len(), 1);
    }
}
