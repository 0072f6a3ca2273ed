//! Debug snapshots of captured frames and inferred boards.
//!
//! When enabled, each iteration leaves three artifacts on disk: the
//! raw frame as captured, a block-colored rendering of the inferred
//! grid, and the grid as text. Comparing the first two side by side
//! is the fastest way to spot a miscalibrated capture region.

use crate::board::{ColorClassifier, Grid};
use crate::capture::Frame;
use image::{Rgb, RgbImage};
use std::path::PathBuf;
use thiserror::Error;

/// Pixels per cell in the rendered board image.
const CELL_PIXELS: u32 = 16;

/// Errors that can occur while writing snapshots.
///
/// Snapshot failures are absorbed by the caller; losing a debug
/// artifact must never stop the session.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot directory could not be created.
    #[error("failed to create snapshot directory: {0}")]
    CreateDir(String),
    /// The frame's buffer does not match its dimensions.
    #[error("captured frame is malformed: {0}")]
    InvalidFrame(String),
    /// An artifact file could not be written.
    #[error("failed to write snapshot file: {0}")]
    Write(String),
}

/// Writes per-iteration debug artifacts into one directory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    /// Creates the snapshot directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| SnapshotError::CreateDir(e.to_string()))?;
        Ok(Self { dir })
    }

    /// Returns the directory snapshots are written into.
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Writes the frame, board rendering, and board text for one
    /// iteration.
    ///
    /// Files share a timestamped prefix so one iteration's artifacts
    /// sort together.
    pub fn save_iteration(
        &self,
        iteration: u64,
        frame: &Frame,
        grid: &Grid,
        classifier: &ColorClassifier,
    ) -> Result<(), SnapshotError> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let prefix = format!("{stamp}-{iteration:06}");

        let frame_image =
            RgbImage::from_raw(frame.width(), frame.height(), frame.pixels().to_vec())
                .ok_or_else(|| {
                    SnapshotError::InvalidFrame(format!(
                        "{} bytes for {}x{}",
                        frame.pixels().len(),
                        frame.width(),
                        frame.height()
                    ))
                })?;
        let frame_path = self.dir.join(format!("{prefix}-frame.png"));
        frame_image
            .save(&frame_path)
            .map_err(|e| SnapshotError::Write(e.to_string()))?;

        let board_path = self.dir.join(format!("{prefix}-board.png"));
        render_board(grid, classifier)
            .save(&board_path)
            .map_err(|e| SnapshotError::Write(e.to_string()))?;

        let text_path = self.dir.join(format!("{prefix}-board.txt"));
        std::fs::write(&text_path, grid.to_string())
            .map_err(|e| SnapshotError::Write(e.to_string()))?;

        tracing::debug!(
            iteration,
            dir = %self.dir.display(),
            prefix = %prefix,
            "Saved snapshot"
        );
        Ok(())
    }
}

/// Renders the grid as solid color blocks.
///
/// Empty cells render black; an id the classifier does not know
/// (which would indicate a table mismatch) renders magenta.
fn render_board(grid: &Grid, classifier: &ColorClassifier) -> RgbImage {
    let width = grid.cols() as u32 * CELL_PIXELS;
    let height = grid.rows() as u32 * CELL_PIXELS;
    let mut img = RgbImage::new(width, height);

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let id = grid.at(row, col);
            let (r, g, b) = if id == 0 {
                (0, 0, 0)
            } else {
                classifier.color_of(id).unwrap_or((255, 0, 255))
            };

            for dy in 0..CELL_PIXELS {
                for dx in 0..CELL_PIXELS {
                    img.put_pixel(
                        col as u32 * CELL_PIXELS + dx,
                        row as u32 * CELL_PIXELS + dy,
                        Rgb([r, g, b]),
                    );
                }
            }
        }
    }

    img
}
