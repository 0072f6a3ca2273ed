//! Stack-shape board scoring.
//!
//! Classic falling-block heuristics: low flat stacks with no buried
//! gaps score best, and completed rows earn a bonus. Cell colors are
//! ignored here; any non-empty cell counts as occupied.

use super::BoardScorer;
use crate::board::Grid;

const HEIGHT_WEIGHT: f64 = -1.0;
const HOLE_WEIGHT: f64 = -3.0;
const BUMPINESS_WEIGHT: f64 = -1.0;
const COMPLETE_ROW_WEIGHT: f64 = 10.0;

/// Shape features of a board stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackFeatures {
    /// Sum of column heights, measured from each column's topmost
    /// occupied cell to the board floor.
    pub aggregate_height: u32,
    /// Empty cells with at least one occupied cell above them.
    pub holes: u32,
    /// Sum of absolute height differences between adjacent columns.
    pub bumpiness: u32,
    /// Rows with every cell occupied.
    pub complete_rows: u32,
}

impl StackFeatures {
    /// Measures all features in one pass over the columns.
    pub fn measure(grid: &Grid) -> Self {
        let rows = grid.rows();
        let cols = grid.cols();

        let mut heights = vec![0u32; cols];
        let mut holes = 0u32;
        for col in 0..cols {
            let mut seen_block = false;
            for row in 0..rows {
                if grid.at(row, col) != 0 {
                    if !seen_block {
                        heights[col] = (rows - row) as u32;
                        seen_block = true;
                    }
                } else if seen_block {
                    holes += 1;
                }
            }
        }

        let aggregate_height = heights.iter().sum();
        let mut bumpiness = 0u32;
        for i in 1..cols {
            bumpiness += heights[i - 1].abs_diff(heights[i]);
        }

        let complete_rows = (0..rows)
            .filter(|&row| grid.row(row).iter().all(|&id| id != 0))
            .count() as u32;

        Self {
            aggregate_height,
            holes,
            bumpiness,
            complete_rows,
        }
    }
}

/// Scores a board by its stack shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct StackScorer;

impl StackScorer {
    /// Creates the scorer.
    pub fn new() -> Self {
        Self
    }
}

impl BoardScorer for StackScorer {
    fn score(&self, grid: &Grid) -> f64 {
        let features = StackFeatures::measure(grid);
        HEIGHT_WEIGHT * features.aggregate_height as f64
            + HOLE_WEIGHT * features.holes as f64
            + BUMPINESS_WEIGHT * features.bumpiness as f64
            + COMPLETE_ROW_WEIGHT * features.complete_rows as f64
    }

    fn name(&self) -> &'static str {
        "stack"
    }
}
