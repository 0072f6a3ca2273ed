//! Connectivity-based board scoring.
//!
//! Rewards boards that gather same-colored cells into large connected
//! groups. Groups at or past the clear threshold of the game are
//! worth points per cell; smaller groups are worth nothing yet.

use super::BoardScorer;
use crate::board::{CellId, Grid};

/// Groups below this size score nothing.
const MIN_CLUSTER_SIZE: usize = 4;
/// Points per cell of a scoring group.
const CELL_POINTS: f64 = 10.0;

/// Scores a board by its same-color connected groups.
///
/// Connectivity is 4-neighbor (no diagonals) and empty cells never
/// join a group.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClusterScorer;

impl ClusterScorer {
    /// Creates the scorer.
    pub fn new() -> Self {
        Self
    }
}

impl BoardScorer for ClusterScorer {
    fn score(&self, grid: &Grid) -> f64 {
        let rows = grid.rows();
        let cols = grid.cols();
        let mut visited = vec![false; rows * cols];
        let mut total = 0.0;

        for row in 0..rows {
            for col in 0..cols {
                if visited[row * cols + col] {
                    continue;
                }
                let id = grid.at(row, col);
                if id == 0 {
                    continue;
                }

                let size = flood_size(grid, row, col, id, &mut visited);
                if size >= MIN_CLUSTER_SIZE {
                    total += size as f64 * CELL_POINTS;
                }
            }
        }

        total
    }

    fn name(&self) -> &'static str {
        "clusters"
    }
}

/// Measures the connected same-id group containing (row, col).
///
/// Uses an explicit stack so deep groups cannot overflow the call
/// stack. Cells are marked visited when pushed, not when popped.
fn flood_size(
    grid: &Grid,
    row: usize,
    col: usize,
    id: CellId,
    visited: &mut [bool],
) -> usize {
    let rows = grid.rows();
    let cols = grid.cols();

    let mut stack = vec![(row, col)];
    visited[row * cols + col] = true;
    let mut size = 0;

    while let Some((r, c)) = stack.pop() {
        size += 1;

        let mut visit = |nr: usize, nc: usize, stack: &mut Vec<(usize, usize)>| {
            let idx = nr * cols + nc;
            if !visited[idx] && grid.at(nr, nc) == id {
                visited[idx] = true;
                stack.push((nr, nc));
            }
        };

        if r > 0 {
            visit(r - 1, c, &mut stack);
        }
        if r + 1 < rows {
            visit(r + 1, c, &mut stack);
        }
        if c > 0 {
            visit(r, c - 1, &mut stack);
        }
        if c + 1 < cols {
            visit(r, c + 1, &mut stack);
        }
    }

    size
}
