//! Board grid representation.
//!
//! A grid is the canonical output of board inference: a row-major
//! matrix of cell ids, where 0 means empty and any other id names a
//! session-stable color class. Row 0 is the top of the board.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a cell color class.
///
/// Ids are assigned per session in first-seen order starting at 1;
/// 0 is reserved for empty cells.
pub type CellId = u32;

/// A rectangular board of cell ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: Vec<CellId>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Creates an empty (all-zero) grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![0; rows * cols],
            rows,
            cols,
        }
    }

    /// Builds a grid from row slices.
    ///
    /// Returns `None` if rows have unequal lengths.
    pub fn from_rows(rows: &[&[CellId]]) -> Option<Self> {
        let cols = rows.first().map_or(0, |row| row.len());
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        Some(Self {
            cells: rows.concat(),
            rows: rows.len(),
            cols,
        })
    }

    /// Returns the number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the id at (row, col).
    ///
    /// Panics if out of bounds; use [`get`](Self::get) when bounds
    /// are not already known.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> CellId {
        self.cells[row * self.cols + col]
    }

    /// Returns the id at (row, col), or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<CellId> {
        if row < self.rows && col < self.cols {
            Some(self.at(row, col))
        } else {
            None
        }
    }

    /// Sets the id at (row, col).
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, id: CellId) {
        self.cells[row * self.cols + col] = id;
    }

    /// Returns one row as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[CellId] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Returns one row as a mutable slice.
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [CellId] {
        &mut self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Returns all cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    /// Returns a copy with every cell matching `background` set to 0.
    ///
    /// Board inference labels every sampled color, including the
    /// board background; scoring wants occupancy, so the background
    /// id is erased at that boundary.
    pub fn mask(&self, background: CellId) -> Self {
        let mut masked = self.clone();
        if background != 0 {
            for cell in &mut masked.cells {
                if *cell == background {
                    *cell = 0;
                }
            }
        }
        masked
    }

    /// Returns the number of non-empty cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&id| id != 0).count()
    }

    /// Returns a copy mirrored around the vertical axis.
    ///
    /// Flips each row left-to-right, which turns a leftward board
    /// operation into its rightward twin.
    pub fn mirrored(&self) -> Self {
        let mut mirrored = self.clone();
        for row in 0..self.rows {
            mirrored.row_mut(row).reverse();
        }
        mirrored
    }

    /// Returns the transpose (rows become columns).
    pub fn transposed(&self) -> Self {
        let mut out = Self::new(self.cols, self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.set(col, row, self.at(row, col));
            }
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>2}", self.at(row, col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
