//! Pure one-step board simulation.
//!
//! Predicts the board after a single key press without any model of
//! the falling piece. Horizontal presses slide each row's contents
//! toward the pressed side; a soft drop or rotation leaves the
//! predicted board unchanged, since their outcome depends on piece
//! state this crate never observes.
//!
//! The slide moves only the run of empty cells touching the pressed
//! side, so interior gaps survive. That makes left and right
//! mirrored twins but not inverses of each other.

use super::Action;
use crate::board::Grid;

/// Returns the predicted board after `action`.
pub fn apply(grid: &Grid, action: Action) -> Grid {
    match action {
        Action::Left => shift_left(grid),
        Action::Right => shift_right(grid),
        // No piece model, so these are identity predictions
        Action::Down | Action::Rotate => grid.clone(),
    }
}

/// Slides each row's leading empty run to its end.
fn shift_left(grid: &Grid) -> Grid {
    let mut out = grid.clone();
    for row in 0..out.rows() {
        let cells = out.row_mut(row);
        let leading = cells.iter().take_while(|&&id| id == 0).count();
        if leading == cells.len() {
            continue; // fully empty row stays put
        }
        cells.rotate_left(leading);
    }
    out
}

/// Slides each row's trailing empty run to its start.
fn shift_right(grid: &Grid) -> Grid {
    let mut out = grid.clone();
    for row in 0..out.rows() {
        let cells = out.row_mut(row);
        let trailing = cells.iter().rev().take_while(|&&id| id == 0).count();
        if trailing == cells.len() {
            continue;
        }
        cells.rotate_right(trailing);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_rotates_leading_empties() {
        let grid = Grid::from_rows(&[&[0, 0, 7, 5]]).unwrap();
        assert_eq!(apply(&grid, Action::Left).row(0), &[7, 5, 0, 0]);
    }

    #[test]
    fn test_right_rotates_trailing_empties() {
        let grid = Grid::from_rows(&[&[7, 5, 0, 0]]).unwrap();
        assert_eq!(apply(&grid, Action::Right).row(0), &[0, 0, 7, 5]);
    }

    #[test]
    fn test_interior_gaps_survive() {
        let grid = Grid::from_rows(&[&[0, 5, 0, 3]]).unwrap();
        assert_eq!(apply(&grid, Action::Left).row(0), &[5, 0, 3, 0]);
    }

    #[test]
    fn test_empty_rows_stay_put() {
        let grid = Grid::from_rows(&[&[0, 0, 0], &[0, 4, 0]]).unwrap();
        let shifted = apply(&grid, Action::Left);

        assert_eq!(shifted.row(0), &[0, 0, 0]);
        assert_eq!(shifted.row(1), &[4, 0, 0]);
    }

    #[test]
    fn test_anchored_rows_are_untouched() {
        let grid = Grid::from_rows(&[&[3, 0, 3]]).unwrap();

        assert_eq!(apply(&grid, Action::Left), grid);
        assert_eq!(apply(&grid, Action::Right), grid);
    }

    #[test]
    fn test_down_and_rotate_are_identity() {
        let grid = Grid::from_rows(&[&[0, 1, 2], &[3, 0, 0]]).unwrap();

        assert_eq!(apply(&grid, Action::Down), grid);
        assert_eq!(apply(&grid, Action::Rotate), grid);
    }

    #[test]
    fn test_shifts_do_not_roundtrip() {
        let grid = Grid::from_rows(&[&[0, 5, 3, 0]]).unwrap();
        let left = apply(&grid, Action::Left);
        assert_eq!(left.row(0), &[5, 3, 0, 0]);

        // Shifting back gathers both empty runs on the left
        assert_eq!(apply(&left, Action::Right).row(0), &[0, 0, 5, 3]);
    }

    #[test]
    fn test_left_is_idempotent() {
        let grid = Grid::from_rows(&[&[0, 2, 0, 2], &[0, 0, 0, 9]]).unwrap();
        let once = apply(&grid, Action::Left);

        assert_eq!(apply(&once, Action::Left), once);
    }

    #[test]
    fn test_right_mirrors_left() {
        let grid = Grid::from_rows(&[&[0, 1, 0, 2], &[3, 0, 0, 0], &[0, 0, 4, 4]]).unwrap();

        let right = apply(&grid, Action::Right);
        let mirrored_left = apply(&grid.mirrored(), Action::Left).mirrored();
        assert_eq!(right, mirrored_left);
    }
}
