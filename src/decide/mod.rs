//! Action selection.
//!
//! This module holds the pure half of the control loop: the action
//! vocabulary, a one-step board simulator, and the planner that
//! picks whichever action scores best. Nothing here touches the
//! screen or the keyboard.

mod action;
mod planner;
pub mod simulate;

pub use action::Action;
pub use planner::{CandidateScore, Plan, Planner};
