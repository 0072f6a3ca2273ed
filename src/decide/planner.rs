//! One-ply action selection.
//!
//! For each candidate action the planner simulates the board one
//! step ahead, scores the outcome, and keeps the best. There is no
//! deeper search; the scorer carries all the strategy.

use super::{simulate, Action};
use crate::board::Grid;
use crate::score::BoardScorer;
use serde::{Deserialize, Serialize};

/// Score one candidate action earned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    /// The candidate action.
    pub action: Action,
    /// Score of the board this action is predicted to produce.
    pub score: f64,
}

/// Outcome of planning one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// The winning action.
    pub action: Action,
    /// The winning action's score.
    pub score: f64,
    /// All candidates in evaluation order.
    pub candidates: Vec<CandidateScore>,
}

/// Chooses actions by scoring simulated boards.
pub struct Planner {
    scorer: Box<dyn BoardScorer + Send>,
}

impl Planner {
    /// Creates a planner around the given scorer.
    pub fn new(scorer: Box<dyn BoardScorer + Send>) -> Self {
        Self { scorer }
    }

    /// Returns the name of the scoring strategy in use.
    pub fn strategy(&self) -> &'static str {
        self.scorer.name()
    }

    /// Scores a board directly, without simulating any action.
    pub fn score(&self, grid: &Grid) -> f64 {
        self.scorer.score(grid)
    }

    /// Picks the best action for the given board.
    ///
    /// Candidates are evaluated in [`Action::ALL`] order and a later
    /// candidate only wins by scoring strictly higher, so ties fall
    /// to the earliest action and the result is deterministic.
    pub fn plan(&self, grid: &Grid) -> Plan {
        let candidates: Vec<CandidateScore> = Action::ALL
            .iter()
            .map(|&action| CandidateScore {
                action,
                score: self.scorer.score(&simulate::apply(grid, action)),
            })
            .collect();

        let mut best = candidates[0];
        for &candidate in &candidates[1..] {
            if candidate.score > best.score {
                best = candidate;
            }
        }

        tracing::trace!(
            left = candidates[0].score,
            right = candidates[1].score,
            down = candidates[2].score,
            rotate = candidates[3].score,
            chosen = %best.action,
            "Scored candidate actions"
        );

        Plan {
            action: best.action,
            score: best.score,
            candidates,
        }
    }
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("strategy", &self.strategy())
            .finish()
    }
}
