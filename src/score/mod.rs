//! Board scoring strategies.
//!
//! A scorer reduces a grid to a single number where higher is
//! better. The decision loop compares scores of simulated boards, so
//! only the ordering matters, not the absolute values.

mod cluster;
mod stack;

pub use cluster::ClusterScorer;
pub use stack::{StackFeatures, StackScorer};

use crate::board::Grid;
use serde::{Deserialize, Serialize};

/// Trait for board scoring implementations.
///
/// Scorers must be pure: the same grid always gets the same score,
/// and scoring never mutates anything. The decision loop relies on
/// this to compare candidate boards fairly.
pub trait BoardScorer {
    /// Scores a board; higher is better.
    fn score(&self, grid: &Grid) -> f64;

    /// Returns a short name for logs and traces.
    fn name(&self) -> &'static str;
}

/// Selectable scoring strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Reward large same-color connected groups.
    #[default]
    Clusters,
    /// Penalize tall, uneven, holey stacks.
    Stack,
}

impl StrategyKind {
    /// Builds the scorer this strategy names.
    pub fn build(self) -> Box<dyn BoardScorer + Send> {
        match self {
            Self::Clusters => Box::new(ClusterScorer::new()),
            Self::Stack => Box::new(StackScorer::new()),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clusters => write!(f, "clusters"),
            Self::Stack => write!(f, "stack"),
        }
    }
}
