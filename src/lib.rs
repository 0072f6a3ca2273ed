//! Block Pilot Library
//!
//! An autonomous player for falling-block puzzle games. It watches the
//! screen the way a human does: capture the game region, read the board
//! out of raw pixels, weigh the candidate moves, press a key.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! capture → board → decide → input
//!    ↓        ↓        ↓
//!      snapshot / trace / metrics (observation)
//! ```
//!
//! # Design Principles
//!
//! - **One ply only**: Each iteration scores the immediate result of a
//!   single action; there is no lookahead or piece model
//! - **Transient failures are absorbed**: A dropped capture or refused
//!   key press is counted and retried, never fatal
//! - **Scripted-first**: Every live backend sits behind a trait with a
//!   scripted twin, so the full pipeline runs in tests without a
//!   screen or a window system
//!
//! # Features
//!
//! - `screen`: capture a real monitor region via `xcap`
//! - `input`: synthesize real key presses via `enigo`
//! - `metrics`: serve Prometheus metrics over HTTP
//!
//! # Example
//!
//! ```no_run
//! use block_pilot::{
//!     agent::Session,
//!     capture::{Frame, ScriptedScreen},
//!     config::AgentConfig,
//!     input::RecordingDriver,
//! };
//!
//! let config = AgentConfig::default();
//!
//! // Play against scripted frames instead of a live screen
//! let screen = ScriptedScreen::from_frames([
//!     Frame::filled(60, 120, config.board.background, 1),
//! ]);
//!
//! let mut session = Session::new(&config, screen, RecordingDriver::new());
//! let stats = session.run_for(1);
//! println!("decisions made: {}", stats.decisions_total());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod agent;
pub mod board;
pub mod capture;
pub mod config;
pub mod decide;
pub mod input;
pub mod metrics;
pub mod score;
pub mod snapshot;

// Re-export commonly used types at crate root
pub use agent::{Session, SessionStats, StepOutcome};
pub use board::{BoardExtractor, ColorClassifier, Grid};
pub use capture::{Frame, FrameSource};
pub use config::AgentConfig;
pub use decide::{Action, Plan, Planner};
pub use input::InputDriver;
pub use score::{BoardScorer, StrategyKind};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
