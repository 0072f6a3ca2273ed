//! Agent orchestration.
//!
//! The [`Session`] ties the pipeline together: it captures frames,
//! extracts and masks the board, plans an action, and dispatches the
//! bound key, looping until stopped or out of frames. Decision traces
//! written by [`TraceRecorder`] can be read back with [`read_trace`]
//! for offline inspection.

mod session;
mod trace;

pub use session::{EvalMode, Session, SessionStats, StepOutcome};
pub use trace::{read_trace, TraceError, TraceHeader, TraceRecorder, TraceStep};
