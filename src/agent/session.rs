//! The agent session: capture, infer, decide, press.
//!
//! A session owns every collaborator and runs the loop that turns
//! frames into key presses. Transient failures (a dropped capture, a
//! refused key) are logged, counted, and absorbed; an iteration that
//! absorbed one backs off in place of the fixed iteration delay.
//! Only an exhausted frame source ends a run early.

use crate::board::{BoardExtractor, CellId, ColorClassifier, Grid};
use crate::capture::{CaptureError, FrameSource};
use crate::config::{AgentConfig, TimingConfig};
use crate::decide::{simulate, Action, CandidateScore, Plan, Planner};
use crate::input::{InputDriver, KeyBindings};
use crate::metrics::{MetricsRegistry, MetricsSnapshot};
use crate::snapshot::SnapshotWriter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::trace::{TraceRecorder, TraceStep};

/// How candidate actions are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    /// Score simulated boards; the game only sees the winning press.
    Simulated,
    /// Press each candidate key and score the re-captured board.
    /// Honest about what a press really does, but every candidate
    /// press lands on the live game.
    Probe,
}

/// Counters accumulated over a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    /// Loop iterations that reached a decision.
    pub iterations: u64,
    /// Captures that failed and were retried.
    pub capture_failures: u64,
    /// Key dispatches that failed.
    pub dispatch_failures: u64,
    /// Times left was chosen.
    pub decisions_left: u64,
    /// Times right was chosen.
    pub decisions_right: u64,
    /// Times down was chosen.
    pub decisions_down: u64,
    /// Times rotate was chosen.
    pub decisions_rotate: u64,
    /// Score of the most recent winning candidate.
    pub last_score: f64,
}

impl SessionStats {
    /// Counts one chosen action.
    pub fn record_decision(&mut self, action: Action) {
        match action {
            Action::Left => self.decisions_left += 1,
            Action::Right => self.decisions_right += 1,
            Action::Down => self.decisions_down += 1,
            Action::Rotate => self.decisions_rotate += 1,
        }
    }

    /// Returns the total number of decisions made.
    pub fn decisions_total(&self) -> u64 {
        self.decisions_left + self.decisions_right + self.decisions_down + self.decisions_rotate
    }
}

/// What one loop iteration amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A decision was made (the dispatch itself may still have failed).
    Acted(Action),
    /// A transient failure was absorbed; nothing was decided.
    Skipped,
    /// The frame source has nothing more to give.
    Exhausted,
}

/// One game-playing session.
///
/// Generic over its frame source and input driver so tests and demos
/// can run entirely on scripted collaborators.
pub struct Session<S: FrameSource, D: InputDriver> {
    screen: S,
    driver: D,
    extractor: BoardExtractor,
    classifier: ColorClassifier,
    planner: Planner,
    bindings: KeyBindings,
    timing: TimingConfig,
    eval: EvalMode,
    background_id: CellId,
    stats: SessionStats,
    snapshots: Option<SnapshotWriter>,
    trace: Option<TraceRecorder>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<S: FrameSource, D: InputDriver> Session<S, D> {
    /// Creates a session from configuration and live collaborators.
    ///
    /// The configured background color is registered with the
    /// classifier up front, so its id is known before the first
    /// frame and empty cells mask out from the start.
    pub fn new(config: &AgentConfig, screen: S, driver: D) -> Self {
        let mut classifier = ColorClassifier::new();
        let background_id = classifier.classify(config.board.background);

        let eval = if config.score.live_probe {
            EvalMode::Probe
        } else {
            EvalMode::Simulated
        };

        tracing::info!(
            rows = config.board.rows,
            cols = config.board.cols,
            strategy = %config.score.strategy,
            eval = ?eval,
            "Session created"
        );

        Self {
            screen,
            driver,
            extractor: BoardExtractor::new(config.board.rows, config.board.cols),
            classifier,
            planner: Planner::new(config.score.strategy.build()),
            bindings: config.input,
            timing: config.timing.clone(),
            eval,
            background_id,
            stats: SessionStats::default(),
            snapshots: None,
            trace: None,
            metrics: None,
        }
    }

    /// Attaches a snapshot writer for per-iteration debug artifacts.
    pub fn with_snapshots(mut self, writer: SnapshotWriter) -> Self {
        self.snapshots = Some(writer);
        self
    }

    /// Attaches a decision trace recorder.
    pub fn with_trace(mut self, recorder: TraceRecorder) -> Self {
        self.trace = Some(recorder);
        self
    }

    /// Attaches a shared metrics registry, updated once per step.
    pub fn with_metrics(mut self, registry: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(registry);
        self
    }

    /// Returns the counters accumulated so far.
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Returns the session's color classifier.
    pub fn classifier(&self) -> &ColorClassifier {
        &self.classifier
    }

    /// Returns the cell id the background color was assigned.
    pub fn background_id(&self) -> CellId {
        self.background_id
    }

    /// Returns how candidates are evaluated.
    pub fn eval_mode(&self) -> EvalMode {
        self.eval
    }

    /// Returns the name of the scoring strategy in use.
    pub fn strategy(&self) -> &'static str {
        self.planner.strategy()
    }

    /// Runs one capture-decide-press iteration.
    pub fn step(&mut self) -> StepOutcome {
        let frame = match self.screen.capture() {
            Ok(frame) => frame,
            Err(CaptureError::Exhausted) => {
                tracing::info!("Frame source exhausted; stopping");
                return StepOutcome::Exhausted;
            }
            Err(e) => {
                self.stats.capture_failures += 1;
                tracing::warn!(
                    error = %e,
                    backoff_ms = self.timing.backoff_ms,
                    "Capture failed; backing off"
                );
                self.publish_metrics();
                return StepOutcome::Skipped;
            }
        };

        let grid = self.extractor.extract(&frame, &mut self.classifier);
        let masked = grid.mask(self.background_id);

        let (plan, dispatched) = match self.eval {
            EvalMode::Simulated => {
                let plan = self.planner.plan(&masked);
                let dispatched = self.dispatch(plan.action);
                (plan, dispatched)
            }
            EvalMode::Probe => self.probe_and_commit(&masked),
        };

        self.stats.iterations += 1;
        self.stats.record_decision(plan.action);
        self.stats.last_score = plan.score;
        let action = plan.action;

        tracing::debug!(
            iteration = self.stats.iterations,
            action = %action,
            score = plan.score,
            occupied = masked.occupied(),
            "Step complete"
        );

        if let Some(writer) = &self.snapshots {
            if let Err(e) =
                writer.save_iteration(self.stats.iterations, &frame, &grid, &self.classifier)
            {
                tracing::warn!(error = %e, "Snapshot failed");
            }
        }

        if let Some(recorder) = &mut self.trace {
            let step = TraceStep {
                iteration: self.stats.iterations,
                grid: masked,
                plan,
                dispatched,
            };
            if let Err(e) = recorder.record_step(step) {
                tracing::warn!(error = %e, "Trace write failed");
            }
        }

        self.publish_metrics();
        StepOutcome::Acted(action)
    }

    /// Runs one step and returns it with the pause to sleep before
    /// the next.
    ///
    /// An iteration that absorbed a capture or dispatch failure backs
    /// off in place of the fixed iteration delay.
    fn paced_step(&mut self) -> (StepOutcome, Duration) {
        let failures = self.stats.capture_failures + self.stats.dispatch_failures;
        let outcome = self.step();

        let absorbed = self.stats.capture_failures + self.stats.dispatch_failures > failures;
        let pause = if absorbed {
            self.timing.backoff()
        } else {
            self.timing.iteration_delay()
        };
        (outcome, pause)
    }

    /// Runs at most `iterations` steps, stopping early if the frame
    /// source runs dry.
    pub fn run_for(&mut self, iterations: u64) -> SessionStats {
        for _ in 0..iterations {
            let (outcome, pause) = self.paced_step();
            if outcome == StepOutcome::Exhausted {
                break;
            }
            std::thread::sleep(pause);
        }
        self.finish()
    }

    /// Runs until `stop` is set or the frame source runs dry.
    pub fn run(&mut self, stop: &AtomicBool) -> SessionStats {
        while !stop.load(Ordering::Relaxed) {
            let (outcome, pause) = self.paced_step();
            if outcome == StepOutcome::Exhausted {
                break;
            }
            std::thread::sleep(pause);
        }
        self.finish()
    }

    /// Sends the key bound to `action`, absorbing failures.
    fn dispatch(&mut self, action: Action) -> Option<char> {
        let key = self.bindings.key_for(action);
        match self.driver.tap(key) {
            Ok(()) => {
                tracing::debug!(action = %action, key = %key, "Dispatched key");
                Some(key)
            }
            Err(e) => {
                self.stats.dispatch_failures += 1;
                tracing::warn!(action = %action, error = %e, "Dispatch failed");
                None
            }
        }
    }

    /// Evaluates candidates by pressing them for real.
    ///
    /// Every successful probe leaves its press on the board, so the
    /// board already reflects the last probed action when the winner
    /// is known. The winner is only pressed again if some other
    /// probe landed after it.
    fn probe_and_commit(&mut self, current: &Grid) -> (Plan, Option<char>) {
        let mut candidates = Vec::with_capacity(Action::ALL.len());
        let mut last_probed = None;

        for action in Action::ALL {
            let score = match self.probe_candidate(action) {
                Some(score) => {
                    last_probed = Some(action);
                    score
                }
                // Probe failed; fall back to the predicted outcome
                None => self.planner.score(&simulate::apply(current, action)),
            };
            candidates.push(CandidateScore { action, score });
        }

        let mut best = candidates[0];
        for &candidate in &candidates[1..] {
            if candidate.score > best.score {
                best = candidate;
            }
        }

        let dispatched = if last_probed == Some(best.action) {
            Some(self.bindings.key_for(best.action))
        } else {
            self.dispatch(best.action)
        };

        (
            Plan {
                action: best.action,
                score: best.score,
                candidates,
            },
            dispatched,
        )
    }

    /// Presses one candidate and scores the board it produces.
    fn probe_candidate(&mut self, action: Action) -> Option<f64> {
        self.dispatch(action)?;
        std::thread::sleep(self.timing.probe_delay());

        match self.screen.capture() {
            Ok(frame) => {
                let grid = self
                    .extractor
                    .extract(&frame, &mut self.classifier)
                    .mask(self.background_id);
                Some(self.planner.score(&grid))
            }
            Err(e) => {
                self.stats.capture_failures += 1;
                tracing::warn!(action = %action, error = %e, "Probe capture failed");
                None
            }
        }
    }

    fn publish_metrics(&self) {
        if let Some(registry) = &self.metrics {
            registry.update(&MetricsSnapshot::from_session(
                &self.stats,
                self.classifier.len(),
            ));
        }
    }

    fn finish(&self) -> SessionStats {
        tracing::info!(
            iterations = self.stats.iterations,
            decisions = self.stats.decisions_total(),
            capture_failures = self.stats.capture_failures,
            dispatch_failures = self.stats.dispatch_failures,
            colors_known = self.classifier.len(),
            "Session finished"
        );
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Frame, ScriptedScreen};
    use crate::input::RecordingDriver;

    const BG: (u8, u8, u8) = (10, 10, 10);
    const RED: (u8, u8, u8) = (200, 30, 30);

    /// 3x3 board on 6x6 frames unless a test says otherwise.
    fn test_config() -> AgentConfig {
        let mut config = AgentConfig::default();
        config.board.rows = 3;
        config.board.cols = 3;
        config.board.background = BG;
        config.timing = TimingConfig {
            iteration_delay_ms: 0,
            backoff_ms: 0,
            key_hold_ms: 0,
            probe_delay_ms: 0,
        };
        config
    }

    fn solid_frame(sequence: u64) -> Frame {
        Frame::filled(6, 6, BG, sequence)
    }

    /// Paints RED at the center of every non-zero cell, 2x2 pixels
    /// per cell.
    fn painted_frame(rows: &[&[u32]], sequence: u64) -> Frame {
        let width = (rows[0].len() * 2) as u32;
        let height = (rows.len() * 2) as u32;
        let mut frame = Frame::filled(width, height, BG, sequence);
        for (r, row) in rows.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    frame.set_pixel((c * 2 + 1) as u32, (r * 2 + 1) as u32, RED);
                }
            }
        }
        frame
    }

    #[test]
    fn test_background_masks_to_empty_board() {
        let screen = ScriptedScreen::from_frames([solid_frame(1)]);
        let mut session = Session::new(&test_config(), screen, RecordingDriver::new());

        assert_eq!(session.background_id(), 1);
        assert_eq!(session.step(), StepOutcome::Acted(Action::Left));
        assert_eq!(session.stats().last_score, 0.0);
        assert_eq!(session.stats().decisions_left, 1);
    }

    #[test]
    fn test_run_ends_when_frames_run_out() {
        let frames = (1..=3).map(solid_frame);
        let screen = ScriptedScreen::from_frames(frames);
        let mut session = Session::new(&test_config(), screen, RecordingDriver::new());

        let stats = session.run_for(10);
        assert_eq!(stats.iterations, 3);
        assert_eq!(stats.decisions_total(), 3);
    }

    #[test]
    fn test_capture_failure_absorbed() {
        let mut screen = ScriptedScreen::new();
        screen.push_frame(solid_frame(1));
        screen.push_failure("grab timed out");
        screen.push_frame(solid_frame(2));
        let mut session = Session::new(&test_config(), screen, RecordingDriver::new());

        let stats = session.run_for(10);
        assert_eq!(stats.iterations, 2);
        assert_eq!(stats.capture_failures, 1);
    }

    #[test]
    fn test_dispatch_failure_absorbed() {
        let screen = ScriptedScreen::from_frames([solid_frame(1), solid_frame(2)]);
        let mut driver = RecordingDriver::new();
        driver.push_failure("focus lost");
        let mut session = Session::new(&test_config(), screen, driver);

        session.step();
        session.step();

        let stats = session.stats();
        // The failed press still counts as a decision
        assert_eq!(stats.iterations, 2);
        assert_eq!(stats.dispatch_failures, 1);
        assert_eq!(stats.decisions_left, 2);
    }

    #[test]
    fn test_skipped_step_backs_off_instead_of_delaying() {
        let mut config = test_config();
        config.timing.iteration_delay_ms = 40;
        config.timing.backoff_ms = 5;

        let mut screen = ScriptedScreen::new();
        screen.push_failure("grab timed out");
        screen.push_frame(solid_frame(1));
        let mut session = Session::new(&config, screen, RecordingDriver::new());

        let (outcome, pause) = session.paced_step();
        assert_eq!(outcome, StepOutcome::Skipped);
        assert_eq!(pause, Duration::from_millis(5));

        let (outcome, pause) = session.paced_step();
        assert_eq!(outcome, StepOutcome::Acted(Action::Left));
        assert_eq!(pause, Duration::from_millis(40));
    }

    #[test]
    fn test_failed_dispatch_backs_off_instead_of_delaying() {
        let mut config = test_config();
        config.timing.iteration_delay_ms = 40;
        config.timing.backoff_ms = 5;

        let screen = ScriptedScreen::from_frames([solid_frame(1)]);
        let mut driver = RecordingDriver::new();
        driver.push_failure("focus lost");
        let mut session = Session::new(&config, screen, driver);

        let (outcome, pause) = session.paced_step();
        assert_eq!(outcome, StepOutcome::Acted(Action::Left));
        assert_eq!(pause, Duration::from_millis(5));
    }

    #[test]
    fn test_planning_flows_from_pixels_to_key() {
        // Sliding left merges the painted cells into one big group
        let board: &[&[u32]] = &[
            &[0, 0, 1, 1],
            &[1, 1, 0, 0],
            &[1, 1, 0, 1],
        ];
        let mut config = test_config();
        config.board.cols = 4;

        let screen = ScriptedScreen::from_frames([painted_frame(board, 1)]);
        let mut session = Session::new(&config, screen, RecordingDriver::new());

        assert_eq!(session.step(), StepOutcome::Acted(Action::Left));
        assert_eq!(session.stats().last_score, 60.0);
    }

    #[test]
    fn test_probe_redispatches_early_winner() {
        let mut config = test_config();
        config.score.live_probe = true;

        let winning_probe: &[&[u32]] = &[
            &[1, 1, 0],
            &[1, 1, 0],
            &[0, 0, 0],
        ];
        let screen = ScriptedScreen::from_frames([
            solid_frame(1),                 // board before deciding
            painted_frame(winning_probe, 2), // after probing left
            solid_frame(3),                 // after probing right
            solid_frame(4),                 // after probing down
            solid_frame(5),                 // after probing rotate
        ]);
        let mut session = Session::new(&config, screen, RecordingDriver::new());

        assert_eq!(session.eval_mode(), EvalMode::Probe);
        assert_eq!(session.step(), StepOutcome::Acted(Action::Left));

        // Four probes, then the winner again since rotate probed last
        assert_eq!(session.stats().last_score, 40.0);
        assert_eq!(session_taps(&session), &['a', 'd', 's', 'w', 'a']);
    }

    #[test]
    fn test_probe_skips_redispatch_when_winner_probed_last() {
        let mut config = test_config();
        config.score.live_probe = true;

        let winning_probe: &[&[u32]] = &[
            &[1, 1, 0],
            &[1, 1, 0],
            &[0, 0, 0],
        ];
        let screen = ScriptedScreen::from_frames([
            solid_frame(1),
            solid_frame(2),
            solid_frame(3),
            solid_frame(4),
            painted_frame(winning_probe, 5), // rotate probe wins
        ]);
        let mut session = Session::new(&config, screen, RecordingDriver::new());

        assert_eq!(session.step(), StepOutcome::Acted(Action::Rotate));
        assert_eq!(session.stats().decisions_rotate, 1);
        // The winning rotate press is already on the board
        assert_eq!(session_taps(&session), &['a', 'd', 's', 'w']);
    }

    #[test]
    fn test_trace_records_every_step() {
        use crate::agent::{read_trace, TraceHeader};

        let path = std::env::temp_dir().join(format!(
            "block-pilot-session-trace-{}.jsonl",
            std::process::id()
        ));
        let header = TraceHeader {
            version: crate::VERSION.to_string(),
            started_at: chrono::Utc::now(),
            strategy: "clusters".to_string(),
            rows: 3,
            cols: 3,
        };
        let recorder = TraceRecorder::create(&path, header).unwrap();

        let screen = ScriptedScreen::from_frames([solid_frame(1), solid_frame(2)]);
        let mut session =
            Session::new(&test_config(), screen, RecordingDriver::new()).with_trace(recorder);
        session.run_for(10);
        drop(session);

        let (read_header, steps) = read_trace(&path).unwrap();
        assert_eq!(read_header.strategy, "clusters");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].iteration, 1);
        assert_eq!(steps[0].plan.action, Action::Left);
        assert_eq!(steps[0].dispatched, Some('a'));
        // The recorded board is the masked one
        assert_eq!(steps[0].grid.occupied(), 0);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_metrics_follow_steps() {
        let registry = Arc::new(MetricsRegistry::new().unwrap());
        let screen = ScriptedScreen::from_frames([solid_frame(1), solid_frame(2)]);
        let mut session = Session::new(&test_config(), screen, RecordingDriver::new())
            .with_metrics(Arc::clone(&registry));

        session.run_for(10);

        let output = registry.encode().unwrap();
        assert!(output.contains("block_pilot_iterations_total 2"));
        assert!(output.contains("block_pilot_decisions_left_total 2"));
        assert!(output.contains("block_pilot_colors_known 1"));
    }

    fn session_taps<S: FrameSource>(session: &Session<S, RecordingDriver>) -> &[char] {
        session.driver.taps()
    }
}
