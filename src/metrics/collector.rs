//! Prometheus counters and gauges for the decision loop.

use crate::agent::SessionStats;
use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Metric registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of session state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Loop iterations completed.
    pub iterations: u64,
    /// Captures that failed and were retried.
    pub capture_failures: u64,
    /// Key dispatches that failed.
    pub dispatch_failures: u64,
    /// Times the planner chose left.
    pub decisions_left: u64,
    /// Times the planner chose right.
    pub decisions_right: u64,
    /// Times the planner chose down.
    pub decisions_down: u64,
    /// Times the planner chose rotate.
    pub decisions_rotate: u64,
    /// Score of the most recent winning candidate.
    pub last_score: f64,
    /// Colors the classifier has registered this session.
    pub colors_known: usize,
}

impl MetricsSnapshot {
    /// Creates a snapshot from the current session state.
    pub fn from_session(stats: &SessionStats, colors_known: usize) -> Self {
        Self {
            iterations: stats.iterations,
            capture_failures: stats.capture_failures,
            dispatch_failures: stats.dispatch_failures,
            decisions_left: stats.decisions_left,
            decisions_right: stats.decisions_right,
            decisions_down: stats.decisions_down,
            decisions_rotate: stats.decisions_rotate,
            last_score: stats.last_score,
            colors_known,
        }
    }
}

/// Prometheus metrics registry for agent monitoring.
///
/// All metrics are internally synchronized, so one shared registry
/// can be updated from the session thread while the exporter reads
/// it.
pub struct MetricsRegistry {
    registry: Registry,

    // Loop metrics
    iterations_total: IntCounter,
    capture_failures_total: IntCounter,
    dispatch_failures_total: IntCounter,

    // Decision metrics
    decisions_left_total: IntCounter,
    decisions_right_total: IntCounter,
    decisions_down_total: IntCounter,
    decisions_rotate_total: IntCounter,
    last_score: Gauge,

    // Board inference metrics
    colors_known: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all agent metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        // Loop metrics
        let iterations_total = IntCounter::new(
            "block_pilot_iterations_total",
            "Total decision loop iterations completed",
        )?;
        let capture_failures_total = IntCounter::new(
            "block_pilot_capture_failures_total",
            "Total frame captures that failed",
        )?;
        let dispatch_failures_total = IntCounter::new(
            "block_pilot_dispatch_failures_total",
            "Total key dispatches that failed",
        )?;

        // Decision metrics
        let decisions_left_total = IntCounter::new(
            "block_pilot_decisions_left_total",
            "Times the planner chose the left action",
        )?;
        let decisions_right_total = IntCounter::new(
            "block_pilot_decisions_right_total",
            "Times the planner chose the right action",
        )?;
        let decisions_down_total = IntCounter::new(
            "block_pilot_decisions_down_total",
            "Times the planner chose the down action",
        )?;
        let decisions_rotate_total = IntCounter::new(
            "block_pilot_decisions_rotate_total",
            "Times the planner chose the rotate action",
        )?;
        let last_score = Gauge::new(
            "block_pilot_last_score",
            "Score of the most recent winning candidate",
        )?;

        // Board inference metrics
        let colors_known = IntGauge::new(
            "block_pilot_colors_known",
            "Colors registered by the classifier this session",
        )?;

        // Register everything with the scrape registry
        registry.register(Box::new(iterations_total.clone()))?;
        registry.register(Box::new(capture_failures_total.clone()))?;
        registry.register(Box::new(dispatch_failures_total.clone()))?;
        registry.register(Box::new(decisions_left_total.clone()))?;
        registry.register(Box::new(decisions_right_total.clone()))?;
        registry.register(Box::new(decisions_down_total.clone()))?;
        registry.register(Box::new(decisions_rotate_total.clone()))?;
        registry.register(Box::new(last_score.clone()))?;
        registry.register(Box::new(colors_known.clone()))?;

        Ok(Self {
            registry,
            iterations_total,
            capture_failures_total,
            dispatch_failures_total,
            decisions_left_total,
            decisions_right_total,
            decisions_down_total,
            decisions_rotate_total,
            last_score,
            colors_known,
        })
    }

    /// Updates all metrics from a snapshot of session state.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward, so advance each by its difference
        advance(&self.iterations_total, snapshot.iterations);
        advance(&self.capture_failures_total, snapshot.capture_failures);
        advance(&self.dispatch_failures_total, snapshot.dispatch_failures);
        advance(&self.decisions_left_total, snapshot.decisions_left);
        advance(&self.decisions_right_total, snapshot.decisions_right);
        advance(&self.decisions_down_total, snapshot.decisions_down);
        advance(&self.decisions_rotate_total, snapshot.decisions_rotate);

        self.last_score.set(snapshot.last_score);
        self.colors_known.set(snapshot.colors_known as i64);
    }

    /// Returns the wrapped Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Renders every metric in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Raises a counter to `target` if it is behind.
fn advance(counter: &IntCounter, target: u64) {
    let current = counter.get();
    if target > current {
        counter.inc_by(target - current);
    }
}
