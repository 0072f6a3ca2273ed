//! Prometheus metrics exporter for agent monitoring.
//!
//! This module provides observability into the running agent by
//! exposing metrics in Prometheus format via an HTTP endpoint.
//!
//! # Metrics Exposed
//!
//! ## Loop Metrics
//! - `block_pilot_iterations_total` - Decision loop iterations completed
//! - `block_pilot_capture_failures_total` - Frame captures that failed
//! - `block_pilot_dispatch_failures_total` - Key dispatches that failed
//!
//! ## Decision Metrics
//! - `block_pilot_decisions_left_total` - Times left was chosen
//! - `block_pilot_decisions_right_total` - Times right was chosen
//! - `block_pilot_decisions_down_total` - Times down was chosen
//! - `block_pilot_decisions_rotate_total` - Times rotate was chosen
//! - `block_pilot_last_score` - Score of the most recent winning candidate
//!
//! ## Board Inference Metrics
//! - `block_pilot_colors_known` - Colors registered by the classifier
//!
//! # Example
//!
//! ```no_run
//! use block_pilot::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! // Create a metrics registry
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! // Update metrics from session state
//! let snapshot = MetricsSnapshot {
//!     iterations: 100,
//!     capture_failures: 2,
//!     dispatch_failures: 0,
//!     decisions_left: 40,
//!     decisions_right: 31,
//!     decisions_down: 17,
//!     decisions_rotate: 12,
//!     last_score: 40.0,
//!     colors_known: 5,
//! };
//!
//! registry.update(&snapshot);
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, ServerError};
