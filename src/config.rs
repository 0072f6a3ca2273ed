//! Agent configuration.
//!
//! All knobs live in one TOML file so a new game variant needs a new
//! config, not a rebuild. Every section has working defaults; an
//! absent file means "demo-sized board, cluster strategy, no debug
//! output".

use crate::capture::ScreenRegion;
use crate::input::KeyBindings;
use crate::score::StrategyKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Board shape and appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of board rows.
    pub rows: usize,
    /// Number of board columns.
    pub cols: usize,
    /// Exact RGB color of an empty cell, sampled at a cell center.
    pub background: (u8, u8, u8),
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: 12,
            cols: 6,
            background: (0, 0, 0),
        }
    }
}

impl BoardConfig {
    /// Validates the board shape.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 || self.rows > 64 || self.cols > 64 {
            return Err(ConfigError::InvalidBoardShape);
        }
        Ok(())
    }
}

/// Where to find the game on screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Substring matched against window titles to find the game.
    pub window_title: String,
    /// Explicit capture rectangle; overrides window lookup when set.
    pub region: Option<ScreenRegion>,
}

/// Delays between the agent's moves and retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Pause between loop iterations in milliseconds.
    pub iteration_delay_ms: u64,
    /// Pause after a transient capture or dispatch failure.
    pub backoff_ms: u64,
    /// How long a synthesized key stays held down.
    pub key_hold_ms: u64,
    /// Wait after a probe press before re-capturing the board.
    pub probe_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            iteration_delay_ms: 100,
            backoff_ms: 500,
            key_hold_ms: 50,
            probe_delay_ms: 120,
        }
    }
}

impl TimingConfig {
    /// Pause between loop iterations.
    pub fn iteration_delay(&self) -> Duration {
        Duration::from_millis(self.iteration_delay_ms)
    }

    /// Pause after a transient failure.
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    /// How long a synthesized key stays held down.
    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }

    /// Wait between a probe press and the follow-up capture.
    pub fn probe_delay(&self) -> Duration {
        Duration::from_millis(self.probe_delay_ms)
    }
}

/// How boards are scored and candidates evaluated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Scoring strategy.
    pub strategy: StrategyKind,
    /// Evaluate candidates by pressing keys and re-reading the real
    /// board instead of simulating. Slower and intrusive; off by
    /// default.
    pub live_probe: bool,
}

/// Optional debug artifacts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Directory for frame and board snapshots; unset disables them.
    pub snapshot_dir: Option<PathBuf>,
    /// JSONL decision trace path; unset disables tracing to file.
    pub trace_path: Option<PathBuf>,
}

/// Metrics exporter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Metrics server port (0 to disable).
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { port: 9090 }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Board rows or columns outside the supported range.
    #[error("invalid board shape (rows and cols must be 1-64)")]
    InvalidBoardShape,
    /// An explicit capture region with zero area.
    #[error("capture region must be non-empty")]
    InvalidRegion,
    /// Two actions bound to the same key.
    #[error("key bindings must be distinct")]
    DuplicateBindings,
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub score: ScoreConfig,
    #[serde(default)]
    pub input: KeyBindings,
    #[serde(default)]
    pub debug: DebugConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl AgentConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: AgentConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()?;

        if let Some(region) = self.capture.region {
            if !region.is_non_empty() {
                return Err(ConfigError::InvalidRegion);
            }
        }

        let keys = [
            self.input.left,
            self.input.right,
            self.input.down,
            self.input.rotate,
        ];
        for (i, key) in keys.iter().enumerate() {
            if keys[i + 1..].contains(key) {
                return Err(ConfigError::DuplicateBindings);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.board.rows, 12);
        assert_eq!(config.board.cols, 6);
    }

    #[test]
    fn test_zero_rows_invalid() {
        let mut config = AgentConfig::default();
        config.board.rows = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBoardShape)
        ));
    }

    #[test]
    fn test_empty_region_invalid() {
        let mut config = AgentConfig::default();
        config.capture.region = Some(ScreenRegion::new(0, 0, 100, 0));
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRegion)));
    }

    #[test]
    fn test_duplicate_bindings_invalid() {
        let mut config = AgentConfig::default();
        config.input.rotate = 'a';
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateBindings)
        ));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AgentConfig = toml::from_str(
            r#"
            [board]
            rows = 8
            cols = 4
            background = [18, 18, 24]

            [capture]
            window_title = "Blocks"

            [score]
            strategy = "stack"
            live_probe = true
            "#,
        )
        .unwrap();

        assert_eq!(config.board.rows, 8);
        assert_eq!(config.board.background, (18, 18, 24));
        assert_eq!(config.capture.window_title, "Blocks");
        assert_eq!(config.score.strategy, StrategyKind::Stack);
        assert!(config.score.live_probe);
        // Untouched sections fall back to defaults
        assert_eq!(config.timing.iteration_delay_ms, 100);
        assert_eq!(config.input.left, 'a');
    }
}
