//! Decision trace recording and replay.
//!
//! A trace is a JSONL file: one header line describing the run, then
//! one line per decision with the board the planner saw, every
//! candidate score, and the key that was sent. Traces make a session
//! reproducible after the fact without the game.

use crate::board::Grid;
use crate::decide::Plan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while recording or reading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be created or opened.
    #[error("failed to open trace file: {0}")]
    Open(String),
    /// A record could not be serialized or written.
    #[error("failed to write trace record: {0}")]
    Write(String),
    /// A line of an existing trace is not a valid record.
    #[error("failed to parse trace line {line}: {reason}")]
    Parse {
        /// One-based line number within the file.
        line: usize,
        /// What the parser reported.
        reason: String,
    },
    /// The file's first record is not a header.
    #[error("trace file does not start with a header")]
    MissingHeader,
}

/// First line of every trace file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHeader {
    /// Crate version that produced the trace.
    pub version: String,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// Scoring strategy in use.
    pub strategy: String,
    /// Board rows.
    pub rows: usize,
    /// Board columns.
    pub cols: usize,
}

impl TraceHeader {
    /// Builds a header for a session starting now.
    pub fn new(strategy: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            version: crate::VERSION.to_string(),
            started_at: Utc::now(),
            strategy: strategy.into(),
            rows,
            cols,
        }
    }
}

/// One decision, as the planner saw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    /// Loop iteration this decision belongs to.
    pub iteration: u64,
    /// Board after background masking.
    pub grid: Grid,
    /// Chosen action and all candidate scores.
    pub plan: Plan,
    /// Key actually sent, or `None` if dispatch failed.
    pub dispatched: Option<char>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum TraceRecord {
    Header(TraceHeader),
    Step(TraceStep),
}

/// Appends decision records to a JSONL trace file.
#[derive(Debug)]
pub struct TraceRecorder {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl TraceRecorder {
    /// Creates the trace file and writes its header line.
    pub fn create(path: impl Into<PathBuf>, header: TraceHeader) -> Result<Self, TraceError> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| TraceError::Open(e.to_string()))?;
        let mut recorder = Self {
            writer: BufWriter::new(file),
            path,
        };
        recorder.write_record(&TraceRecord::Header(header))?;
        Ok(recorder)
    }

    /// Appends one decision record.
    pub fn record_step(&mut self, step: TraceStep) -> Result<(), TraceError> {
        self.write_record(&TraceRecord::Step(step))
    }

    /// Returns the path being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_record(&mut self, record: &TraceRecord) -> Result<(), TraceError> {
        let line =
            serde_json::to_string(record).map_err(|e| TraceError::Write(e.to_string()))?;
        writeln!(self.writer, "{line}").map_err(|e| TraceError::Write(e.to_string()))?;
        // Flush per record so a killed session still leaves a usable trace
        self.writer
            .flush()
            .map_err(|e| TraceError::Write(e.to_string()))
    }
}

/// Reads a whole trace back for replay or analysis.
pub fn read_trace(path: impl AsRef<Path>) -> Result<(TraceHeader, Vec<TraceStep>), TraceError> {
    let file = File::open(path.as_ref()).map_err(|e| TraceError::Open(e.to_string()))?;
    let reader = BufReader::new(file);

    let mut header = None;
    let mut steps = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| TraceError::Parse {
            line: index + 1,
            reason: e.to_string(),
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let record: TraceRecord =
            serde_json::from_str(&line).map_err(|e| TraceError::Parse {
                line: index + 1,
                reason: e.to_string(),
            })?;
        match record {
            TraceRecord::Header(h) if header.is_none() => header = Some(h),
            TraceRecord::Header(_) => {
                return Err(TraceError::Parse {
                    line: index + 1,
                    reason: "second header record".to_string(),
                })
            }
            TraceRecord::Step(step) => {
                if header.is_none() {
                    return Err(TraceError::MissingHeader);
                }
                steps.push(step);
            }
        }
    }

    match header {
        Some(header) => Ok((header, steps)),
        None => Err(TraceError::MissingHeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decide::{Action, CandidateScore};

    fn sample_header() -> TraceHeader {
        TraceHeader {
            version: "0.1.0".to_string(),
            started_at: Utc::now(),
            strategy: "clusters".to_string(),
            rows: 2,
            cols: 3,
        }
    }

    fn sample_step(iteration: u64) -> TraceStep {
        TraceStep {
            iteration,
            grid: Grid::from_rows(&[&[0, 2, 0], &[2, 2, 0]]).unwrap(),
            plan: Plan {
                action: Action::Left,
                score: 40.0,
                candidates: vec![
                    CandidateScore {
                        action: Action::Left,
                        score: 40.0,
                    },
                    CandidateScore {
                        action: Action::Right,
                        score: 0.0,
                    },
                    CandidateScore {
                        action: Action::Down,
                        score: 0.0,
                    },
                    CandidateScore {
                        action: Action::Rotate,
                        score: 0.0,
                    },
                ],
            },
            dispatched: Some('a'),
        }
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("block-pilot-{}-{}.jsonl", name, std::process::id()))
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let path = scratch_path("trace-roundtrip");
        let header = sample_header();

        let mut recorder = TraceRecorder::create(&path, header.clone()).unwrap();
        recorder.record_step(sample_step(1)).unwrap();
        recorder.record_step(sample_step(2)).unwrap();
        drop(recorder);

        let (read_header, steps) = read_trace(&path).unwrap();
        assert_eq!(read_header, header);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], sample_step(1));
        assert_eq!(steps[1].iteration, 2);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_headerless_file_rejected() {
        let path = scratch_path("trace-headerless");
        let step_line =
            serde_json::to_string(&TraceRecord::Step(sample_step(1))).unwrap();
        std::fs::write(&path, format!("{step_line}\n")).unwrap();

        assert!(matches!(read_trace(&path), Err(TraceError::MissingHeader)));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_garbage_line_reports_position() {
        let path = scratch_path("trace-garbage");
        let mut recorder = TraceRecorder::create(&path, sample_header()).unwrap();
        recorder.record_step(sample_step(1)).unwrap();
        drop(recorder);

        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("not json\n");
        std::fs::write(&path, content).unwrap();

        match read_trace(&path) {
            Err(TraceError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
        std::fs::remove_file(&path).unwrap();
    }
}
