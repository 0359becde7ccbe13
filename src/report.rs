//! Results flowing from workers to the aggregator and out to the user.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Where a record came from: the work unit and the 1-based input line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Source {
    pub unit: usize,
    pub line: usize,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {} line {}", self.unit, self.line)
    }
}

/// One plausible decoding of one input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub source: Source,
    pub key: u8,
    pub ciphertext: String,
    pub plaintext: String,
}

impl ResultRecord {
    pub fn key_char(&self) -> char {
        self.key as char
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {:?}, {:?})",
            self.source,
            self.key,
            self.key_char(),
            self.plaintext
        )
    }
}

/// Everything one worker found in its unit, in line order then key order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultBatch {
    pub unit: usize,
    pub records: Vec<ResultRecord>,
    /// Non-empty lines tried against the full key space
    pub lines_scanned: usize,
    /// Lines dropped because they were not valid hex
    pub lines_skipped: usize,
}

impl ResultBatch {
    pub fn new(unit: usize) -> Self {
        Self {
            unit,
            ..Default::default()
        }
    }
}

/// Why a worker produced no batch
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    #[error("{0}")]
    Error(String),

    #[error("worker panicked: {0}")]
    Panicked(String),

    #[error("could not start worker: {0}")]
    Spawn(String),

    #[error("no batch before the deadline")]
    TimedOut,
}

/// A work unit whose worker terminated without delivering results
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("unit {unit} failed: {reason}")]
pub struct WorkerFailure {
    pub unit: usize,
    pub reason: FailureReason,
}

impl WorkerFailure {
    pub fn new(unit: usize, reason: FailureReason) -> Self {
        Self { unit, reason }
    }
}

/// Final output of a run: batches concatenated in arrival order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Number of work units (and workers) in the run
    pub units: usize,
    pub records: Vec<ResultRecord>,
    pub failures: Vec<WorkerFailure>,
    pub lines_scanned: usize,
    pub lines_skipped: usize,
    /// Unit ids in the order their batches arrived
    pub arrival_order: Vec<usize>,
}

impl Report {
    pub fn new(units: usize) -> Self {
        Self {
            units,
            ..Default::default()
        }
    }

    pub fn push_batch(&mut self, batch: ResultBatch) {
        self.arrival_order.push(batch.unit);
        self.lines_scanned += batch.lines_scanned;
        self.lines_skipped += batch.lines_skipped;
        self.records.extend(batch.records);
    }

    pub fn push_failure(&mut self, failure: WorkerFailure) {
        self.failures.push(failure);
    }

    /// True when every worker delivered a batch
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        for failure in &self.failures {
            writeln!(f, "!! {}", failure)?;
        }
        if self.records.is_empty() && self.failures.is_empty() {
            writeln!(f, "no plausible decodings found")?;
        }
        Ok(())
    }
}
