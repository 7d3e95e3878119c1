//! Outcome classification: the six-way disposition of a processed record
//! and the run status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Final classification of one record's trip through the pipeline.
///
/// Exactly one disposition is assigned per record per run; classification
/// stops at the first stage that takes the record out of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Passed every stage.
    Success,
    /// Rejected by the filter chain (or the chain failed).
    Filtered,
    /// Consumed by the skip budget before any stage ran.
    Skipped,
    /// The mapper failed on it.
    Ignored,
    /// The validator chain found errors (or failed).
    Rejected,
    /// The processor chain failed on it.
    Error,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Filtered => "filtered",
            Self::Skipped => "skipped",
            Self::Ignored => "ignored",
            Self::Rejected => "rejected",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Business stages a record passes through, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Filter,
    Map,
    Validate,
    Process,
}

impl Stage {
    /// Disposition assigned to a record when this stage fails on it.
    pub fn failure_disposition(self) -> Disposition {
        match self {
            Self::Filter => Disposition::Filtered,
            Self::Map => Disposition::Ignored,
            Self::Validate => Disposition::Rejected,
            Self::Process => Disposition::Error,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Filter => "filter",
            Self::Map => "map",
            Self::Validate => "validate",
            Self::Process => "process",
        };
        f.write_str(s)
    }
}

/// Lifecycle of a pipeline run.
///
/// `Initializing → Started → {Finished | Aborted}`. Terminal states are
/// final; further transitions are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Initializing,
    Started,
    Finished,
    Aborted,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Aborted)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Initializing => "initializing",
            Self::Started => "started",
            Self::Finished => "finished",
            Self::Aborted => "aborted",
        };
        f.write_str(s)
    }
}
