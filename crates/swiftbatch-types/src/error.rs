//! Error taxonomy for pipeline runs.
//!
//! Source open/read failures are fatal and abort the run. Stage failures
//! are recoverable: the engine converts each into a disposition
//! (processing failures additionally abort under strict mode). Stage
//! errors wrap an opaque `anyhow::Error` so implementations can fail
//! with arbitrary causes.

use thiserror::Error;

/// Failure at the data source boundary.
///
/// `Open` and `Read` abort the run; `Close` is logged and ignored by
/// policy (a run that read everything still finishes).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open data source: {0}")]
    Open(#[source] anyhow::Error),
    #[error("failed to read next record: {0}")]
    Read(#[source] anyhow::Error),
    #[error("failed to close data source: {0}")]
    Close(#[source] anyhow::Error),
}

/// A filter implementation failed at runtime. The record is classified
/// filtered, as if the filter had rejected it.
#[derive(Debug, Error)]
#[error("record filter failed: {0}")]
pub struct FilterError(#[from] pub anyhow::Error);

/// The mapper failed on a record. The record is classified ignored.
#[derive(Debug, Error)]
#[error("record mapping failed: {0}")]
pub struct MappingError(#[from] pub anyhow::Error);

/// A validator chain failed at runtime (as opposed to returning
/// validation errors). Converted into a single synthetic validation
/// error; the record is classified rejected.
#[derive(Debug, Error)]
#[error("record validation failed: {0}")]
pub struct ValidationFailure(#[from] pub anyhow::Error);

/// A processor failed on a record. The record is classified error; under
/// strict mode the whole run aborts.
#[derive(Debug, Error)]
#[error("record processing failed: {0}")]
pub struct ProcessingError(#[from] pub anyhow::Error);

/// A destination queue was disconnected: its consumer dropped the
/// receiving end, so the record cannot be delivered.
#[derive(Debug, Error)]
#[error("destination queue {queue} is disconnected")]
pub struct DispatchError {
    /// Index of the disconnected queue in the destination list.
    pub queue: usize,
}
