//! Record model: the unit of work flowing through a pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable per-record metadata, assigned by the source at read time.
///
/// Record numbers are 1-based and strictly increasing in read order
/// within a run. The header never changes once assigned, even when the
/// payload is replaced by a mapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    /// Position of the record in read order.
    pub number: u64,
    /// Name of the data source that produced the record.
    pub source: String,
    /// When the record was read.
    pub read_at: DateTime<Utc>,
}

impl Header {
    pub fn new(number: u64, source: impl Into<String>, read_at: DateTime<Utc>) -> Self {
        Self {
            number,
            source: source.into(),
            read_at,
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record #{} from '{}'", self.number, self.source)
    }
}

/// One unit of work: a header plus a payload, or the poison sentinel.
///
/// `Poison` is an in-band shutdown signal between a producer and its
/// consumers. It never enters a business stage; dispatchers broadcast it
/// to every destination queue so each consumer sees the termination
/// signal exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record<P> {
    Normal { header: Header, payload: P },
    Poison,
}

impl<P> Record<P> {
    pub fn new(header: Header, payload: P) -> Self {
        Self::Normal { header, payload }
    }

    pub fn is_poison(&self) -> bool {
        matches!(self, Self::Poison)
    }

    pub fn header(&self) -> Option<&Header> {
        match self {
            Self::Normal { header, .. } => Some(header),
            Self::Poison => None,
        }
    }

    pub fn payload(&self) -> Option<&P> {
        match self {
            Self::Normal { payload, .. } => Some(payload),
            Self::Poison => None,
        }
    }

    pub fn into_payload(self) -> Option<P> {
        match self {
            Self::Normal { payload, .. } => Some(payload),
            Self::Poison => None,
        }
    }

    /// Replace the payload, carrying the header over untouched.
    /// A poison record stays poison.
    pub fn map_payload<Q>(self, f: impl FnOnce(P) -> Q) -> Record<Q> {
        match self {
            Self::Normal { header, payload } => Record::Normal {
                header,
                payload: f(payload),
            },
            Self::Poison => Record::Poison,
        }
    }

    /// Build a new record with the same header and the given payload.
    /// A poison record stays poison.
    pub fn with_payload<Q>(&self, payload: Q) -> Record<Q> {
        match self {
            Self::Normal { header, .. } => Record::Normal {
                header: header.clone(),
                payload,
            },
            Self::Poison => Record::Poison,
        }
    }
}
