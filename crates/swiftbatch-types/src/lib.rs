//! Shared data types for swiftbatch pipelines: the record model, outcome
//! classification, and the error taxonomy used across the engine and the
//! record dispatcher.

pub mod disposition;
pub mod error;
pub mod record;
pub mod validation;

pub use disposition::{Disposition, RunStatus, Stage};
pub use error::{
    DispatchError, FilterError, MappingError, ProcessingError, SourceError, ValidationFailure,
};
pub use record::{Header, Record};
pub use validation::ValidationError;
