//! Listener fan-out: ordered lists of callback objects invoked at run
//! and stage boundaries.
//!
//! All methods have no-op defaults, so a listener implements only the
//! hooks it cares about. `before_*` hooks may substitute the record in
//! place (the header must be preserved) and are fallible: a failing hook
//! is classified exactly like a failure of the stage it decorates.
//! `after_*` and `on_exception` hooks are notifications only.

use std::collections::BTreeSet;

use swiftbatch_types::{
    FilterError, MappingError, ProcessingError, Record, ValidationError, ValidationFailure,
};

/// Run-level callbacks.
///
/// `after_end` fires on every exit path, including aborts.
/// `on_exception` fires for fatal source failures and for processing
/// failures.
pub trait JobListener {
    fn before_start(&self) {}

    fn on_exception(&self, _error: &dyn std::error::Error) {}

    fn after_end(&self) {}
}

/// Observes the source lifecycle: open, each read, close.
pub trait SourceListener<R> {
    fn before_open(&self) {}

    fn after_open(&self) {}

    fn before_read(&self) {}

    fn after_read(&self, _record: &Record<R>) {}

    fn before_close(&self) {}

    fn after_close(&self) {}
}

/// Decorates the filter stage.
pub trait FilterListener<R> {
    fn before_filter(&self, _record: &mut Record<R>) -> Result<(), FilterError> {
        Ok(())
    }

    /// Fires once per record with the chain's verdict.
    fn after_filter(&self, _record: &Record<R>, _filtered: bool) {}

    fn on_exception(&self, _record: &Record<R>, _error: &FilterError) {}
}

/// Decorates the map stage.
pub trait MapperListener<R, P> {
    fn before_map(&self, _record: &mut Record<R>) -> Result<(), MappingError> {
        Ok(())
    }

    fn after_map(&self, _mapped: &Record<P>) {}

    fn on_exception(&self, _record: &Record<R>, _error: &MappingError) {}
}

/// Decorates the validate stage.
pub trait ValidatorListener<P> {
    fn before_validate(&self, _record: &mut Record<P>) -> Result<(), ValidationFailure> {
        Ok(())
    }

    /// Fires once per record with the collected error set (empty when
    /// the record is valid).
    fn after_validate(&self, _record: &Record<P>, _errors: &BTreeSet<ValidationError>) {}

    fn on_exception(&self, _record: &Record<P>, _error: &ValidationFailure) {}
}

/// Decorates the process stage.
pub trait ProcessorListener<P> {
    fn before_process(&self, _record: &mut Record<P>) -> Result<(), ProcessingError> {
        Ok(())
    }

    fn after_process(&self, _record: &Record<P>) {}

    fn on_exception(&self, _record: &Record<P>, _error: &ProcessingError) {}
}
