//! Outcome handlers: callbacks invoked when a record leaves the pipeline
//! with a non-success disposition.
//!
//! The default handlers log the record and move on; register custom
//! handlers on the builder to route bad records elsewhere (a reject
//! file, a dead-letter queue, a metrics sink).

use std::collections::BTreeSet;

use swiftbatch_types::{
    FilterError, MappingError, ProcessingError, Record, ValidationError,
};

fn record_number<P>(record: &Record<P>) -> u64 {
    record.header().map(|h| h.number).unwrap_or(0)
}

/// Sees records rejected by the filter chain. `error` is set when the
/// chain failed rather than returning a rejection.
pub trait FilteredHandler<R> {
    fn on_filtered(&self, record: &Record<R>, error: Option<&FilterError>);
}

/// Sees records the mapper failed on.
pub trait IgnoredHandler<R> {
    fn on_ignored(&self, record: &Record<R>, error: &MappingError);
}

/// Sees records the validator chain found errors on (a chain failure
/// appears as one synthetic validation error in the set).
pub trait RejectedHandler<P> {
    fn on_rejected(&self, record: &Record<P>, errors: &BTreeSet<ValidationError>);
}

/// Sees records the processor chain failed on.
pub trait ErrorHandler<P> {
    fn on_error(&self, record: &Record<P>, error: &ProcessingError);
}

/// Default filtered handler: logs at debug (filtering is routine).
pub struct LogFilteredHandler;

impl<R> FilteredHandler<R> for LogFilteredHandler {
    fn on_filtered(&self, record: &Record<R>, error: Option<&FilterError>) {
        match error {
            Some(e) => tracing::warn!(
                record = record_number(record),
                error = %e,
                "record filtered after a filter failure"
            ),
            None => tracing::debug!(record = record_number(record), "record filtered"),
        }
    }
}

/// Default ignored handler: logs the mapping failure.
pub struct LogIgnoredHandler;

impl<R> IgnoredHandler<R> for LogIgnoredHandler {
    fn on_ignored(&self, record: &Record<R>, error: &MappingError) {
        tracing::warn!(record = record_number(record), error = %error, "record ignored");
    }
}

/// Default rejected handler: logs the validation errors.
pub struct LogRejectedHandler;

impl<P> RejectedHandler<P> for LogRejectedHandler {
    fn on_rejected(&self, record: &Record<P>, errors: &BTreeSet<ValidationError>) {
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        tracing::warn!(
            record = record_number(record),
            errors = ?messages,
            "record rejected"
        );
    }
}

/// Default error handler: logs the processing failure.
pub struct LogErrorHandler;

impl<P> ErrorHandler<P> for LogErrorHandler {
    fn on_error(&self, record: &Record<P>, error: &ProcessingError) {
        tracing::error!(record = record_number(record), error = %error, "record in error");
    }
}
