//! Pipeline execution: the per-record state machine.
//!
//! One run is single-threaded and synchronous: each record is driven
//! through every stage before the next is read. The engine owns its
//! [`Report`] for the whole run and never lets a failure escape `run`:
//! source open/read failures abort the run, stage failures become
//! dispositions, and a processing failure under strict mode aborts.

use std::collections::BTreeSet;

use swiftbatch_types::{
    Disposition, FilterError, Record, ValidationError, ValidationFailure,
};

use crate::handler::{ErrorHandler, FilteredHandler, IgnoredHandler, RejectedHandler};
use crate::listener::{
    FilterListener, JobListener, MapperListener, ProcessorListener, SourceListener,
    ValidatorListener,
};
use crate::report::Report;
use crate::source::Source;
use crate::stage::{Filter, Mapper, Processor, Validator};

/// A fully assembled pipeline, built by
/// [`PipelineBuilder`](crate::PipelineBuilder).
///
/// `R` is the raw payload type produced by the source; `P` is the
/// payload type after mapping.
pub struct Pipeline<R, P> {
    pub(crate) name: String,
    pub(crate) skip: u64,
    pub(crate) limit: Option<u64>,
    pub(crate) strict_mode: bool,
    pub(crate) source: Box<dyn Source<R>>,
    pub(crate) filters: Vec<Box<dyn Filter<R>>>,
    pub(crate) mapper: Box<dyn Mapper<R, P>>,
    pub(crate) validators: Vec<Box<dyn Validator<P>>>,
    pub(crate) processors: Vec<Box<dyn Processor<P>>>,
    pub(crate) filtered_handler: Box<dyn FilteredHandler<R>>,
    pub(crate) ignored_handler: Box<dyn IgnoredHandler<R>>,
    pub(crate) rejected_handler: Box<dyn RejectedHandler<P>>,
    pub(crate) error_handler: Box<dyn ErrorHandler<P>>,
    pub(crate) job_listeners: Vec<Box<dyn JobListener>>,
    pub(crate) source_listeners: Vec<Box<dyn SourceListener<R>>>,
    pub(crate) filter_listeners: Vec<Box<dyn FilterListener<R>>>,
    pub(crate) mapper_listeners: Vec<Box<dyn MapperListener<R, P>>>,
    pub(crate) validator_listeners: Vec<Box<dyn ValidatorListener<P>>>,
    pub(crate) processor_listeners: Vec<Box<dyn ProcessorListener<P>>>,
}

impl<R: 'static, P: Clone + 'static> Pipeline<R, P> {
    /// Execute one run to completion or abortion.
    ///
    /// Never returns an error: every failure is folded into the returned
    /// [`Report`] (status, counters, and the outcome handlers).
    pub fn run(&mut self) -> Report {
        let mut report = Report::new(&self.name, self.source.name(), self.limit);

        for listener in &self.job_listeners {
            listener.before_start();
        }
        tracing::info!(
            pipeline = %self.name,
            source = %self.source.name(),
            strict_mode = self.strict_mode,
            "starting pipeline run"
        );
        report.start();

        for listener in &self.source_listeners {
            listener.before_open();
        }
        if let Err(e) = self.source.open() {
            tracing::error!(pipeline = %self.name, error = %e, "aborting run: data source did not open");
            for listener in &self.job_listeners {
                listener.on_exception(&e);
            }
            report.abort();
            self.notify_after_end();
            return report;
        }
        for listener in &self.source_listeners {
            listener.after_open();
        }
        if let Some(total) = self.source.total() {
            tracing::debug!(total, "data source size known upfront");
        }

        let mut records_read: u64 = 0;
        let mut skip_budget = self.skip;

        while self.source.has_next() {
            if self.limit.is_some_and(|limit| records_read >= limit) {
                tracing::info!(limit = self.limit.unwrap(), "record limit reached, stopping");
                break;
            }

            for listener in &self.source_listeners {
                listener.before_read();
            }
            let record = match self.source.read() {
                Ok(record) => record,
                Err(e) => {
                    tracing::error!(pipeline = %self.name, error = %e, "aborting run: record could not be read");
                    for listener in &self.job_listeners {
                        listener.on_exception(&e);
                    }
                    self.close_source();
                    report.abort();
                    self.notify_after_end();
                    return report;
                }
            };
            records_read += 1;
            for listener in &self.source_listeners {
                listener.after_read(&record);
            }

            // A poison record is a shutdown sentinel, not work: it never
            // enters a business stage.
            if record.is_poison() {
                self.filtered_handler.on_filtered(&record, None);
                report.tally(Disposition::Filtered);
                continue;
            }

            if skip_budget > 0 {
                skip_budget -= 1;
                report.tally(Disposition::Skipped);
                continue;
            }

            let disposition = self.execute_stages(record);
            report.tally(disposition);

            if disposition == Disposition::Error && self.strict_mode {
                tracing::error!(
                    pipeline = %self.name,
                    record = records_read,
                    "aborting run: processing failed in strict mode"
                );
                self.close_source();
                report.set_total_records(records_read);
                report.abort();
                self.notify_after_end();
                return report;
            }
        }

        if let Some(result) = self.processors.iter().rev().find_map(|p| p.batch_result()) {
            report.set_batch_result(result);
        }

        self.close_source();
        report.finish(records_read);
        tracing::info!(
            pipeline = %self.name,
            total = records_read,
            success = report.success_count(),
            filtered = report.filtered_count(),
            skipped = report.skipped_count(),
            ignored = report.ignored_count(),
            rejected = report.rejected_count(),
            errors = report.error_count(),
            duration_ms = report.duration_ms(),
            "pipeline run finished"
        );
        self.notify_after_end();
        report
    }

    /// Drive one record through filter → map → validate → process and
    /// classify the outcome. Exactly one disposition comes back.
    fn execute_stages(&mut self, mut record: Record<R>) -> Disposition {
        // Filter stage: the first rejecting (or failing) filter wins.
        for listener in &self.filter_listeners {
            if let Err(e) = listener.before_filter(&mut record) {
                for l in &self.filter_listeners {
                    l.on_exception(&record, &e);
                }
                self.filtered_handler.on_filtered(&record, Some(&e));
                return Disposition::Filtered;
            }
        }
        let mut filter_failure: Option<FilterError> = None;
        let mut filtered = false;
        for filter in &self.filters {
            match filter.filter(&record) {
                Ok(false) => {}
                Ok(true) => {
                    filtered = true;
                    break;
                }
                Err(e) => {
                    filtered = true;
                    filter_failure = Some(e);
                    break;
                }
            }
        }
        for listener in &self.filter_listeners {
            listener.after_filter(&record, filtered);
        }
        if filtered {
            if let Some(ref e) = filter_failure {
                for listener in &self.filter_listeners {
                    listener.on_exception(&record, e);
                }
            }
            self.filtered_handler.on_filtered(&record, filter_failure.as_ref());
            return Disposition::Filtered;
        }

        // Map stage.
        for listener in &self.mapper_listeners {
            if let Err(e) = listener.before_map(&mut record) {
                for l in &self.mapper_listeners {
                    l.on_exception(&record, &e);
                }
                self.ignored_handler.on_ignored(&record, &e);
                return Disposition::Ignored;
            }
        }
        let mut mapped = match self.mapper.map(&record) {
            Ok(mapped) => mapped,
            Err(e) => {
                for listener in &self.mapper_listeners {
                    listener.on_exception(&record, &e);
                }
                self.ignored_handler.on_ignored(&record, &e);
                return Disposition::Ignored;
            }
        };
        for listener in &self.mapper_listeners {
            listener.after_map(&mapped);
        }

        // Validate stage: union of error sets across the chain; a chain
        // failure collapses into one synthetic validation error.
        for listener in &self.validator_listeners {
            if let Err(e) = listener.before_validate(&mut mapped) {
                return self.reject(mapped, Some(e));
            }
        }
        let mut errors: BTreeSet<ValidationError> = BTreeSet::new();
        let mut validation_failure: Option<ValidationFailure> = None;
        for validator in &self.validators {
            match validator.validate(&mapped) {
                Ok(found) => errors.extend(found),
                Err(e) => {
                    validation_failure = Some(e);
                    break;
                }
            }
        }
        if let Some(e) = validation_failure {
            for listener in &self.validator_listeners {
                listener.on_exception(&mapped, &e);
            }
            errors.insert(ValidationError::new(e.to_string()));
        }
        for listener in &self.validator_listeners {
            listener.after_validate(&mapped, &errors);
        }
        if !errors.is_empty() {
            self.rejected_handler.on_rejected(&mapped, &errors);
            return Disposition::Rejected;
        }

        // Process stage: chained, each processor consumes the previous
        // output. The failing stage sees the post-mapping record.
        for listener in &self.processor_listeners {
            if let Err(e) = listener.before_process(&mut mapped) {
                for l in &self.processor_listeners {
                    l.on_exception(&mapped, &e);
                }
                self.error_handler.on_error(&mapped, &e);
                for l in &self.job_listeners {
                    l.on_exception(&e);
                }
                return Disposition::Error;
            }
        }
        let staged = mapped.clone();
        let mut current = mapped;
        for processor in self.processors.iter_mut() {
            current = match processor.process(current) {
                Ok(record) => record,
                Err(e) => {
                    for listener in &self.processor_listeners {
                        listener.on_exception(&staged, &e);
                    }
                    self.error_handler.on_error(&staged, &e);
                    for listener in &self.job_listeners {
                        listener.on_exception(&e);
                    }
                    return Disposition::Error;
                }
            };
        }
        for listener in &self.processor_listeners {
            listener.after_process(&current);
        }

        Disposition::Success
    }

    fn reject(&self, record: Record<P>, failure: Option<ValidationFailure>) -> Disposition {
        let mut errors = BTreeSet::new();
        if let Some(e) = failure {
            for listener in &self.validator_listeners {
                listener.on_exception(&record, &e);
            }
            errors.insert(ValidationError::new(e.to_string()));
        }
        self.rejected_handler.on_rejected(&record, &errors);
        Disposition::Rejected
    }

    /// Closing failures are not fatal to the run status, only logged.
    fn close_source(&mut self) {
        for listener in &self.source_listeners {
            listener.before_close();
        }
        if let Err(e) = self.source.close() {
            tracing::warn!(pipeline = %self.name, error = %e, "failed to close data source");
        }
        for listener in &self.source_listeners {
            listener.after_close();
        }
    }

    fn notify_after_end(&self) {
        for listener in &self.job_listeners {
            listener.after_end();
        }
    }
}
