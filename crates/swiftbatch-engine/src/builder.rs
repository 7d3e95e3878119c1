//! Pipeline assembly: a configuration-only builder with validation at
//! construction. The builder has no runtime behavior of its own.

use crate::config::{self, RunOptions};
use crate::handler::{
    ErrorHandler, FilteredHandler, IgnoredHandler, LogErrorHandler, LogFilteredHandler,
    LogIgnoredHandler, LogRejectedHandler, RejectedHandler,
};
use crate::listener::{
    FilterListener, JobListener, MapperListener, ProcessorListener, SourceListener,
    ValidatorListener,
};
use crate::runner::Pipeline;
use crate::source::{IterableSource, Source};
use crate::stage::{Filter, IdentityMapper, Mapper, Processor, Validator};

const DEFAULT_PIPELINE_NAME: &str = "pipeline";

/// Assembles a [`Pipeline`].
///
/// Chains keep registration order. The mapper switches the processed
/// payload type, so it must be registered before any validator,
/// processor, or listener/handler typed on the mapped payload.
pub struct PipelineBuilder<R, P> {
    name: String,
    skip: u64,
    limit: Option<u64>,
    strict_mode: bool,
    source: Option<Box<dyn Source<R>>>,
    filters: Vec<Box<dyn Filter<R>>>,
    mapper: Box<dyn Mapper<R, P>>,
    validators: Vec<Box<dyn Validator<P>>>,
    processors: Vec<Box<dyn Processor<P>>>,
    filtered_handler: Box<dyn FilteredHandler<R>>,
    ignored_handler: Box<dyn IgnoredHandler<R>>,
    rejected_handler: Box<dyn RejectedHandler<P>>,
    error_handler: Box<dyn ErrorHandler<P>>,
    job_listeners: Vec<Box<dyn JobListener>>,
    source_listeners: Vec<Box<dyn SourceListener<R>>>,
    filter_listeners: Vec<Box<dyn FilterListener<R>>>,
    mapper_listeners: Vec<Box<dyn MapperListener<R, P>>>,
    validator_listeners: Vec<Box<dyn ValidatorListener<P>>>,
    processor_listeners: Vec<Box<dyn ProcessorListener<P>>>,
}

impl<R, P> std::fmt::Debug for PipelineBuilder<R, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("name", &self.name)
            .field("skip", &self.skip)
            .field("limit", &self.limit)
            .field("strict_mode", &self.strict_mode)
            .finish_non_exhaustive()
    }
}

impl<R: Clone + 'static> PipelineBuilder<R, R> {
    /// New builder with an identity mapper and logging outcome handlers.
    pub fn new() -> Self {
        Self {
            name: DEFAULT_PIPELINE_NAME.to_string(),
            skip: 0,
            limit: None,
            strict_mode: false,
            source: None,
            filters: Vec::new(),
            mapper: Box::new(IdentityMapper),
            validators: Vec::new(),
            processors: Vec::new(),
            filtered_handler: Box::new(LogFilteredHandler),
            ignored_handler: Box::new(LogIgnoredHandler),
            rejected_handler: Box::new(LogRejectedHandler),
            error_handler: Box::new(LogErrorHandler),
            job_listeners: Vec::new(),
            source_listeners: Vec::new(),
            filter_listeners: Vec::new(),
            mapper_listeners: Vec::new(),
            validator_listeners: Vec::new(),
            processor_listeners: Vec::new(),
        }
    }
}

impl<R: Clone + 'static> Default for PipelineBuilder<R, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: 'static, P: 'static> PipelineBuilder<R, P> {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of leading records consumed before any stage runs on them.
    ///
    /// # Panics
    ///
    /// Panics when `count` is zero; leave the builder untouched to
    /// disable skipping.
    pub fn skip(mut self, count: u64) -> Self {
        assert!(count >= 1, "skip count must be >= 1");
        self.skip = count;
        self
    }

    /// Cap on the number of records read from the source.
    ///
    /// # Panics
    ///
    /// Panics when `count` is zero; leave the builder untouched to
    /// disable the limit.
    pub fn limit(mut self, count: u64) -> Self {
        assert!(count >= 1, "limit count must be >= 1");
        self.limit = Some(count);
        self
    }

    /// Abort the whole run on the first processing failure instead of
    /// recording the record as an error and continuing.
    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Apply a validated [`RunOptions`]. Unset options keep the
    /// builder's current values.
    pub fn with_options(mut self, options: &RunOptions) -> anyhow::Result<Self> {
        config::validate(options)?;
        self.name = options.name.clone();
        if let Some(skip) = options.skip {
            self.skip = skip;
        }
        if let Some(limit) = options.limit {
            self.limit = Some(limit);
        }
        self.strict_mode = options.strict_mode;
        Ok(self)
    }

    pub fn source(mut self, source: impl Source<R> + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn filter(mut self, filter: impl Filter<R> + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Register the mapper, switching the processed payload type to `Q`.
    ///
    /// # Panics
    ///
    /// Panics when validators, processors, or listeners typed on the
    /// previous mapped payload were already registered.
    pub fn mapper<Q: 'static>(self, mapper: impl Mapper<R, Q> + 'static) -> PipelineBuilder<R, Q> {
        assert!(
            self.validators.is_empty()
                && self.processors.is_empty()
                && self.mapper_listeners.is_empty()
                && self.validator_listeners.is_empty()
                && self.processor_listeners.is_empty(),
            "register the mapper before validators, processors, and their listeners"
        );
        PipelineBuilder {
            name: self.name,
            skip: self.skip,
            limit: self.limit,
            strict_mode: self.strict_mode,
            source: self.source,
            filters: self.filters,
            mapper: Box::new(mapper),
            validators: Vec::new(),
            processors: Vec::new(),
            filtered_handler: self.filtered_handler,
            ignored_handler: self.ignored_handler,
            rejected_handler: Box::new(LogRejectedHandler),
            error_handler: Box::new(LogErrorHandler),
            job_listeners: self.job_listeners,
            source_listeners: self.source_listeners,
            filter_listeners: self.filter_listeners,
            mapper_listeners: Vec::new(),
            validator_listeners: Vec::new(),
            processor_listeners: Vec::new(),
        }
    }

    pub fn validator(mut self, validator: impl Validator<P> + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn processor(mut self, processor: impl Processor<P> + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn on_filtered(mut self, handler: impl FilteredHandler<R> + 'static) -> Self {
        self.filtered_handler = Box::new(handler);
        self
    }

    pub fn on_ignored(mut self, handler: impl IgnoredHandler<R> + 'static) -> Self {
        self.ignored_handler = Box::new(handler);
        self
    }

    pub fn on_rejected(mut self, handler: impl RejectedHandler<P> + 'static) -> Self {
        self.rejected_handler = Box::new(handler);
        self
    }

    pub fn on_error(mut self, handler: impl ErrorHandler<P> + 'static) -> Self {
        self.error_handler = Box::new(handler);
        self
    }

    pub fn job_listener(mut self, listener: impl JobListener + 'static) -> Self {
        self.job_listeners.push(Box::new(listener));
        self
    }

    pub fn source_listener(mut self, listener: impl SourceListener<R> + 'static) -> Self {
        self.source_listeners.push(Box::new(listener));
        self
    }

    pub fn filter_listener(mut self, listener: impl FilterListener<R> + 'static) -> Self {
        self.filter_listeners.push(Box::new(listener));
        self
    }

    pub fn mapper_listener(mut self, listener: impl MapperListener<R, P> + 'static) -> Self {
        self.mapper_listeners.push(Box::new(listener));
        self
    }

    pub fn validator_listener(mut self, listener: impl ValidatorListener<P> + 'static) -> Self {
        self.validator_listeners.push(Box::new(listener));
        self
    }

    pub fn processor_listener(mut self, listener: impl ProcessorListener<P> + 'static) -> Self {
        self.processor_listeners.push(Box::new(listener));
        self
    }

    /// Build the pipeline. Without a registered source the pipeline runs
    /// over an empty in-memory source.
    pub fn build(self) -> Pipeline<R, P> {
        let source = self
            .source
            .unwrap_or_else(|| Box::new(IterableSource::new(Vec::<R>::new())));
        Pipeline {
            name: self.name,
            skip: self.skip,
            limit: self.limit,
            strict_mode: self.strict_mode,
            source,
            filters: self.filters,
            mapper: self.mapper,
            validators: self.validators,
            processors: self.processors,
            filtered_handler: self.filtered_handler,
            ignored_handler: self.ignored_handler,
            rejected_handler: self.rejected_handler,
            error_handler: self.error_handler,
            job_listeners: self.job_listeners,
            source_listeners: self.source_listeners,
            filter_listeners: self.filter_listeners,
            mapper_listeners: self.mapper_listeners,
            validator_listeners: self.validator_listeners,
            processor_listeners: self.processor_listeners,
        }
    }
}
