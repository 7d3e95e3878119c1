//! Record pipeline engine.
//!
//! One [`Pipeline`] run drives records from a [`source::Source`] through
//! ordered filter, map, validate, and process chains, classifies each
//! record's outcome, and returns a [`Report`]. The [`dispatcher`] module
//! fans records out from one producer to a set of consumer queues, with
//! a poison-record broadcast as the shutdown signal.

pub mod builder;
pub mod config;
pub mod dispatcher;
pub mod handler;
pub mod listener;
pub mod report;
pub mod runner;
pub mod source;
pub mod stage;

// Re-export the public API for convenience
pub use builder::PipelineBuilder;
pub use config::RunOptions;
pub use report::Report;
pub use runner::Pipeline;
