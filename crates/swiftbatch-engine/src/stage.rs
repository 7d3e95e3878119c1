//! Stage contracts: ordered chains of filters, one mapper, validator
//! chains, and processor chains, iterated by the engine.
//!
//! Each trait is a narrow capability object; plain closures with the
//! matching signature implement the trait through blanket impls, so a
//! chain can mix structs and function values freely.

use std::collections::BTreeSet;

use serde::Serialize;

use swiftbatch_types::{
    FilterError, MappingError, ProcessingError, Record, ValidationError, ValidationFailure,
};

/// Decides whether a record is filtered out of the run. `true` rejects.
pub trait Filter<R> {
    fn filter(&self, record: &Record<R>) -> Result<bool, FilterError>;
}

impl<R, F> Filter<R> for F
where
    F: Fn(&Record<R>) -> Result<bool, FilterError>,
{
    fn filter(&self, record: &Record<R>) -> Result<bool, FilterError> {
        self(record)
    }
}

/// Transforms a record's payload, possibly changing its type.
///
/// Mappers read the incoming record and build the outgoing one; the
/// header must be carried over, which [`Record::with_payload`] does.
pub trait Mapper<R, P> {
    fn map(&self, record: &Record<R>) -> Result<Record<P>, MappingError>;
}

impl<R, P, F> Mapper<R, P> for F
where
    F: Fn(&Record<R>) -> Result<Record<P>, MappingError>,
{
    fn map(&self, record: &Record<R>) -> Result<Record<P>, MappingError> {
        self(record)
    }
}

/// Mapper used when a pipeline does not remap payloads.
pub struct IdentityMapper;

impl<R: Clone> Mapper<R, R> for IdentityMapper {
    fn map(&self, record: &Record<R>) -> Result<Record<R>, MappingError> {
        Ok(record.clone())
    }
}

/// Checks a record and reports everything wrong with it.
///
/// An empty set means the record is valid. Returning `Err` marks the
/// whole chain as failed; the engine folds that into one synthetic
/// validation error.
pub trait Validator<P> {
    fn validate(&self, record: &Record<P>) -> Result<BTreeSet<ValidationError>, ValidationFailure>;
}

impl<P, F> Validator<P> for F
where
    F: Fn(&Record<P>) -> Result<BTreeSet<ValidationError>, ValidationFailure>,
{
    fn validate(&self, record: &Record<P>) -> Result<BTreeSet<ValidationError>, ValidationFailure> {
        self(record)
    }
}

/// Processes a record and may accumulate a terminal result for the run.
///
/// Processors are chained: each receives the previous processor's
/// output. After the source is exhausted the engine takes the last
/// non-`None` [`Processor::batch_result`] in chain order as the run's
/// batch result.
pub trait Processor<P> {
    fn process(&mut self, record: Record<P>) -> Result<Record<P>, ProcessingError>;

    /// Terminal value this processor contributes to the report, if any.
    fn batch_result(&self) -> Option<serde_json::Value> {
        None
    }
}

impl<P, F> Processor<P> for F
where
    F: FnMut(Record<P>) -> Result<Record<P>, ProcessingError>,
{
    fn process(&mut self, record: Record<P>) -> Result<Record<P>, ProcessingError> {
        self(record)
    }
}

/// Collects every payload it sees; the collected list becomes the run's
/// batch result.
#[derive(Debug, Default)]
pub struct RecordCollector<P> {
    collected: Vec<P>,
}

impl<P> RecordCollector<P> {
    pub fn new() -> Self {
        Self {
            collected: Vec::new(),
        }
    }

    pub fn collected(&self) -> &[P] {
        &self.collected
    }
}

impl<P: Clone + Serialize> Processor<P> for RecordCollector<P> {
    fn process(&mut self, record: Record<P>) -> Result<Record<P>, ProcessingError> {
        if let Some(payload) = record.payload() {
            self.collected.push(payload.clone());
        }
        Ok(record)
    }

    fn batch_result(&self) -> Option<serde_json::Value> {
        serde_json::to_value(&self.collected).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use swiftbatch_types::Header;

    fn record(number: u64, payload: &str) -> Record<String> {
        Record::new(Header::new(number, "test", Utc::now()), payload.to_string())
    }

    #[test]
    fn identity_mapper_preserves_record() {
        let input = record(1, "foo");
        let output = IdentityMapper.map(&input).unwrap();
        assert_eq!(input, output);
    }

    #[test]
    fn collector_accumulates_in_order() {
        let mut collector = RecordCollector::new();
        collector.process(record(1, "foo")).unwrap();
        collector.process(record(2, "bar")).unwrap();

        assert_eq!(collector.collected(), ["foo".to_string(), "bar".to_string()]);
        assert_eq!(
            collector.batch_result().unwrap(),
            serde_json::json!(["foo", "bar"])
        );
    }

    #[test]
    fn collector_with_nothing_collected_reports_empty_list() {
        let collector: RecordCollector<String> = RecordCollector::new();
        assert_eq!(collector.batch_result().unwrap(), serde_json::json!([]));
    }

    #[test]
    fn closures_implement_the_stage_traits() {
        let filter = |r: &Record<String>| -> Result<bool, FilterError> {
            Ok(r.payload().is_some_and(|p| p.is_empty()))
        };
        assert!(!Filter::filter(&filter, &record(1, "foo")).unwrap());
        assert!(Filter::filter(&filter, &record(2, "")).unwrap());

        let mapper = |r: &Record<String>| -> Result<Record<usize>, MappingError> {
            Ok(r.with_payload(r.payload().map(|p| p.len()).unwrap_or(0)))
        };
        let mapped = Mapper::map(&mapper, &record(3, "foo")).unwrap();
        assert_eq!(mapped.payload(), Some(&3));
    }
}
