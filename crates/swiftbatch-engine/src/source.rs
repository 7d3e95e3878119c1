//! Source contract and built-in sources.

use std::iter::Peekable;
use std::sync::mpsc::Receiver;

use chrono::Utc;

use swiftbatch_types::{Header, Record, SourceError};

/// A pluggable producer of records.
///
/// The engine calls `open` once, then alternates `has_next`/`read` until
/// the source is exhausted, then calls `close`. Open and read failures
/// abort the run; close failures are logged and ignored.
pub trait Source<R> {
    fn open(&mut self) -> Result<(), SourceError>;

    fn has_next(&mut self) -> bool;

    fn read(&mut self) -> Result<Record<R>, SourceError>;

    /// Total number of records, when the source can tell upfront.
    fn total(&self) -> Option<u64> {
        None
    }

    fn name(&self) -> &str;

    fn close(&mut self) -> Result<(), SourceError> {
        Ok(())
    }
}

/// In-memory source over an iterator of payloads.
///
/// Assigns 1-based, strictly increasing record numbers at read time.
/// Knows its total upfront when built from a `Vec`.
pub struct IterableSource<I: Iterator> {
    iter: Peekable<I>,
    total: Option<u64>,
    current: u64,
    name: String,
}

impl<R> IterableSource<std::vec::IntoIter<R>> {
    pub fn new(items: Vec<R>) -> Self {
        let total = Some(items.len() as u64);
        Self {
            iter: items.into_iter().peekable(),
            total,
            current: 0,
            name: "in-memory".to_string(),
        }
    }
}

impl<I: Iterator> IterableSource<I> {
    /// Source over an arbitrary iterator; the total is unknown upfront.
    pub fn from_iter(iter: I) -> Self {
        Self {
            iter: iter.peekable(),
            total: None,
            current: 0,
            name: "in-memory".to_string(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<I: Iterator> Source<I::Item> for IterableSource<I> {
    fn open(&mut self) -> Result<(), SourceError> {
        self.current = 0;
        Ok(())
    }

    fn has_next(&mut self) -> bool {
        self.iter.peek().is_some()
    }

    fn read(&mut self) -> Result<Record<I::Item>, SourceError> {
        let payload = self
            .iter
            .next()
            .ok_or_else(|| SourceError::Read(anyhow::anyhow!("data source is exhausted")))?;
        self.current += 1;
        let header = Header::new(self.current, self.name.clone(), Utc::now());
        Ok(Record::new(header, payload))
    }

    fn total(&self) -> Option<u64> {
        self.total
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Consumer side of a dispatcher fan-out.
///
/// Blocks on the queue until a record arrives. A poison record or a
/// disconnected channel ends the stream; records keep the headers
/// assigned by the producing source, so numbers stay strictly increasing
/// within the consumer's run.
pub struct QueueSource<R> {
    receiver: Receiver<Record<R>>,
    lookahead: Option<Record<R>>,
    done: bool,
    name: String,
}

impl<R> QueueSource<R> {
    pub fn new(receiver: Receiver<Record<R>>) -> Self {
        Self {
            receiver,
            lookahead: None,
            done: false,
            name: "queue".to_string(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<R> Source<R> for QueueSource<R> {
    fn open(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    fn has_next(&mut self) -> bool {
        if self.done {
            return false;
        }
        if self.lookahead.is_some() {
            return true;
        }
        match self.receiver.recv() {
            Ok(record) if record.is_poison() => {
                tracing::debug!(source = %self.name, "poison record received, ending stream");
                self.done = true;
                false
            }
            Ok(record) => {
                self.lookahead = Some(record);
                true
            }
            Err(_) => {
                // Producer dropped its sender without sending poison.
                self.done = true;
                false
            }
        }
    }

    fn read(&mut self) -> Result<Record<R>, SourceError> {
        self.lookahead
            .take()
            .ok_or_else(|| SourceError::Read(anyhow::anyhow!("no record is pending on the queue")))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
