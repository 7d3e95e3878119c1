//! Record dispatch: fan one producer out to N destination queues.
//!
//! Destination queues are the sending ends of bounded
//! `std::sync::mpsc::sync_channel`s; a full queue blocks the dispatcher
//! until its consumer catches up, so backpressure comes from the queue
//! capacity, not from the dispatcher. Every dispatcher upholds one
//! invariant: a poison record is broadcast to every queue in list order,
//! so each downstream consumer sees the shutdown signal exactly once.
//! Normal records go to exactly one queue chosen by the strategy (the
//! broadcast dispatcher being the exception that copies to all).

use std::sync::mpsc::SyncSender;

use rand::Rng;

use swiftbatch_types::{DispatchError, Record};

/// Delivers each incoming record to the correct subset of queues.
///
/// Dispatchers hold no record state between calls; queue selection for
/// normal records carries no memory of past selections beyond what the
/// strategy itself defines.
pub trait RecordDispatcher<P> {
    fn dispatch(&mut self, record: Record<P>) -> Result<(), DispatchError>;
}

fn broadcast_poison<P>(queues: &[SyncSender<Record<P>>]) -> Result<(), DispatchError> {
    for (index, queue) in queues.iter().enumerate() {
        queue
            .send(Record::Poison)
            .map_err(|_| DispatchError { queue: index })?;
    }
    Ok(())
}

fn send_to<P>(
    queues: &[SyncSender<Record<P>>],
    index: usize,
    record: Record<P>,
) -> Result<(), DispatchError> {
    queues[index]
        .send(record)
        .map_err(|_| DispatchError { queue: index })
}

/// Spreads records uniformly at random across the destination queues.
///
/// A load-spreading fan-out for parallel consumer pipelines, not a
/// partitioning scheme: no ordering or affinity across consumers.
pub struct RandomDispatcher<P> {
    queues: Vec<SyncSender<Record<P>>>,
}

impl<P> RandomDispatcher<P> {
    /// # Panics
    ///
    /// Panics when `queues` is empty.
    pub fn new(queues: Vec<SyncSender<Record<P>>>) -> Self {
        assert!(!queues.is_empty(), "at least one destination queue is required");
        Self { queues }
    }
}

impl<P> RecordDispatcher<P> for RandomDispatcher<P> {
    fn dispatch(&mut self, record: Record<P>) -> Result<(), DispatchError> {
        if record.is_poison() {
            return broadcast_poison(&self.queues);
        }
        let index = rand::thread_rng().gen_range(0..self.queues.len());
        send_to(&self.queues, index, record)
    }
}

/// Rotates through the destination queues in order.
pub struct RoundRobinDispatcher<P> {
    queues: Vec<SyncSender<Record<P>>>,
    next: usize,
}

impl<P> RoundRobinDispatcher<P> {
    /// # Panics
    ///
    /// Panics when `queues` is empty.
    pub fn new(queues: Vec<SyncSender<Record<P>>>) -> Self {
        assert!(!queues.is_empty(), "at least one destination queue is required");
        Self { queues, next: 0 }
    }
}

impl<P> RecordDispatcher<P> for RoundRobinDispatcher<P> {
    fn dispatch(&mut self, record: Record<P>) -> Result<(), DispatchError> {
        if record.is_poison() {
            return broadcast_poison(&self.queues);
        }
        let index = self.next;
        self.next = (self.next + 1) % self.queues.len();
        send_to(&self.queues, index, record)
    }
}

/// Copies every record to every destination queue.
pub struct BroadcastDispatcher<P> {
    queues: Vec<SyncSender<Record<P>>>,
}

impl<P> BroadcastDispatcher<P> {
    /// # Panics
    ///
    /// Panics when `queues` is empty.
    pub fn new(queues: Vec<SyncSender<Record<P>>>) -> Self {
        assert!(!queues.is_empty(), "at least one destination queue is required");
        Self { queues }
    }
}

impl<P: Clone> RecordDispatcher<P> for BroadcastDispatcher<P> {
    fn dispatch(&mut self, record: Record<P>) -> Result<(), DispatchError> {
        if record.is_poison() {
            return broadcast_poison(&self.queues);
        }
        for (index, queue) in self.queues.iter().enumerate() {
            queue
                .send(record.clone())
                .map_err(|_| DispatchError { queue: index })?;
        }
        Ok(())
    }
}
