//! The discrete-event delivery queue.
//!
//! Every "after delay `D`, put this value on that wire" becomes a
//! [`Delivery`] in a priority queue drained by the engine's clock.
//!
//! # Ordering
//!
//! Deliveries are ordered by the composite key `(fire_at, seq)`, where
//! `seq` is a monotonic counter assigned at schedule time. Sibling
//! fan-out deliveries carry an identical snapshotted value, so their
//! relative order is immaterial — the tiebreaker exists to make drain
//! order fully deterministic anyway.
//!
//! # Value snapshot
//!
//! The value is captured when the delivery is scheduled, not when it
//! fires. A source connector that changes again before the delay
//! elapses must not retroactively alter a wave already in flight.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use wyre_core::{ConnectionId, SimTime, Signal};

/// One scheduled value delivery across a connection.
#[derive(Clone, Copy, Debug)]
pub struct Delivery {
    /// When the delivery fires on the virtual clock.
    pub fire_at: SimTime,
    /// Monotonic schedule-order tiebreaker.
    pub seq: u64,
    /// The connection to deliver across.
    pub connection: ConnectionId,
    /// The source value snapshotted at schedule time.
    pub value: Signal,
}

// Ordering is by (fire_at, seq) only; seq is unique per queue, so the
// remaining fields never participate in comparisons.
impl PartialEq for Delivery {
    fn eq(&self, other: &Self) -> bool {
        (self.fire_at, self.seq) == (other.fire_at, other.seq)
    }
}

impl Eq for Delivery {}

impl PartialOrd for Delivery {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Delivery {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.fire_at, self.seq).cmp(&(other.fire_at, other.seq))
    }
}

/// Min-queue of pending deliveries, keyed by fire time.
#[derive(Debug, Default)]
pub struct DeliveryQueue {
    heap: BinaryHeap<Reverse<Delivery>>,
    next_seq: u64,
}

impl DeliveryQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a delivery, snapshotting `value` now.
    pub fn schedule(&mut self, fire_at: SimTime, connection: ConnectionId, value: Signal) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Delivery {
            fire_at,
            seq,
            connection,
            value,
        }));
    }

    /// The fire time of the earliest pending delivery.
    pub fn next_fire_at(&self) -> Option<SimTime> {
        self.heap.peek().map(|d| d.0.fire_at)
    }

    /// Pop the earliest delivery if it is due at or before `now`.
    pub fn pop_due(&mut self, now: SimTime) -> Option<Delivery> {
        if self.next_fire_at()? <= now {
            self.heap.pop().map(|d| d.0)
        } else {
            None
        }
    }

    /// Drop every pending delivery whose connection satisfies `pred`.
    ///
    /// Called synchronously on structural edits so the queue never
    /// holds a delivery for a severed connection.
    pub fn purge(&mut self, mut pred: impl FnMut(ConnectionId) -> bool) {
        self.heap.retain(|d| !pred(d.0.connection));
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Number of pending deliveries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no deliveries are pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_fire_time_then_schedule_order() {
        let mut q = DeliveryQueue::new();
        q.schedule(SimTime(20), ConnectionId(0), Signal::High);
        q.schedule(SimTime(10), ConnectionId(1), Signal::Low);
        q.schedule(SimTime(10), ConnectionId(2), Signal::Low);

        let first = q.pop_due(SimTime(30)).unwrap();
        let second = q.pop_due(SimTime(30)).unwrap();
        let third = q.pop_due(SimTime(30)).unwrap();
        assert_eq!(first.connection, ConnectionId(1));
        assert_eq!(second.connection, ConnectionId(2));
        assert_eq!(third.connection, ConnectionId(0));
    }

    #[test]
    fn pop_due_respects_the_clock() {
        let mut q = DeliveryQueue::new();
        q.schedule(SimTime(50), ConnectionId(0), Signal::High);
        assert!(q.pop_due(SimTime(49)).is_none());
        assert!(q.pop_due(SimTime(50)).is_some());
    }

    #[test]
    fn purge_removes_only_matching_connections() {
        let mut q = DeliveryQueue::new();
        q.schedule(SimTime(10), ConnectionId(0), Signal::High);
        q.schedule(SimTime(10), ConnectionId(1), Signal::High);
        q.schedule(SimTime(20), ConnectionId(0), Signal::Low);

        q.purge(|c| c == ConnectionId(0));
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(SimTime(10)).unwrap().connection, ConnectionId(1));
    }

    #[test]
    fn snapshot_value_rides_the_delivery() {
        let mut q = DeliveryQueue::new();
        q.schedule(SimTime(10), ConnectionId(0), Signal::High);
        // The "source" changing later has no way to reach the queue:
        // the value travelled with the entry.
        let d = q.pop_due(SimTime(10)).unwrap();
        assert_eq!(d.value, Signal::High);
    }
}
