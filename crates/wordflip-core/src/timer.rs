//! One-shot timers on a simulated millisecond clock.
//!
//! Timers fire in due-time order; timers due at the same instant fire in the
//! order they were scheduled. A timer is gone once it fires.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// A fired timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub at_ms: u64,
    pub payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    now_ms: u64,
    next_seq: u64,
    /// `(due, seq)` of every pending timer; `seq` keys `pending`.
    order: BinaryHeap<Reverse<(u64, u64)>>,
    pending: HashMap<u64, T>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            order: BinaryHeap::new(),
            pending: HashMap::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `payload` to fire `delay_ms` after the current time.
    pub fn schedule(&mut self, delay_ms: u64, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.order.push(Reverse((due, seq)));
        self.pending.insert(seq, payload);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the earliest pending timer.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.order.peek().map(|Reverse((due, _))| *due)
    }

    /// Fire the earliest timer due at or before `until_ms`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired<T>> {
        let Reverse((due, seq)) = *self.order.peek()?;
        if due > until_ms {
            return None;
        }
        self.order.pop();
        let payload = self.pending.remove(&seq)?;
        self.now_ms = self.now_ms.max(due);
        Some(Fired {
            at_ms: due,
            payload,
        })
    }

    /// Move the clock forward without firing anything.
    pub fn advance_to(&mut self, at_ms: u64) {
        self.now_ms = self.now_ms.max(at_ms);
    }
}
