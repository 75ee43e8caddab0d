// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-threaded deferred task queue keyed by host time.
//!
//! [`TaskQueue`] replaces ad-hoc timer chains with an explicit queue: tasks
//! are scheduled for a [`HostTime`] and popped once the driving clock has
//! reached it. Tasks due at the same time pop in scheduling order. A browser
//! backend arms one platform timer for [`next_due`](TaskQueue::next_due);
//! tests drive the queue from a virtual clock.

use alloc::collections::BinaryHeap;
use core::cmp::{Ordering, Reverse};

use crate::time::HostTime;

#[derive(Debug)]
struct Entry<T> {
    due: HostTime,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Min-ordered queue of deferred tasks.
#[derive(Debug)]
pub struct TaskQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    next_seq: u64,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> TaskQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` to become due at `due`.
    pub fn schedule(&mut self, due: HostTime, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { due, seq, task }));
    }

    /// Earliest pending due time, if any.
    #[must_use]
    pub fn next_due(&self) -> Option<HostTime> {
        self.heap.peek().map(|Reverse(e)| e.due)
    }

    /// Pops the earliest task whose due time is at or before `now`.
    pub fn pop_due(&mut self, now: HostTime) -> Option<(HostTime, T)> {
        if self.next_due()? > now {
            return None;
        }
        self.heap.pop().map(|Reverse(e)| (e.due, e.task))
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if no tasks are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
