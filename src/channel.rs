//! This module defines the blocking message channel that carries phase
//! transitions from the cycler thread to waiting callers.
//!
//! The implementation is a classic monitor: a queue guarded by a mutex, with
//! a condition variable to park receivers while the queue is empty. The lock
//! is held only for O(1) queue manipulation, never across the park, so a
//! producer is never delayed by a slow consumer and vice versa.

use alloc::collections::VecDeque;

use crate::platform::*;

// -----------------------------------------------------------------------------
// Channel

/// A thread-safe FIFO queue with a blocking receive operation.
///
/// Values are delivered in the order they were sent. When several threads
/// receive concurrently, delivery is fan-out: each value is consumed by
/// exactly one receiver, first-come-first-served. There is no broadcast;
/// callers that need every value must hold the only receiving side.
///
/// Neither operation can fail, and neither has a timeout. A receiver blocks
/// indefinitely if no value ever arrives.
pub struct Channel<T> {
    /// The pending values, oldest first. Only ever touched under the lock.
    queue: Mutex<VecDeque<T>>,
    /// Signaled whenever a value is pushed, waking one parked receiver.
    value_is_ready: Condvar,
}

impl<T> Channel<T> {
    /// Creates a new, empty channel.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            value_is_ready: Condvar::new(),
        }
    }

    /// Appends a value to the channel and wakes one parked receiver.
    ///
    /// This never blocks waiting for a consumer; from the sender's
    /// perspective it is fire-and-forget.
    pub fn send(&self, value: T) {
        let mut queue = self.queue.lock().unwrap();
        queue.push_back(value);
        drop(queue);
        self.value_is_ready.notify_one();
    }

    /// Removes and returns the oldest pending value, blocking until one is
    /// available.
    ///
    /// The thread is parked while the channel is empty; the emptiness
    /// predicate is re-checked under the lock on every wakeup, which guards
    /// against both spurious wakeups and races with other receivers.
    pub fn recv(&self) -> T {
        let mut queue = self.queue.lock().unwrap();
        loop {
            if let Some(value) = queue.pop_front() {
                return value;
            }
            queue = self.value_is_ready.wait(queue).unwrap();
        }
    }

    /// Removes and returns the oldest pending value, or `None` if the
    /// channel is currently empty. Never blocks.
    pub fn try_recv(&self) -> Option<T> {
        self.queue.lock().unwrap().pop_front()
    }

    /// Returns the number of pending values.
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Returns true if no values are pending.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}
