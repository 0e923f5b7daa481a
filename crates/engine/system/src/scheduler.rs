//! Cooperative timer scheduling
//!
//! A [`Scheduler`] is an explicit queue of timed events owned by whoever
//! drives the page. Nothing runs by itself: the owner calls
//! [`Scheduler::drain_due`] with the current time and dispatches the returned
//! events.
//!
//! Every entry carries a [`CancelToken`]. Cancelling the token stops all
//! entries scheduled with it, including ones that a handler re-schedules
//! later with a clone of the same token. This is what lets an effect's
//! recreation loop stop for good on teardown instead of leaking timers.

use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::Instant;

/// Shared cancellation flag
///
/// Clones observe the same flag. Cancelling is permanent and idempotent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    /// Create a live token
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token; returns `true` only for the call that cancelled it
    pub fn cancel(&self) -> bool {
        !self.0.replace(true)
    }

    /// Whether the token has been cancelled
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    /// Whether two tokens share the same flag
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Identifier of one scheduled entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Get the raw id
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Entry<E> {
    due: Instant,
    id: TimerId,
    token: CancelToken,
    event: E,
}

// BinaryHeap is a max-heap; invert so the earliest (then oldest) entry pops first.
impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E> Eq for Entry<E> {}

/// Timer queue for a single-threaded event loop
#[derive(Debug)]
pub struct Scheduler<E> {
    queue: BinaryHeap<Entry<E>>,
    next_id: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_id: 0,
        }
    }

    /// Schedule `event` to fire at `due`
    pub fn schedule_at(&mut self, due: Instant, token: &CancelToken, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        trace!("Scheduled timer {} at {:.1}ms", id.0, due.as_millis());
        self.queue.push(Entry {
            due,
            id,
            token: token.clone(),
            event,
        });
        id
    }

    /// Schedule `event` to fire `delay` after `now`
    pub fn schedule_after(
        &mut self,
        now: Instant,
        delay: Duration,
        token: &CancelToken,
        event: E,
    ) -> TimerId {
        self.schedule_at(now + delay, token, event)
    }

    /// Remove a single entry; returns `false` if it already fired or was removed
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|entry| entry.id != id);
        self.queue.len() != before
    }

    /// Pop every entry due at or before `now`, in due order
    ///
    /// Entries whose token was cancelled are discarded without being
    /// returned. Events scheduled while the caller handles the result are
    /// picked up by the next call.
    pub fn drain_due(&mut self, now: Instant) -> Vec<E> {
        let mut due = Vec::new();
        while let Some(entry) = self.queue.peek() {
            if entry.due.total_cmp(&now) == Ordering::Greater {
                break;
            }
            let Some(entry) = self.queue.pop() else {
                break;
            };
            if entry.token.is_cancelled() {
                trace!("Dropped cancelled timer {}", entry.id.0);
                continue;
            }
            due.push(entry.event);
        }
        due
    }

    /// Number of entries that can still fire
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|entry| !entry.token.is_cancelled())
            .count()
    }

    /// Earliest due time among entries that can still fire
    pub fn next_due(&self) -> Option<Instant> {
        self.queue
            .iter()
            .filter(|entry| !entry.token.is_cancelled())
            .map(|entry| entry.due)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Drop entries whose tokens were cancelled; returns how many were dropped
    pub fn purge_cancelled(&mut self) -> usize {
        let before = self.queue.len();
        self.queue.retain(|entry| !entry.token.is_cancelled());
        before - self.queue.len()
    }

    /// Whether no entry can fire any more
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
