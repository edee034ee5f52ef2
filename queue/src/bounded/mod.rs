// src/bounded/mod.rs

//! A fixed-capacity, lock-based blocking queue with a global unblock switch.
//!
//! [`BoundedBlockingQueue`] is a classic monitor: a single `parking_lot::Mutex`
//! guards the buffer and the [`Mode`] flag, and two `parking_lot::Condvar`s
//! park producers waiting for space and consumers waiting for items.
//!
//! In [`Mode::Blocking`] (the default) `push` waits while the queue is full
//! and `pop`/`peek` wait while it is empty. Calling [`unblock`] switches to
//! [`Mode::Unblocked`] and wakes every waiter at once; from then on nothing
//! waits and full/empty conditions are reported immediately as errors. This is
//! the shutdown path: producers and consumers don't need to be cancelled one
//! by one. [`set_block`] re-arms blocking for later calls.
//!
//! ### Sharing
//!
//! All operations take `&self`. Share the queue between threads with an
//! `Arc`; the borrow rules guarantee it cannot be dropped while any thread is
//! still parked inside one of its methods.
//!
//! [`unblock`]: BoundedBlockingQueue::unblock
//! [`set_block`]: BoundedBlockingQueue::set_block

mod core;


use self::core::{QueueShared, Refusal, Side, Wait};
use crate::error::{PopError, PopTimeoutError, PushError, PushTimeoutError};
use crate::telemetry;

use std::fmt;
use std::time::{Duration, Instant};

/// Whether full/empty operations suspend the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
  /// Callers wait on a full (push) or empty (pop/peek) queue.
  #[default]
  Blocking,
  /// Callers never wait; full/empty is reported immediately.
  Unblocked,
}

/// A bounded, thread-safe FIFO queue.
///
/// A capacity of `0` is accepted: such a queue is always full, so every push
/// fails once the queue is unblocked and waits forever until then.
pub struct BoundedBlockingQueue<T> {
  shared: QueueShared<T>,
}

impl<T> BoundedBlockingQueue<T> {
  /// Creates an empty queue holding at most `capacity` items, in [`Mode::Blocking`].
  pub fn new(capacity: usize) -> Self {
    BoundedBlockingQueue {
      shared: QueueShared::new(capacity),
    }
  }

  // --- Push ---

  /// Appends `item` at the tail, waiting for space while the queue is full
  /// and in [`Mode::Blocking`].
  ///
  /// # Errors
  ///
  /// Returns `Err(PushError::Full(item))` if the queue is full and unblocked,
  /// including when [`unblock`](Self::unblock) is called while this call is
  /// waiting. The item is handed back untouched.
  pub fn push(&self, item: T) -> Result<(), PushError<T>> {
    self
      .push_inner(item, Wait::Indefinitely)
      .map_err(|(item, _)| PushError::Full(item))
  }

  /// Attempts to append `item` without waiting, whatever the current mode.
  pub fn try_push(&self, item: T) -> Result<(), PushError<T>> {
    self
      .push_inner(item, Wait::Never)
      .map_err(|(item, _)| PushError::Full(item))
  }

  /// Like [`push`](Self::push), but waits for at most `timeout`.
  ///
  /// # Errors
  ///
  /// - `Err(PushTimeoutError::Timeout(item))` if no space freed up in time.
  /// - `Err(PushTimeoutError::Full(item))` if the queue is full and unblocked.
  pub fn push_timeout(&self, item: T, timeout: Duration) -> Result<(), PushTimeoutError<T>> {
    self
      .push_inner(item, deadline_after(timeout))
      .map_err(|(item, refusal)| match refusal {
        Refusal::Rejected => PushTimeoutError::Full(item),
        Refusal::TimedOut => PushTimeoutError::Timeout(item),
      })
  }

  fn push_inner(&self, item: T, wait: Wait) -> Result<(), (T, Refusal)> {
    match self.shared.lock_ready(Side::Push, wait, telemetry::LOC_PUSH) {
      Ok(mut guard) => {
        guard.buffer.push_back(item);
        drop(guard);
        self.shared.not_empty.notify_one();
        Ok(())
      }
      Err(refusal) => Err((item, refusal)),
    }
  }

  // --- Pop ---

  /// Removes and returns the head item, waiting while the queue is empty and
  /// in [`Mode::Blocking`].
  ///
  /// # Errors
  ///
  /// Returns `Err(PopError::Empty)` if the queue is empty and unblocked,
  /// including when [`unblock`](Self::unblock) is called while this call is
  /// waiting.
  pub fn pop(&self) -> Result<T, PopError> {
    self.pop_inner(Wait::Indefinitely).map_err(|_| PopError::Empty)
  }

  /// Attempts to remove the head item without waiting, whatever the current mode.
  pub fn try_pop(&self) -> Result<T, PopError> {
    self.pop_inner(Wait::Never).map_err(|_| PopError::Empty)
  }

  /// Like [`pop`](Self::pop), but waits for at most `timeout`.
  pub fn pop_timeout(&self, timeout: Duration) -> Result<T, PopTimeoutError> {
    self.pop_inner(deadline_after(timeout)).map_err(timeout_error)
  }

  fn pop_inner(&self, wait: Wait) -> Result<T, Refusal> {
    let mut guard = self.shared.lock_ready(Side::Pop, wait, telemetry::LOC_POP)?;
    let item = guard.buffer.pop_front();
    drop(guard);
    match item {
      Some(item) => {
        self.shared.not_full.notify_one();
        Ok(item)
      }
      // lock_ready only hands back the guard when the buffer is non-empty.
      None => Err(Refusal::Rejected),
    }
  }

  // --- Mode ---

  /// Switches to [`Mode::Unblocked`] and wakes every waiting thread.
  ///
  /// Waiters re-check the queue: a pusher that finds space still pushes, a
  /// popper that finds an item still pops, everyone else returns their
  /// full/empty error. Calling this again is harmless.
  pub fn unblock(&self) {
    self.shared.unblock();
  }

  /// Switches back to [`Mode::Blocking`].
  ///
  /// Nobody is woken. Calls that were already released by an earlier
  /// [`unblock`](Self::unblock) still return their error.
  pub fn set_block(&self) {
    self.shared.set_block();
  }

  /// Returns the current mode.
  pub fn mode(&self) -> Mode {
    self.shared.internal.lock().mode
  }

  /// Returns `true` while the queue is in [`Mode::Blocking`].
  #[inline]
  pub fn is_blocking(&self) -> bool {
    self.mode() == Mode::Blocking
  }

  // --- Observers ---
  // len/is_empty/is_full are snapshots; they may be stale by the time they return.

  /// Returns the fixed capacity given at construction.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.shared.capacity
  }

  /// Returns the number of items currently buffered.
  #[inline]
  pub fn len(&self) -> usize {
    self.shared.internal.lock().buffer.len()
  }

  /// Returns `true` if no items are buffered.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns `true` if the buffer holds `capacity()` items.
  #[inline]
  pub fn is_full(&self) -> bool {
    self.len() >= self.shared.capacity
  }
}

impl<T: Clone> BoundedBlockingQueue<T> {
  /// Returns a clone of the head item without removing it, waiting while the
  /// queue is empty and in [`Mode::Blocking`].
  ///
  /// Only available when `T: Clone`. A queue of move-only items can push and
  /// pop, but has no `peek`:
  ///
  /// ```compile_fail
  /// use fibre_queue::BoundedBlockingQueue;
  ///
  /// struct WorkItem {
  ///   x: i32,
  /// }
  ///
  /// let work_queue = BoundedBlockingQueue::new(5);
  /// work_queue.push(WorkItem { x: 1 }).ok();
  /// let _ = work_queue.peek();
  /// ```
  ///
  /// ```
  /// use fibre_queue::BoundedBlockingQueue;
  ///
  /// let queue = BoundedBlockingQueue::new(5);
  /// queue.push(String::from("head")).unwrap();
  /// assert_eq!(queue.peek().unwrap(), "head");
  /// assert_eq!(queue.len(), 1);
  /// ```
  ///
  /// # Errors
  ///
  /// Returns `Err(PopError::Empty)` under the same conditions as [`pop`](Self::pop).
  pub fn peek(&self) -> Result<T, PopError> {
    self.peek_inner(Wait::Indefinitely).map_err(|_| PopError::Empty)
  }

  /// Attempts to clone the head item without waiting, whatever the current mode.
  pub fn try_peek(&self) -> Result<T, PopError> {
    self.peek_inner(Wait::Never).map_err(|_| PopError::Empty)
  }

  /// Like [`peek`](Self::peek), but waits for at most `timeout`.
  pub fn peek_timeout(&self, timeout: Duration) -> Result<T, PopTimeoutError> {
    self.peek_inner(deadline_after(timeout)).map_err(timeout_error)
  }

  fn peek_inner(&self, wait: Wait) -> Result<T, Refusal> {
    let guard = self.shared.lock_ready(Side::Pop, wait, telemetry::LOC_PEEK)?;
    let item = guard.buffer.front().cloned();
    drop(guard);
    match item {
      Some(item) => {
        // The wakeup that got us here may have been meant for a popper. The head
        // is still there, so pass it on.
        self.shared.not_empty.notify_one();
        Ok(item)
      }
      None => Err(Refusal::Rejected),
    }
  }

  /// Appends a clone of `item`, with the same waiting rules as [`push`](Self::push).
  ///
  /// The clone is only made once a slot is secured, so a rejected call costs
  /// no allocation.
  ///
  /// # Errors
  ///
  /// Returns `Err(PushError::Full(item))` with the borrowed item if the queue
  /// is full and unblocked.
  pub fn push_cloned<'a>(&self, item: &'a T) -> Result<(), PushError<&'a T>> {
    match self.shared.lock_ready(Side::Push, Wait::Indefinitely, telemetry::LOC_PUSH) {
      Ok(mut guard) => {
        guard.buffer.push_back(item.clone());
        drop(guard);
        self.shared.not_empty.notify_one();
        Ok(())
      }
      Err(_) => Err(PushError::Full(item)),
    }
  }
}

impl<T> fmt::Debug for BoundedBlockingQueue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let guard = self.shared.internal.lock();
    f.debug_struct("BoundedBlockingQueue")
      .field("capacity", &self.shared.capacity)
      .field("len", &guard.buffer.len())
      .field("mode", &guard.mode)
      .finish()
  }
}

fn deadline_after(timeout: Duration) -> Wait {
  // A timeout too large to represent as an Instant is as good as no timeout.
  match Instant::now().checked_add(timeout) {
    Some(deadline) => Wait::Until(deadline),
    None => Wait::Indefinitely,
  }
}

fn timeout_error(refusal: Refusal) -> PopTimeoutError {
  match refusal {
    Refusal::Rejected => PopTimeoutError::Empty,
    Refusal::TimedOut => PopTimeoutError::Timeout,
  }
}
