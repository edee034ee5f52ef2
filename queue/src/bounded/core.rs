//! Lock-protected state shared by every handle to a `BoundedBlockingQueue`,
//! plus the condition-variable wait loop used by all blocking operations.

use super::Mode;
use crate::telemetry;

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::VecDeque;
use std::time::Instant;

const MAX_PREALLOCATED_SLOTS: usize = 4096;

/// State guarded by the queue's mutex.
#[derive(Debug)]
pub(crate) struct QueueState<T> {
  pub(crate) buffer: VecDeque<T>,
  pub(crate) mode: Mode,
  /// Bumped by every `unblock()`. A waiter that sees a different value after
  /// waking was released by an unblock, even if `set_block()` already ran.
  pub(crate) unblock_epoch: u64,
}

/// Which side of the queue an operation waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
  /// Needs a free slot (push).
  Push,
  /// Needs a buffered item (pop, peek).
  Pop,
}

/// How long an operation is allowed to wait.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Wait {
  /// Never suspend, regardless of mode.
  Never,
  /// Suspend while the mode is `Blocking`.
  Indefinitely,
  /// Suspend while the mode is `Blocking`, but not past the deadline.
  Until(Instant),
}

/// Why an operation could not proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Refusal {
  /// Full (push) or empty (pop) and not allowed to wait, or released by `unblock()`.
  Rejected,
  /// The deadline passed first.
  TimedOut,
}

pub(crate) struct QueueShared<T> {
  pub(crate) capacity: usize,
  pub(crate) internal: Mutex<QueueState<T>>,
  /// Push-side waiters: "space became available".
  pub(crate) not_full: Condvar,
  /// Pop/peek-side waiters: "item became available".
  pub(crate) not_empty: Condvar,
}

impl<T> QueueShared<T> {
  pub(crate) fn new(capacity: usize) -> Self {
    QueueShared {
      capacity,
      internal: Mutex::new(QueueState {
        // Very large capacities grow on demand instead of reserving up front.
        buffer: VecDeque::with_capacity(capacity.min(MAX_PREALLOCATED_SLOTS)),
        mode: Mode::Blocking,
        unblock_epoch: 0,
      }),
      not_full: Condvar::new(),
      not_empty: Condvar::new(),
    }
  }

  #[inline]
  fn is_blocked(&self, state: &QueueState<T>, side: Side) -> bool {
    match side {
      Side::Push => state.buffer.len() >= self.capacity,
      Side::Pop => state.buffer.is_empty(),
    }
  }

  #[inline]
  fn condvar(&self, side: Side) -> &Condvar {
    match side {
      Side::Push => &self.not_full,
      Side::Pop => &self.not_empty,
    }
  }

  /// Locks the queue and waits until `side` can proceed.
  ///
  /// On success the guard is returned still held, so the caller performs its
  /// insert/remove atomically with the check. The lock is released while
  /// parked on the condition variable. Every wake re-validates the condition,
  /// so spurious and stolen wakeups are harmless.
  pub(crate) fn lock_ready(
    &self,
    side: Side,
    wait: Wait,
    location: &'static str,
  ) -> Result<MutexGuard<'_, QueueState<T>>, Refusal> {
    let mut guard = self.internal.lock();
    let entry_epoch = guard.unblock_epoch;
    let mut timed_out = false;

    loop {
      if !self.is_blocked(&guard, side) {
        return Ok(guard);
      }

      let released = guard.mode == Mode::Unblocked || guard.unblock_epoch != entry_epoch;
      if released || matches!(wait, Wait::Never) {
        telemetry::log_event(Some(guard.buffer.len()), location, telemetry::EVT_REJECTED, None);
        telemetry::increment_counter(location, telemetry::CTR_REJECTIONS);
        return Err(Refusal::Rejected);
      }
      if timed_out {
        telemetry::log_event(Some(guard.buffer.len()), location, telemetry::EVT_TIMED_OUT, None);
        return Err(Refusal::TimedOut);
      }

      telemetry::log_event(Some(guard.buffer.len()), location, telemetry::EVT_PARK, None);
      telemetry::increment_counter(location, telemetry::CTR_PARKS);

      let condvar = self.condvar(side);
      match wait {
        Wait::Indefinitely => condvar.wait(&mut guard),
        Wait::Until(deadline) => timed_out = condvar.wait_until(&mut guard, deadline).timed_out(),
        Wait::Never => unreachable!("non-waiting calls return before parking"),
      }

      telemetry::log_event(Some(guard.buffer.len()), location, telemetry::EVT_WOKE, None);
    }
  }

  /// Switches to `Unblocked` and wakes every waiter on both sides.
  pub(crate) fn unblock(&self) {
    {
      let mut guard = self.internal.lock();
      guard.mode = Mode::Unblocked;
      guard.unblock_epoch = guard.unblock_epoch.wrapping_add(1);
      telemetry::log_event(
        Some(guard.buffer.len()),
        telemetry::LOC_MODE,
        telemetry::EVT_UNBLOCK,
        None,
      );
    }
    telemetry::increment_counter(telemetry::LOC_MODE, telemetry::CTR_UNBLOCKS);

    // Broadcast outside the lock so woken threads don't immediately contend on it.
    self.not_full.notify_all();
    self.not_empty.notify_all();
  }

  /// Switches back to `Blocking`. Wakes nobody.
  pub(crate) fn set_block(&self) {
    let mut guard = self.internal.lock();
    guard.mode = Mode::Blocking;
    telemetry::log_event(
      Some(guard.buffer.len()),
      telemetry::LOC_MODE,
      telemetry::EVT_SET_BLOCK,
      None,
    );
  }
}
