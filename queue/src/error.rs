// src/error.rs

use core::fmt;

// Errors that hand the rejected item back to the caller share the same
// into_inner/Display/Error boilerplate.
macro_rules! impl_error_for_enum_with_inner {
    (
        $enum_name:ident < $generic_param:ident >,
        $($variant:ident ( $message:expr ) ),+
        $(,)?
    ) => {
        impl<$generic_param> $enum_name<$generic_param> {
            /// Consumes the error, returning the item that was not enqueued.
            #[inline]
            pub fn into_inner(self) -> $generic_param {
                match self {
                    $( $enum_name::$variant(v) => v, )+
                }
            }
        }

        impl<$generic_param> fmt::Display for $enum_name<$generic_param> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( $enum_name::$variant(_) => f.write_str($message), )+
                }
            }
        }

        impl<$generic_param: fmt::Debug> std::error::Error for $enum_name<$generic_param> {}
    };
}

/// Error returned by `push`, `try_push` and `push_cloned` when the item could
/// not be enqueued.
///
/// The queue was full and either the call does not wait (`try_push`), the
/// queue is unblocked, or the wait was cut short by `unblock()`. The rejected
/// item is handed back so it is never dropped silently.
#[derive(PartialEq, Eq, Clone)]
pub enum PushError<T> {
  /// The queue is full and will not wait for space.
  Full(T),
}

impl<T> fmt::Debug for PushError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PushError::Full(_) => write!(f, "PushError::Full(..)"),
    }
  }
}

impl_error_for_enum_with_inner!(PushError<T>, Full("queue full"));

/// Error returned by `push_timeout`.
#[derive(PartialEq, Eq, Clone)]
pub enum PushTimeoutError<T> {
  /// The timeout elapsed before space became available.
  Timeout(T),
  /// The queue is unblocked and still full.
  Full(T),
}

impl<T> fmt::Debug for PushTimeoutError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PushTimeoutError::Timeout(_) => write!(f, "PushTimeoutError::Timeout(..)"),
      PushTimeoutError::Full(_) => write!(f, "PushTimeoutError::Full(..)"),
    }
  }
}

impl_error_for_enum_with_inner!(
  PushTimeoutError<T>,
  Timeout("push operation timed out"),
  Full("queue full"),
);

/// Error returned by `pop`, `peek` and their `try_` forms when no item could
/// be taken.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PopError {
  /// The queue is empty and will not wait for an item.
  Empty,
}
impl std::error::Error for PopError {}
impl fmt::Display for PopError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PopError::Empty => write!(f, "queue empty"),
    }
  }
}

/// Error returned by `pop_timeout` and `peek_timeout`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PopTimeoutError {
  /// The timeout elapsed before an item became available.
  Timeout,
  /// The queue is unblocked and still empty.
  Empty,
}

impl std::error::Error for PopTimeoutError {}
impl fmt::Display for PopTimeoutError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PopTimeoutError::Timeout => write!(f, "pop operation timed out"),
      PopTimeoutError::Empty => write!(f, "queue empty"),
    }
  }
}
