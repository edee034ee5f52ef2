//! A bounded, thread-safe blocking queue for handing work between threads.
//!
//! `fibre_queue` provides [`BoundedBlockingQueue`], a fixed-capacity FIFO that
//! producers and consumers share by reference. Full and empty conditions park
//! the caller until the queue changes, and a single [`unblock`] call releases
//! every parked thread at once for a clean shutdown.
//!
//! ```
//! use fibre_queue::BoundedBlockingQueue;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(BoundedBlockingQueue::new(5));
//!
//! let consumer = {
//!   let queue = Arc::clone(&queue);
//!   thread::spawn(move || {
//!     let mut total = 0;
//!     // Returns Err once the queue is drained and unblocked.
//!     while let Ok(value) = queue.pop() {
//!       total += value;
//!     }
//!     total
//!   })
//! };
//!
//! for i in 1..=10 {
//!   queue.push(i).unwrap();
//! }
//! while !queue.is_empty() {
//!   thread::yield_now();
//! }
//! queue.unblock();
//! assert_eq!(consumer.join().unwrap(), 55);
//! ```
//!
//! [`unblock`]: BoundedBlockingQueue::unblock

pub mod bounded;
pub mod error;
pub mod telemetry;

pub use bounded::{BoundedBlockingQueue, Mode};
pub use error::{PopError, PopTimeoutError, PushError, PushTimeoutError};
