// src/telemetry.rs

//! Optional instrumentation for debugging wait/wake behaviour.
//!
//! With the `fibre_telemetry` feature enabled, every call records into a global
//! collector that can be dumped with [`print_telemetry_report`]. Without the
//! feature all functions are empty and inlined away.
//!
//! The collector keeps every event until [`clear_telemetry`] is called, and a
//! busy queue records several events per operation. Call [`clear_telemetry`]
//! between runs (and before long stress loops) to keep memory bounded.

#[cfg(feature = "fibre_telemetry")]
pub mod enabled {
  use parking_lot::Mutex;
  use std::collections::HashMap;
  use std::fmt;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::thread::{self, ThreadId};
  use std::time::Instant;
  use tokio::task::Id as TokioTaskId;

  static NEXT_EVENT_SEQUENCE_ID: AtomicUsize = AtomicUsize::new(0);

  #[derive(Clone)]
  pub struct TelemetryEvent {
    pub seq_id: usize,
    pub timestamp: Instant,
    pub os_thread_id: ThreadId,
    pub thread_name: Option<String>,
    pub tokio_task_id: Option<TokioTaskId>, // Set when called from inside a Tokio task
    pub queue_len: Option<usize>,           // Buffer length observed under the lock
    pub location: &'static str,             // e.g. "BoundedBlockingQueue::push"
    pub event_type: &'static str,           // e.g. "Park", "Woke"
    pub message: Option<String>,
  }

  impl fmt::Debug for TelemetryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("TelemetryEvent")
        .field("seq", &self.seq_id)
        .field("os_tid", &self.os_thread_id)
        .field("thread", &self.thread_name.as_deref().unwrap_or("<unnamed>"))
        .field("tokio_tid", &self.tokio_task_id.map(|id| id.to_string()).as_deref().unwrap_or("N/A"))
        .field("len", &self.queue_len)
        .field("loc", &self.location)
        .field("evt", &self.event_type)
        .field("msg", &self.message.as_deref().unwrap_or(""))
        .finish()
    }
  }

  type CounterKey = (&'static str, &'static str); // (location, counter_name)

  struct CollectorData {
    events: Vec<TelemetryEvent>,
    counters: HashMap<CounterKey, usize>,
    start_time: Instant,
  }

  impl CollectorData {
    fn new() -> Self {
      CollectorData {
        events: Vec::new(),
        counters: HashMap::new(),
        start_time: Instant::now(),
      }
    }
  }

  lazy_static::lazy_static! {
      static ref GLOBAL_COLLECTOR: Mutex<CollectorData> = Mutex::new(CollectorData::new());
  }

  pub fn log_event_fn(
    queue_len: Option<usize>,
    location: &'static str,
    event_type: &'static str,
    message: Option<String>,
  ) {
    let current = thread::current();
    let event = TelemetryEvent {
      seq_id: NEXT_EVENT_SEQUENCE_ID.fetch_add(1, Ordering::Relaxed),
      timestamp: Instant::now(),
      os_thread_id: current.id(),
      thread_name: current.name().map(str::to_owned),
      tokio_task_id: tokio::task::try_id(),
      queue_len,
      location,
      event_type,
      message,
    };
    GLOBAL_COLLECTOR.lock().events.push(event);
  }

  pub fn increment_counter_fn(location: &'static str, counter_name: &'static str) {
    *GLOBAL_COLLECTOR
      .lock()
      .counters
      .entry((location, counter_name))
      .or_insert(0) += 1;
  }

  /// Returns the current value of a counter, `0` if it was never incremented.
  pub fn counter_value_fn(location: &'static str, counter_name: &'static str) -> usize {
    GLOBAL_COLLECTOR
      .lock()
      .counters
      .get(&(location, counter_name))
      .copied()
      .unwrap_or(0)
  }

  pub fn print_telemetry_report_fn() {
    let collector = GLOBAL_COLLECTOR.lock();
    println!("\n--- Fibre Queue Telemetry Report (Feature: fibre_telemetry) ---");
    println!("Report generated at: {:?}", Instant::now());
    println!("Collection started at: {:?}", collector.start_time);

    if collector.events.is_empty() {
      println!("\n[Events] No detailed events recorded.");
    } else {
      println!("\n[Events] Recorded Events ({}):", collector.events.len());
      let mut sorted_events = collector.events.clone();
      // Timestamps can collide, the sequence id cannot.
      sorted_events.sort_by_key(|e| e.seq_id);

      for event in sorted_events.iter() {
        let time_since_start = event.timestamp.duration_since(collector.start_time);
        let tokio_tid_str = event
          .tokio_task_id
          .map(|id| id.to_string())
          .unwrap_or_else(|| "---".to_string());

        println!(
          "  +{:<10.6}s [Seq:{:<5}] Thread:{:<12} TaskID:{:<6} Len:{:<6} Loc:{:<35} Evt:{:<20} Msg: {}",
          time_since_start.as_secs_f64(),
          event.seq_id,
          event.thread_name.as_deref().unwrap_or("<unnamed>"),
          tokio_tid_str,
          event.queue_len.map_or_else(|| "N/A".to_string(), |len| len.to_string()),
          event.location,
          event.event_type,
          event.message.as_deref().unwrap_or("")
        );
      }
    }

    if collector.counters.is_empty() {
      println!("\n[Counters] No counters recorded.");
    } else {
      println!("\n[Counters] Recorded Counters ({}):", collector.counters.len());
      let mut sorted_counters: Vec<_> = collector.counters.iter().collect();
      sorted_counters.sort_by_key(|(k, _v)| *k);
      for ((loc, name), count) in sorted_counters {
        println!("  Loc:{:<35} Counter:{:<25} Value: {}", loc, name, count);
      }
    }
    println!("\n--- End of Telemetry Report ---");
  }

  pub fn clear_telemetry_fn() {
    let mut collector = GLOBAL_COLLECTOR.lock();
    collector.events.clear();
    collector.counters.clear();
    collector.start_time = Instant::now();
    NEXT_EVENT_SEQUENCE_ID.store(0, Ordering::Relaxed);
  }
} // mod enabled

#[cfg(not(feature = "fibre_telemetry"))]
pub mod disabled {
  #[inline(always)]
  pub fn log_event_fn(
    _queue_len: Option<usize>,
    _location: &'static str,
    _event_type: &'static str,
    _message: Option<String>,
  ) {
  }
  #[inline(always)]
  pub fn increment_counter_fn(_location: &'static str, _counter_name: &'static str) {}
  #[inline(always)]
  pub fn counter_value_fn(_location: &'static str, _counter_name: &'static str) -> usize {
    0
  }
  #[inline(always)]
  pub fn print_telemetry_report_fn() {}
  #[inline(always)]
  pub fn clear_telemetry_fn() {}
}

#[cfg(feature = "fibre_telemetry")]
pub use enabled::{
  clear_telemetry_fn as clear_telemetry, counter_value_fn as counter_value,
  increment_counter_fn as increment_counter, log_event_fn as log_event,
  print_telemetry_report_fn as print_telemetry_report,
};

#[cfg(not(feature = "fibre_telemetry"))]
pub use disabled::{
  clear_telemetry_fn as clear_telemetry, counter_value_fn as counter_value,
  increment_counter_fn as increment_counter, log_event_fn as log_event,
  print_telemetry_report_fn as print_telemetry_report,
};

// Locations and event names used by the queue.
pub const LOC_PUSH: &str = "BoundedBlockingQueue::push";
pub const LOC_POP: &str = "BoundedBlockingQueue::pop";
pub const LOC_PEEK: &str = "BoundedBlockingQueue::peek";
pub const LOC_MODE: &str = "BoundedBlockingQueue::mode";

pub const EVT_PARK: &str = "Park";
pub const EVT_WOKE: &str = "Woke";
pub const EVT_REJECTED: &str = "Rejected";
pub const EVT_TIMED_OUT: &str = "TimedOut";
pub const EVT_UNBLOCK: &str = "Unblock";
pub const EVT_SET_BLOCK: &str = "SetBlock";

pub const CTR_PARKS: &str = "parks";
pub const CTR_REJECTIONS: &str = "rejections";
pub const CTR_UNBLOCKS: &str = "unblocks";
