// benches/bounded_sync.rs

use bench_matrix::{
  criterion_runner::sync_suite::SyncBenchmarkSuite, AbstractCombination, MatrixCellValue,
};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::{
  sync::Arc,
  thread,
  time::{Duration, Instant},
};

use fibre_queue::BoundedBlockingQueue;

const ITEM_VALUE: u64 = 42;

#[derive(Debug, Clone)]
struct QueueBenchConfig {
  capacity: usize,
  num_producers: usize,
  num_items: usize,
}

#[derive(Default, Debug)]
struct BenchContext {
  items_processed_total: usize,
}

struct QueueState {
  queue: Arc<BoundedBlockingQueue<u64>>,
}

fn extract_queue_config(combo: &AbstractCombination) -> Result<QueueBenchConfig, String> {
  let capacity = combo.get_u64(0)? as usize;
  let num_producers = (combo.get_u64(1)? as usize).max(1);
  let num_items = (combo.get_u64(2)? as usize).max(1);

  // A zero-capacity queue never accepts an item, the run would hang.
  if capacity == 0 {
    return Err(format!(
      "Skipping combination: capacity cannot be 0. Producers: {}, Items: {}",
      num_producers, num_items
    ));
  }

  Ok(QueueBenchConfig {
    capacity,
    num_producers,
    num_items,
  })
}

fn setup_fn_queue(cfg: &QueueBenchConfig) -> Result<(BenchContext, QueueState), String> {
  Ok((
    BenchContext::default(),
    QueueState {
      queue: Arc::new(BoundedBlockingQueue::new(cfg.capacity)),
    },
  ))
}

// N producers push, the bench thread pops everything.
fn benchmark_logic_queue(
  mut ctx: BenchContext,
  state: QueueState,
  cfg: &QueueBenchConfig,
) -> (BenchContext, QueueState, Duration) {
  let items_per_producer = cfg.num_items / cfg.num_producers;
  let total_items = items_per_producer * cfg.num_producers;

  let start_time = Instant::now();
  let producers: Vec<_> = (0..cfg.num_producers)
    .map(|_| {
      let queue = Arc::clone(&state.queue);
      thread::spawn(move || {
        for _ in 0..items_per_producer {
          queue.push(ITEM_VALUE).unwrap();
        }
      })
    })
    .collect();

  for _ in 0..total_items {
    let _ = state.queue.pop().unwrap();
  }
  for handle in producers {
    handle.join().unwrap();
  }
  let duration = start_time.elapsed();

  ctx.items_processed_total += total_items;
  (ctx, state, duration)
}

fn teardown_queue(_ctx: BenchContext, _state: QueueState, _cfg: &QueueBenchConfig) {}

fn bounded_sync_benches(c: &mut Criterion) {
  let parameter_axes = vec![
    vec![
      MatrixCellValue::Unsigned(1),
      MatrixCellValue::Unsigned(128),
      MatrixCellValue::Unsigned(1024),
    ], // Capacity
    vec![
      MatrixCellValue::Unsigned(1),
      MatrixCellValue::Unsigned(4),
    ], // Producers
    vec![
      MatrixCellValue::Unsigned(10_000),
      MatrixCellValue::Unsigned(100_000),
    ], // NumItems
  ];
  let parameter_names = vec!["Cap".to_string(), "Prod".to_string(), "Items".to_string()];

  SyncBenchmarkSuite::new(
    c,
    "BoundedBlockingQueue".to_string(),
    Some(parameter_names),
    parameter_axes,
    Box::new(extract_queue_config),
    setup_fn_queue,
    benchmark_logic_queue,
    teardown_queue,
  )
  .throughput(|cfg: &QueueBenchConfig| Throughput::Elements(cfg.num_items as u64))
  .run();
}

criterion_group!(benches, bounded_sync_benches);
criterion_main!(benches);
