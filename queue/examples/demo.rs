// examples/demo.rs
use fibre_queue::BoundedBlockingQueue;

#[derive(Default)]
struct WorkItem {
  x: i32,
  stuff: String,
}

fn main() {
  let test_queue = BoundedBlockingQueue::new(5);

  if test_queue.push(42).is_err() {
    eprintln!("push rejected");
    std::process::exit(1);
  }

  let pop_value = match test_queue.pop() {
    Ok(value) => value,
    Err(e) => {
      eprintln!("pop failed: {}", e);
      std::process::exit(1);
    }
  };

  println!("Pushed and popped value: {}", pop_value);

  // Move-only items work for push/pop. `peek` needs `T: Clone`, so this
  // would not compile:
  //
  // let work_queue = BoundedBlockingQueue::<WorkItem>::new(5);
  // work_queue.push(WorkItem::default()).ok();
  // let v = work_queue.peek();
  let work_queue = BoundedBlockingQueue::<WorkItem>::new(5);
  let item = WorkItem {
    x: 7,
    stuff: "move-only".to_string(),
  };
  if work_queue.push(item).is_err() {
    eprintln!("work item push rejected");
    std::process::exit(1);
  }
  match work_queue.pop() {
    Ok(item) => println!("Popped work item: x={} stuff={}", item.x, item.stuff),
    Err(e) => {
      eprintln!("work item pop failed: {}", e);
      std::process::exit(1);
    }
  }

  fibre_queue::telemetry::print_telemetry_report();
}
