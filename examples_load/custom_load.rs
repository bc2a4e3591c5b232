use std::sync::Arc;
use std::time::Instant;

use ft_logger::{FieldLogger, Logger, LoggerConfig, NoopSink};

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    let logger = Logger::builder(LoggerConfig::new("load-test", "info"))
        .sink(Arc::new(NoopSink))
        .build();

    let tasks: u64 = 8;
    let per_task: u64 = 25_000;
    let start = Instant::now();

    let handles: Vec<_> = (0..tasks)
        .map(|task| {
            let logger = logger.clone();
            tokio::spawn(async move {
                let base = logger.with_field("task", task);
                for i in 0..per_task {
                    base.with_monitoring_event("Load", "tid_load", "application/json")
                        .with_field("iteration", i)
                        .info("custom load test event");
                }
            })
        })
        .collect();

    for handle in handles {
        if let Err(e) = handle.await {
            eprintln!("load task failed: {}", e);
        }
    }

    let n = tasks * per_task;
    let elapsed = start.elapsed();
    println!("{} tasks: formatted {} lines in {:?} (~{:.0} lines/s)",
        tasks,
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
