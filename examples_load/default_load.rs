use std::sync::Arc;
use std::time::Instant;

use ft_logger::{FieldLogger, Logger, LoggerConfig, NoopSink};

#[tokio::main]
async fn main() {
    let logger = Logger::builder(LoggerConfig::new("load-test", "info"))
        .sink(Arc::new(NoopSink))
        .build();

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        logger
            .with_transaction_id("tid_load")
            .with_field("iteration", i)
            .error("default load test error");
    }

    let elapsed = start.elapsed();
    println!("default config: formatted {} lines in {:?} (~{:.0} lines/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
