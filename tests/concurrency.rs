use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use ft_logger::test_hook::CaptureHook;
use ft_logger::{FieldLogger, Logger, LoggerConfig, MemorySink};

fn shared_logger(sink: &MemorySink, hook: &CaptureHook) -> Logger {
    Logger::builder(LoggerConfig::new("test_service", "info"))
        .sink(Arc::new(sink.clone()))
        .hook(Arc::new(hook.clone()))
        .build()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tasks_log_concurrently_without_interleaving() {
    let sink = MemorySink::new();
    let hook = CaptureHook::new();
    let logger = shared_logger(&sink, &hook);

    let tasks = 8;
    let per_task = 200;
    let handles: Vec<_> = (0..tasks)
        .map(|task| {
            let logger = logger.clone();
            tokio::spawn(async move {
                let tid = format!("tid_{}", task);
                let base = logger.with_transaction_id(&tid);
                for i in 0..per_task {
                    base.with_field("iteration", i).info("concurrent message");
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let lines = sink.lines();
    assert_eq!(lines.len(), tasks * per_task);
    assert_eq!(hook.len(), tasks * per_task);

    let mut per_tid: HashMap<String, usize> = HashMap::new();
    for line in &lines {
        let json: serde_json::Value = serde_json::from_str(line).expect("every line is whole JSON");
        let tid = json["transaction_id"].as_str().unwrap().to_string();
        *per_tid.entry(tid).or_default() += 1;
    }
    assert_eq!(per_tid.len(), tasks);
    assert!(per_tid.values().all(|count| *count == per_task));
}

#[test]
fn branches_shared_across_threads_stay_independent() {
    let sink = MemorySink::new();
    let hook = CaptureHook::new();
    let logger = shared_logger(&sink, &hook);
    let base = logger.with_monitoring_event("an-event", "tid_test", "some-content");

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let base = base.clone();
            thread::spawn(move || {
                base.with_field(format!("thread_{}", n), n).info("from thread");
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(base.fields().len(), 4);
    for record in hook.entries() {
        assert_eq!(record.fields.len(), 5);
    }
}
