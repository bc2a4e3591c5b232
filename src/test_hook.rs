use crate::hook::Hook;
use crate::logger::{Logger, LoggerConfig};
use crate::record::LogRecord;
use crate::sink::NoopSink;
use parking_lot::Mutex;
use std::error::Error;
use std::sync::Arc;

/// Hook that keeps every record it sees, in emission order.
///
/// Clones share the same buffer, so a clone can be handed to the logger
/// while the test keeps the other one.
#[derive(Clone, Default)]
pub struct CaptureHook {
    entries: Arc<Mutex<Vec<LogRecord>>>,
}

impl CaptureHook {
    pub fn new() -> Self {
        CaptureHook::default()
    }

    /// Attach a new capture hook to an existing logger.
    pub fn attach(logger: &Logger) -> Self {
        let hook = CaptureHook::new();
        logger.add_hook(Arc::new(hook.clone()));
        hook
    }

    /// Snapshot of all captured records.
    pub fn entries(&self) -> Vec<LogRecord> {
        self.entries.lock().clone()
    }

    pub fn last_entry(&self) -> Option<LogRecord> {
        self.entries.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn reset(&self) {
        self.entries.lock().clear();
    }
}

impl Hook for CaptureHook {
    fn fire(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.entries.lock().push(record.clone());
        Ok(())
    }
}

/// INFO logger for `service_name` whose output is discarded and whose
/// records are captured by the returned hook.
pub fn new_test_hook(service_name: impl Into<String>) -> (Logger, CaptureHook) {
    let hook = CaptureHook::new();
    let logger = Logger::builder(LoggerConfig::new(service_name, "info"))
        .sink(Arc::new(NoopSink))
        .hook(Arc::new(hook.clone()))
        .build();
    (logger, hook)
}
