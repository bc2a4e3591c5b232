use std::io;
use std::sync::Arc;

use ft_logger::{FieldLogger, LogSink, Logger, LoggerConfig};

/// Example of sending lines somewhere this crate does not know about by
/// implementing the `LogSink` trait directly. Imagine this forwards to a
/// proprietary log shipper.
struct PrefixedStdoutSink;

impl LogSink for PrefixedStdoutSink {
    fn write(&self, line: &[u8]) -> io::Result<()> {
        // Here you would call your own client library.
        // For the sake of example we just print the line.
        print!("[my-shipper] {}", String::from_utf8_lossy(line));
        Ok(())
    }
}

fn main() {
    let sink: Arc<dyn LogSink> = Arc::new(PrefixedStdoutSink);
    let logger = Logger::builder(LoggerConfig::new("custom-sink-example", "info"))
        .sink(sink)
        .build();

    logger.log_service_started(8080);
    logger
        .with_categorised_event("Publish", "content", "article published", "tid_example")
        .info("custom sink example finished");
}
