//! Structured JSON logging for FT services.
//!
//! A [`Logger`] owns the service name, minimum level and output key names.
//! `with_*` calls build up an immutable [`LogEntry`], and a terminal call
//! (`info`, `error`, ...) writes one JSON line:
//!
//! ```
//! use std::sync::Arc;
//! use ft_logger::{FieldLogger, Logger, LoggerConfig, MemorySink};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder(LoggerConfig::new("content-mapper", "info"))
//!     .sink(Arc::new(sink.clone()))
//!     .build();
//!
//! logger
//!     .with_monitoring_event("Map", "tid_123", "Article")
//!     .with_valid_flag(true)
//!     .info("mapped content");
//!
//! let lines = sink.json_lines();
//! let line = &lines[0];
//! assert_eq!(line["transaction_id"], "tid_123");
//! assert_eq!(line["isValid"], "true");
//! ```

pub mod assert;
pub mod entry;
pub mod env;
pub mod error;
pub mod format;
pub mod global;
pub mod hook;
pub mod keys;
pub mod level;
pub mod logger;
pub mod output;
pub mod record;
pub mod sink;
pub mod test_hook;

#[cfg(feature = "tracing-bridge")]
pub mod init;
#[cfg(feature = "tracing-bridge")]
pub mod layer;

pub use entry::{FieldLogger, LogEntry};
pub use error::{ConfigError, FormatError, LogError};
pub use keys::{KeyNameOverrides, KeyNames};
pub use level::Level;
pub use logger::{Logger, LoggerBuilder, LoggerConfig, ValidFlagEncoding};
pub use record::{FieldValue, LogRecord};
pub use sink::{LogSink, MemorySink, NoopSink, WriterSink};
