use crate::entry::{FieldLogger, LogEntry};
use crate::error::LogError;
use crate::format::{FtJsonFormatter, Formatter, TextFormatter};
use crate::hook::Hook;
use crate::keys::{KeyNameOverrides, KeyNames};
use crate::level::Level;
use crate::output::{make_sink, OutputKind};
use crate::record::{Fields, LogRecord};
use crate::sink::LogSink;
use parking_lot::RwLock;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

pub(crate) const SERVICE_STARTED_EVENT: &str = "service_started";
pub(crate) const MAPPING_EVENT: &str = "mapping";
const INVALID_LEVEL_MESSAGE: &str = "Incorrect log level. Using INFO instead.";

/// Called with the exit code after a fatal record has been written.
pub type ExitHandler = Arc<dyn Fn(i32) + Send + Sync>;

/// How the "is valid" flag is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidFlagEncoding {
    /// The strings `"true"` / `"false"`, the historical wire format.
    #[default]
    Text,
    /// Native JSON booleans.
    Bool,
}

/// Logger configuration.
///
/// **Fields**
/// - `service_name`: written under the service-name key of every line. An
///   empty name leaves the logger uninitialised: every line fails to format.
/// - `log_level`: minimum level name. An unknown name falls back to INFO
///   and is reported as an error record.
/// - `key_names`: partial renaming of output keys.
/// - `valid_flag`: encoding of the "is valid" flag.
/// - `invalid_event_level`: level of monitoring validation events whose
///   content is not valid.
/// - `output`: where lines go when no explicit sink is given.
#[derive(Clone, Debug)]
pub struct LoggerConfig {
    pub service_name: String,
    pub log_level: String,
    pub key_names: KeyNameOverrides,
    pub valid_flag: ValidFlagEncoding,
    pub invalid_event_level: Level,
    pub output: OutputKind,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            log_level: Level::Info.as_str().to_string(),
            key_names: KeyNameOverrides::default(),
            valid_flag: ValidFlagEncoding::Text,
            invalid_event_level: Level::Error,
            output: OutputKind::Stderr,
        }
    }
}

impl LoggerConfig {
    pub fn new(service_name: impl Into<String>, log_level: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            log_level: log_level.into(),
            ..Self::default()
        }
    }
}

struct Inner {
    service_name: String,
    threshold: Level,
    keys: Arc<KeyNames>,
    valid_flag: ValidFlagEncoding,
    invalid_event_level: Level,
    formatter: Box<dyn Formatter>,
    sink: Arc<dyn LogSink>,
    hooks: RwLock<Vec<Arc<dyn Hook>>>,
    exit: ExitHandler,
}

/// Structured logger owning the service name, level and key names of one
/// service.
///
/// Cloning is cheap and every clone logs through the same formatter, sink
/// and hooks, so one logger can be shared by all threads of a service.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Structured logger writing JSON lines to stderr.
    pub fn new(service_name: impl Into<String>, log_level: impl Into<String>) -> Self {
        Logger::from_config(LoggerConfig::new(service_name, log_level))
    }

    /// Structured logger at INFO level.
    pub fn info_logger(service_name: impl Into<String>) -> Self {
        Logger::new(service_name, Level::Info.as_str())
    }

    /// Structured logger with renamed output keys.
    pub fn with_key_names(
        service_name: impl Into<String>,
        log_level: impl Into<String>,
        key_names: KeyNameOverrides,
    ) -> Self {
        Logger::from_config(LoggerConfig {
            key_names,
            ..LoggerConfig::new(service_name, log_level)
        })
    }

    /// Plain-text logger with no service name and no FT formatting.
    pub fn unstructured() -> Self {
        Logger::builder(LoggerConfig::default())
            .formatter(Box::new(TextFormatter))
            .build()
    }

    pub fn from_config(config: LoggerConfig) -> Self {
        Logger::builder(config).build()
    }

    pub fn builder(config: LoggerConfig) -> LoggerBuilder {
        LoggerBuilder {
            config,
            formatter: None,
            sink: None,
            hooks: Vec::new(),
            exit: None,
        }
    }

    /// Logger with an empty service name, used before global initialisation.
    pub(crate) fn uninitialised() -> Self {
        Logger::from_config(LoggerConfig::default())
    }

    pub fn service_name(&self) -> &str {
        &self.inner.service_name
    }

    /// Effective minimum level.
    pub fn level(&self) -> Level {
        self.inner.threshold
    }

    pub fn is_level_enabled(&self, level: Level) -> bool {
        level <= self.level()
    }

    pub fn key_names(&self) -> &KeyNames {
        &self.inner.keys
    }

    pub fn valid_flag_encoding(&self) -> ValidFlagEncoding {
        self.inner.valid_flag
    }

    /// Register a hook fired with every enabled record from now on.
    pub fn add_hook(&self, hook: Arc<dyn Hook>) {
        self.inner.hooks.write().push(hook);
    }

    pub fn flush(&self) -> std::io::Result<()> {
        self.inner.sink.flush()
    }

    /// Log that the service is listening on `port`.
    pub fn log_service_started(&self, port: u16) {
        self.with_field(self.key_names().event_name(), SERVICE_STARTED_EVENT)
            .infof(format_args!("Service running on port [{}]", port));
    }

    /// Log the outcome of validating (mapping) one piece of content.
    ///
    /// Valid content is logged at INFO; invalid content at the configured
    /// `invalid_event_level`.
    pub fn log_monitoring_validation_event(
        &self,
        tid: &str,
        uuid: &str,
        content_type: &str,
        message: &str,
        is_valid: bool,
    ) {
        let level = if is_valid {
            Level::Info
        } else {
            self.inner.invalid_event_level
        };
        self.with_monitoring_event(MAPPING_EVENT, tid, content_type)
            .with_uuid(uuid)
            .with_valid_flag(is_valid)
            .log(level, message);
    }

    /// Log a business event for the monitoring dashboards at INFO.
    pub fn log_monitoring_event(
        &self,
        event_name: &str,
        tid: &str,
        content_type: &str,
        message: &str,
    ) {
        self.with_monitoring_event(event_name, tid, content_type)
            .info(message);
    }

    pub fn log_monitoring_event_with_uuid(
        &self,
        event_name: &str,
        tid: &str,
        uuid: &str,
        content_type: &str,
        message: &str,
    ) {
        self.with_monitoring_event(event_name, tid, content_type)
            .with_uuid(uuid)
            .info(message);
    }

    /// INFO line tagged with the transaction id, even when it is empty.
    pub fn log_info_event(&self, tid: &str, message: &str) {
        self.with_transaction_id(tid).info(message);
    }

    /// Like [`Logger::log_info_event`]; an empty `uuid` is left out.
    pub fn log_info_event_with_uuid(&self, tid: &str, uuid: &str, message: &str) {
        with_uuid_if_set(self.with_transaction_id(tid), uuid).info(message);
    }

    /// WARN line. An empty `tid` and a missing `err` are left out.
    pub fn log_warn_event<E>(&self, tid: &str, message: &str, err: Option<E>)
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        self.log_warn_event_with_uuid(tid, "", message, err);
    }

    /// WARN line. An empty `tid` or `uuid` and a missing `err` are left out.
    pub fn log_warn_event_with_uuid<E>(
        &self,
        tid: &str,
        uuid: &str,
        message: &str,
        err: Option<E>,
    ) where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        let mut entry = with_ids_if_set(self.entry(), tid, uuid);
        if let Some(err) = err {
            entry = entry.with_error(err);
        }
        entry.warn(message);
    }

    /// ERROR line carrying `err`. An empty `tid` is left out.
    pub fn log_error_event<E>(&self, tid: &str, message: &str, err: E)
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        self.log_error_event_with_uuid(tid, "", message, err);
    }

    /// ERROR line carrying `err`. An empty `tid` or `uuid` is left out.
    pub fn log_error_event_with_uuid<E>(&self, tid: &str, uuid: &str, message: &str, err: E)
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        with_ids_if_set(self.entry(), tid, uuid)
            .with_error(err)
            .error(message);
    }

    /// FATAL line carrying `err`, then the exit handler runs.
    pub fn log_fatal_event<E>(&self, message: &str, err: E)
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        self.with_error(err).fatal(message);
    }

    /// Filter, hook, format and write one record.
    ///
    /// Records below the threshold are dropped before hooks or formatting
    /// run. This does not exit or panic for fatal and panic records.
    pub fn emit(&self, record: &LogRecord) -> Result<(), LogError> {
        if !self.is_level_enabled(record.level) {
            return Ok(());
        }

        self.fire_hooks(record);

        let line = self.inner.formatter.format(record)?;
        self.inner.sink.write(&line)?;
        Ok(())
    }

    /// Emit, then exit for fatal records and panic for panic records.
    ///
    /// Fatal and panic records report their own emission failures to stderr
    /// before terminating.
    pub(crate) fn write_record(
        &self,
        level: Level,
        message: String,
        fields: Fields,
    ) -> Result<(), LogError> {
        let record = LogRecord::new(level, message, fields);
        let result = self.emit(&record);

        if level > Level::Fatal {
            return result;
        }
        if let Err(e) = &result {
            report(e);
        }
        if level == Level::Panic {
            panic!("{}", record.message);
        }
        (self.inner.exit)(1);
        Ok(())
    }

    fn fire_hooks(&self, record: &LogRecord) {
        // Snapshot so a hook may log or register hooks without deadlocking.
        let hooks = self.inner.hooks.read().clone();
        for hook in hooks.iter().filter(|h| h.levels().contains(&record.level)) {
            if let Err(e) = hook.fire(record) {
                eprintln!("failed to fire log hook: {}", e);
            }
        }
    }
}

fn with_uuid_if_set(entry: LogEntry, uuid: &str) -> LogEntry {
    if uuid.is_empty() {
        entry
    } else {
        entry.with_uuid(uuid)
    }
}

fn with_ids_if_set(entry: LogEntry, tid: &str, uuid: &str) -> LogEntry {
    let entry = if tid.is_empty() {
        entry
    } else {
        entry.with_transaction_id(tid)
    };
    with_uuid_if_set(entry, uuid)
}

fn exit_process(code: i32) {
    std::process::exit(code)
}

pub(crate) fn report(err: &LogError) {
    eprintln!("failed to emit log record: {}", err);
}

impl FieldLogger for Logger {
    fn entry(&self) -> LogEntry {
        LogEntry::new(self.clone())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("service_name", &self.inner.service_name)
            .field("level", &self.level())
            .field("keys", &self.inner.keys)
            .field("valid_flag", &self.inner.valid_flag)
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Logger`] with an explicit sink, formatter, hooks or exit
/// handler.
pub struct LoggerBuilder {
    config: LoggerConfig,
    formatter: Option<Box<dyn Formatter>>,
    sink: Option<Arc<dyn LogSink>>,
    hooks: Vec<Arc<dyn Hook>>,
    exit: Option<ExitHandler>,
}

impl LoggerBuilder {
    /// Replace the FT JSON formatter.
    pub fn formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Write to `sink` instead of the configured output.
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Attach a hook before the logger is built, so it also sees the
    /// invalid-level report emitted during construction.
    pub fn hook(mut self, hook: Arc<dyn Hook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Replace `std::process::exit` as the fatal-record terminator.
    pub fn exit_handler(mut self, exit: ExitHandler) -> Self {
        self.exit = Some(exit);
        self
    }

    pub fn build(self) -> Logger {
        let config = self.config;
        let keys = Arc::new(KeyNames::resolve(&config.key_names));
        let formatter = self.formatter.unwrap_or_else(|| {
            Box::new(FtJsonFormatter::new(config.service_name.clone(), Arc::clone(&keys)))
        });
        let sink = self.sink.unwrap_or_else(|| make_sink(config.output));
        let exit = self.exit.unwrap_or_else(|| Arc::new(exit_process));
        let parsed = config.log_level.parse::<Level>();

        let logger = Logger {
            inner: Arc::new(Inner {
                service_name: config.service_name,
                threshold: parsed.as_ref().copied().unwrap_or(Level::Info),
                keys,
                valid_flag: config.valid_flag,
                invalid_event_level: config.invalid_event_level,
                formatter,
                sink,
                hooks: RwLock::new(self.hooks),
                exit,
            }),
        };

        if let Err(err) = parsed {
            logger
                .with_field("logLevel", &config.log_level)
                .with_error(err)
                .error(INVALID_LEVEL_MESSAGE);
        }

        tracing::debug!(
            service_name = %logger.service_name(),
            level = %logger.level(),
            "structured logger initialised"
        );
        logger
    }
}
