use ft_logger::assert::assert_on;
use ft_logger::{global, FieldLogger, FormatError, Level, LogError};
use parking_lot::Mutex;

// The global logger is shared by every test in this binary.
static SERIAL: Mutex<()> = Mutex::new(());

#[test]
fn logging_before_init_fails_with_not_initialised() {
    let _guard = SERIAL.lock();
    global::reset();

    let err = global::with_transaction_id("tid_test")
        .try_log(Level::Info, "too early")
        .unwrap_err();
    assert!(matches!(err, LogError::Format(FormatError::NotInitialised)));
}

#[test]
fn logger_init() {
    let _guard = SERIAL.lock();
    let hook = global::new_test_hook("test_service");

    assert!(hook.last_entry().is_none());
    assert_eq!(hook.len(), 0);

    global::infof(format_args!("[Startup] {} is starting", "annotations-monitoring-service"));

    let last = hook.last_entry().unwrap();
    assert_eq!(last.level, Level::Info);
    assert!(last.message.contains("[Startup] annotations-monitoring-service is starting"));
    assert_eq!(hook.len(), 1);
}

#[test]
fn with_monitoring_event() {
    let _guard = SERIAL.lock();
    let hook = global::new_test_hook("test_service");

    global::with_monitoring_event("an-event", "tid_test", "some-content").info("a info message");

    assert_eq!(hook.len(), 1);
    let last = hook.last_entry().unwrap();
    assert_eq!(last.fields.len(), 4);
    assert_eq!(last.level, Level::Info);
    assert_eq!(last.message, "a info message");
    assert_on(&last).has_transaction_id("tid_test").check();
}

#[test]
fn with_transaction_id() {
    let _guard = SERIAL.lock();
    let hook = global::new_test_hook("test_service");

    global::with_transaction_id("tid_test").info("a info message");

    assert_eq!(hook.len(), 1);
    let last = hook.last_entry().unwrap();
    assert_eq!(last.fields.len(), 1);
    assert_eq!(last.message, "a info message");
    assert_on(&last).has_transaction_id("tid_test").check();
}

#[test]
fn with_categorised_event_and_error() {
    let _guard = SERIAL.lock();
    let hook = global::new_test_hook("test_service");

    global::with_categorised_event("Publish", "content", "article published", "tid_cat")
        .with_error("upstream timed out")
        .error("publish failed");

    let last = hook.last_entry().unwrap();
    assert_eq!(last.level, Level::Error);
    assert_eq!(last.fields.len(), 5);
    assert_on(&last)
        .has_field("event", "Publish")
        .has_field("event_category", "content")
        .has_field("event_msg", "article published")
        .has_error("upstream timed out")
        .check();
}

#[test]
fn init_logger_with_unknown_level_uses_info() {
    let _guard = SERIAL.lock();
    global::init_logger("test_service", "a-level-that-do-not-exist");

    let logger = global::logger();
    assert_eq!(logger.level(), Level::Info);
    assert_eq!(logger.service_name(), "test_service");
    assert!(!logger.is_level_enabled(Level::Debug));

    global::reset();
}
