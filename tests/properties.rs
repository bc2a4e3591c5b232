use std::collections::BTreeMap;
use std::sync::Arc;

use ft_logger::{FieldLogger, Level, Logger, LoggerConfig, MemorySink};
use proptest::prelude::*;

fn logger_at(level: Level, sink: &MemorySink) -> Logger {
    Logger::builder(LoggerConfig::new("test_service", level.as_str()))
        .sink(Arc::new(sink.clone()))
        .build()
}

fn level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Error),
        Just(Level::Warn),
        Just(Level::Info),
        Just(Level::Debug),
    ]
}

fn fields() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-z]{1,8}", "[a-zA-Z0-9 ]{0,16}", 0..6)
}

#[test]
fn transaction_id_line_has_five_keys() {
    let sink = MemorySink::new();
    let logger = logger_at(Level::Info, &sink);

    logger.with_transaction_id("tid_test").info("a info message");

    let lines = sink.json_lines();
    let line = lines[0].as_object().unwrap();
    assert_eq!(line.len(), 5);
    assert!(line.contains_key("@time"));
    assert_eq!(line["level"], "info");
    assert_eq!(line["msg"], "a info message");
    assert_eq!(line["service_name"], "test_service");
    assert_eq!(line["transaction_id"], "tid_test");
}

proptest! {
    #[test]
    fn records_below_threshold_produce_no_output(
        threshold in level(),
        record_level in level(),
        fields in fields(),
        message in "[a-z ]{0,20}",
    ) {
        let sink = MemorySink::new();
        let logger = logger_at(threshold, &sink);

        logger.with_fields(fields).log(record_level, &message);

        let expected = if record_level <= threshold { 1 } else { 0 };
        prop_assert_eq!(sink.lines().len(), expected);
    }

    #[test]
    fn caller_fields_survive_formatting(fields in fields(), message in "[a-z ]{0,20}") {
        let sink = MemorySink::new();
        let logger = logger_at(Level::Info, &sink);

        logger.with_fields(fields.clone()).info(&message);

        let lines = sink.json_lines();
        let line = lines[0].as_object().unwrap();
        for (key, value) in &fields {
            let reserved = ["@time", "level", "msg", "service_name"].contains(&key.as_str());
            if !reserved {
                prop_assert_eq!(line[key].as_str(), Some(value.as_str()));
            }
        }
        prop_assert_eq!(line["msg"].as_str(), Some(message.as_str()));
    }
}
