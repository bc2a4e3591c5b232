use std::sync::Arc;

use crate::error::OutputError;
use crate::sink::{LogSink, NoopSink, WriterSink};

/// Supported output destinations that can be selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    #[default]
    Stderr,
    Stdout,
    Discard,
}

/// Parse an output selector, ignoring case and surrounding whitespace.
///
/// Examples:
/// - "stderr" (the default destination)
/// - "stdout"
/// - "discard" or "none"
pub fn parse_output(name: &str) -> Result<OutputKind, OutputError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "stderr" => Ok(OutputKind::Stderr),
        "stdout" => Ok(OutputKind::Stdout),
        "discard" | "none" => Ok(OutputKind::Discard),
        _ => Err(OutputError::UnknownOutput(name.to_string())),
    }
}

/// Create the [`LogSink`] for an [`OutputKind`].
pub fn make_sink(kind: OutputKind) -> Arc<dyn LogSink> {
    match kind {
        OutputKind::Stderr => Arc::new(WriterSink::stderr()),
        OutputKind::Stdout => Arc::new(WriterSink::stdout()),
        OutputKind::Discard => Arc::new(NoopSink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_outputs() {
        assert_eq!(parse_output("stderr"), Ok(OutputKind::Stderr));
        assert_eq!(parse_output(" STDOUT "), Ok(OutputKind::Stdout));
        assert_eq!(parse_output("none"), Ok(OutputKind::Discard));
    }

    #[test]
    fn rejects_unknown_output() {
        assert_eq!(
            parse_output("kafka://broker/topic"),
            Err(OutputError::UnknownOutput("kafka://broker/topic".into()))
        );
    }
}
