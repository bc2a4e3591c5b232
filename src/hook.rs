use crate::level::Level;
use crate::record::LogRecord;
use std::error::Error;

/// Observer fired with every record that passes the logger's level filter,
/// before the record is formatted.
pub trait Hook: Send + Sync {
    /// Levels this hook wants to see. Defaults to all of them.
    fn levels(&self) -> &[Level] {
        &Level::ALL
    }

    /// Handle one record.
    ///
    /// **Returns**
    /// - `Err(..)` if the hook failed. The logger prints the error to stderr
    ///   and still emits the record.
    fn fire(&self, record: &LogRecord) -> Result<(), Box<dyn Error + Send + Sync>>;
}
