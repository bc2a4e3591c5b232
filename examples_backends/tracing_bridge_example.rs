use tracing::{error, info};

use ft_logger::init::init_tracing;
use ft_logger::{FieldLogger, Logger};

fn main() {
    let logger = Logger::info_logger("tracing-bridge-example");
    if let Err(e) = init_tracing(logger.clone()) {
        eprintln!("{}", e);
        return;
    }

    info!("starting service");

    error!(
        transaction_id = "tid_42",
        reason = "invalid payload",
        "mapping failed"
    );

    // Direct calls and tracing macros end up in the same stream.
    logger
        .with_transaction_id("tid_42")
        .with_valid_flag(false)
        .warn("content rejected");
}
