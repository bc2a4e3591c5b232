use crate::error::InitError;
use crate::layer::FtLayer;
use crate::logger::Logger;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Install a global `tracing` subscriber that writes every event through
/// `logger`.
///
/// **Parameters**
/// - `logger`: the service's [`Logger`]; its level, key names, hooks and
///   sink apply to `tracing` events.
///
/// **Effects**
///
/// This installs a [`Registry`] combined with [`FtLayer`] as the global
/// default subscriber, so all `tracing` events in the process become FT
/// log lines. Fails if a global subscriber is already set.
pub fn init_tracing(logger: Logger) -> Result<(), InitError> {
    let subscriber = Registry::default().with(FtLayer::new(logger));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Build the logger from the environment, install it as both the global
/// [`crate::global`] logger and the `tracing` subscriber, and return it.
///
/// This is the recommended entrypoint for typical microservices.
pub fn init_from_env() -> Result<Logger, InitError> {
    let logger = Logger::from_config(crate::logger::LoggerConfig::from_env());
    crate::global::set(logger.clone());
    init_tracing(logger.clone())?;
    Ok(logger)
}
