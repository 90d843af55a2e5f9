//! Logging to stderr.

use tracing::Subscriber;
use tracing::subscriber::{SetGlobalDefaultError, set_global_default};
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

pub const DEFAULT_FILTER: &str = "info,dashboard=debug,payloads=debug";

/// Compose a subscriber. `RUST_LOG` takes precedence over `env_filter`.
pub fn get_subscriber(env_filter: String) -> impl Subscriber + Sync + Send {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env_filter));
    let stderr = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(fmt::format::FmtSpan::CLOSE);
    Registry::default().with(env_filter).with(stderr)
}

/// Register a subscriber as global default and route `log` records to it.
///
/// Fails if called more than once per process.
pub fn init_subscriber(
    subscriber: impl Subscriber + Sync + Send,
) -> Result<(), LogInitError> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}

/// Initialize logging
pub fn init_logging(env_filter: &str) -> Result<(), LogInitError> {
    init_subscriber(get_subscriber(env_filter.to_string()))?;
    tracing::info!("Initialized logs");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum LogInitError {
    #[error("Failed to set logger: {0}")]
    Logger(#[from] tracing_log::log::SetLoggerError),
    #[error("Failed to set subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}
