use testbed_core::kernel::constants::DEFAULT_LOG_FILTER;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber and route `log` records into it.
///
/// `filter` wins over `RUST_LOG`; without either, `info` is used.
pub fn init_logging(filter: Option<&str>) -> Result<(), String> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| format!("Invalid log filter '{}': {}", directives, e))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Failed to install tracing subscriber: {}", e))?;
    tracing_log::LogTracer::init().map_err(|e| format!("Failed to bridge log records: {}", e))?;
    Ok(())
}
