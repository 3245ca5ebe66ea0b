mod config;
mod error;
mod format;
mod install;
mod level;
mod timer;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use format::LoggerFormat;
pub use level::LoggerLevel;
pub use timer::{LogTimer, LoggerTimeZone};

/// Installs the global tracing subscriber described by `cfg`.
///
/// After this call every `tracing` macro in the process (`info!`, `debug!`, ...) goes through it.
///
/// # Local timezone
/// With `tz = local` the UTC offset is detected here, once. Detection is
/// unreliable after other threads exist, so call this before building the
/// tokio runtime; on failure timestamps fall back to UTC.
///
/// # Examples
/// ```rust
/// use berth_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("logger must initialize once");
///
/// tracing::info!("logger initialized");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => install::text(cfg),
        LoggerFormat::Json => install::json(cfg),
        LoggerFormat::Journald => install::journald(cfg),
    }
}
