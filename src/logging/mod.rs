//! Structured logging infrastructure.
//!
//! This configures the process-wide `tracing` sink; it is not how the core
//! engine modules report diagnostics (they use the injected
//! [`crate::emit::Emitter`] instead). `init` is what a
//! [`crate::emit::TracingEmitter`] ultimately writes into.

use crate::config::{LogFormat, LogLevel, LoggingConfig};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::NonBlocking;

#[derive(Debug)]
pub enum LogError {
    IoError(std::io::Error),
    InvalidLogLevel(String),
    SubscriberError(Box<dyn std::error::Error + Send + Sync>),
}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::IoError(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for LogError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        LogError::SubscriberError(err)
    }
}

pub type Result<T> = std::result::Result<T, LogError>;

/// Install a `tracing-subscriber` formatting layer per `config`. Calling
/// this more than once in the same process is harmless — a
/// "subscriber already set" error is swallowed rather than propagated.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let level = match config.level {
        LogLevel::Trace => Level::TRACE,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    };

    let result = match config.format {
        LogFormat::Json => init_json_logging(level, config),
        LogFormat::Compact => init_compact_logging(level, config),
        LogFormat::Pretty => init_pretty_logging(level, config),
    };

    if let Err(LogError::SubscriberError(ref e)) = result {
        if e.to_string().contains("SetGlobalDefaultError") {
            return Ok(());
        }
    }

    result
}

fn init_json_logging(level: Level, config: &LoggingConfig) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(level)
        .with_level(true)
        .with_target(true)
        .with_line_number(true);

    if let Some(file_path) = &config.file {
        let (writer, _guard) = create_non_blocking_file(file_path)?;
        if config.stdout {
            subscriber.with_writer(std::io::stdout).try_init()?;
            tracing::warn!("configured for stdout only; file logging ignored");
        } else {
            subscriber.with_writer(writer).try_init()?;
        }
    } else if config.stdout {
        subscriber.try_init()?;
    }

    Ok(())
}

fn init_compact_logging(level: Level, config: &LoggingConfig) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_level(true)
        .with_target(true)
        .with_line_number(true);

    if let Some(file_path) = &config.file {
        let (writer, _guard) = create_non_blocking_file(file_path)?;
        if config.stdout {
            subscriber.with_writer(std::io::stdout).try_init()?;
            tracing::warn!("configured for stdout only; file logging ignored");
        } else {
            subscriber.with_writer(writer).try_init()?;
        }
    } else if config.stdout {
        subscriber.try_init()?;
    }

    Ok(())
}

fn init_pretty_logging(level: Level, config: &LoggingConfig) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(level)
        .with_level(true)
        .with_target(true)
        .with_line_number(true);

    if let Some(file_path) = &config.file {
        let (writer, _guard) = create_non_blocking_file(file_path)?;
        if config.stdout {
            subscriber.with_writer(std::io::stdout).try_init()?;
            tracing::warn!("configured for stdout only; file logging ignored");
        } else {
            subscriber.with_writer(writer).try_init()?;
        }
    } else if config.stdout {
        subscriber.try_init()?;
    }

    Ok(())
}

/// Create a non-blocking file writer. Returns the writer and the guard
/// that must be held for writes to actually flush.
fn create_non_blocking_file(
    path: impl AsRef<Path>,
) -> Result<(NonBlocking, tracing_appender::non_blocking::WorkerGuard)> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file_appender = tracing_appender::rolling::never(
        path.parent().unwrap_or_else(|| Path::new(".")),
        path.file_name().unwrap_or_default(),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    Ok((non_blocking, guard))
}

pub fn parse_log_level(level: &str) -> Result<LogLevel> {
    level
        .parse::<LogLevel>()
        .map_err(LogError::InvalidLogLevel)
}

/// Helper macro for structured logging with additional fields.
#[macro_export]
macro_rules! log_with_fields {
    ($level:expr, $($fields:tt)+) => {
        tracing::event!($level, $($fields)+)
    };
}

/// Helper macro for logging errors with context.
#[macro_export]
macro_rules! log_error {
    ($err:expr, $msg:expr $(, $fields:tt)*) => {
        tracing::error!(
            error = $err.to_string(),
            message = $msg,
            $($fields)*
        )
    };
}

impl std::fmt::Display for LogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogError::IoError(e) => write!(f, "IO error: {}", e),
            LogError::SubscriberError(e) => write!(f, "subscriber error: {}", e),
            LogError::InvalidLogLevel(s) => write!(f, "invalid log level: {}", s),
        }
    }
}

impl std::error::Error for LogError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_log_level_accepts_known_names() {
        assert!(matches!(parse_log_level("info"), Ok(LogLevel::Info)));
        assert!(matches!(parse_log_level("DEBUG"), Ok(LogLevel::Debug)));
    }

    #[test]
    fn parse_log_level_rejects_unknown_names() {
        assert!(parse_log_level("verbose").is_err());
    }
}
