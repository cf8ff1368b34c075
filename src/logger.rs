// src/logger.rs
use slog::Drain;

macro_rules! crate_name {
    () => {
        env!("CARGO_PKG_NAME")
    };
}

macro_rules! crate_version {
    () => {
        env!("CARGO_PKG_VERSION")
    };
}

/// Output format of the global logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" | "term" => Ok(LogFormat::Text),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Installs the global `slog_scope` logger. Records go to stderr so stdout
/// stays free for command output. Dropping the guard flushes pending records.
pub fn setup_logger(log_level: String, format: LogFormat) -> slog_scope::GlobalLoggerGuard {
    let level = get_log_level(log_level);
    let service = crate_name!();
    let version = crate_version!();

    let log = match format {
        LogFormat::Json => {
            let drain = slog_json::Json::new(std::io::stderr())
                .add_default_keys()
                .build()
                .fuse();
            let drain = slog_async::Async::new(drain)
                .build()
                .filter_level(level)
                .fuse();
            slog::Logger::root(drain, slog::o!("svc" => service, "version" => version))
        }
        LogFormat::Text => {
            let decorator = slog_term::TermDecorator::new().stderr().build();
            let drain = slog_term::FullFormat::new(decorator).build().fuse();
            let drain = slog_async::Async::new(drain)
                .build()
                .filter_level(level)
                .fuse();
            slog::Logger::root(drain, slog::o!("svc" => service, "version" => version))
        }
    };

    slog_scope::set_global_logger(log)
}

// unknown or empty levels fall back to INFO
pub fn get_log_level(log_level: String) -> slog::Level {
    match log_level.to_uppercase().as_str() {
        "INFO" => slog::Level::Info,
        "DEBUG" => slog::Level::Debug,
        "WARNING" | "WARN" => slog::Level::Warning,
        "ERROR" => slog::Level::Error,
        "TRACE" => slog::Level::Trace,
        "CRITICAL" => slog::Level::Critical,
        _ => slog::Level::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_wins() {
        assert_eq!(get_log_level("debug".to_string()), slog::Level::Debug);
        assert_eq!(get_log_level("WARN".to_string()), slog::Level::Warning);
        assert_eq!(get_log_level("critical".to_string()), slog::Level::Critical);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(get_log_level("chatty".to_string()), slog::Level::Info);
        assert_eq!(get_log_level(String::new()), slog::Level::Info);
    }

    #[test]
    fn parses_log_format() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
