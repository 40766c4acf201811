use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Level used when neither `--log-level` nor `RUST_LOG` is set.
const DEFAULT_DIRECTIVE: &str = "warn";

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// An explicit level wins; otherwise `RUST_LOG` directives apply, so codec
/// events can be enabled per target (`RUST_LOG=cmdframe_codec=trace`).
/// Unparseable `RUST_LOG` falls back to the default level.
fn filter_for(level: Option<LogLevel>, rust_log: Option<&str>) -> EnvFilter {
    if let Some(level) = level {
        return EnvFilter::new(level.directive());
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the stderr subscriber. Codec events (rejected frames at `debug`,
/// parsed frames at `trace`) show up once the filter allows them.
pub fn init_logging(format: LogFormat, level: Option<LogLevel>) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter_for(level, rust_log.as_deref()))
        .with_ansi(false)
        .with_target(false);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_overrides_rust_log() {
        let filter = filter_for(Some(LogLevel::Error), Some("cmdframe_codec=trace"));
        assert_eq!(filter.to_string(), "error");
    }

    #[test]
    fn rust_log_used_without_level() {
        let filter = filter_for(None, Some("cmdframe_codec=trace"));
        assert_eq!(filter.to_string(), "cmdframe_codec=trace");
    }

    #[test]
    fn default_level_without_level_or_rust_log() {
        assert_eq!(filter_for(None, None).to_string(), DEFAULT_DIRECTIVE);
    }

    #[test]
    fn invalid_rust_log_falls_back_to_default() {
        let filter = filter_for(None, Some("cmdframe_codec=notalevel"));
        assert_eq!(filter.to_string(), DEFAULT_DIRECTIVE);
    }
}
