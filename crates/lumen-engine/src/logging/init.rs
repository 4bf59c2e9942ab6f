use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` directive syntax, e.g.
/// `"lumen_engine=debug,wgpu_core=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Which source the filter directives come from.
#[derive(Debug, PartialEq, Eq)]
enum FilterSource {
    Directives(String),
    Level(LevelFilter),
}

/// Explicit config wins over `RUST_LOG`, which wins over `info`.
fn resolve_filter(config: Option<String>, env: Option<String>) -> FilterSource {
    let non_blank = |f: &String| !f.trim().is_empty();
    config
        .filter(non_blank)
        .or_else(|| env.filter(non_blank))
        .map(FilterSource::Directives)
        .unwrap_or(FilterSource::Level(LevelFilter::Info))
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are no-ops.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok()) {
            FilterSource::Directives(filter) => {
                builder.parse_filters(&filter);
            }
            FilterSource::Level(level) => {
                builder.filter_level(level);
                // wgpu is chatty at info.
                builder.filter_module("wgpu_core", LevelFilter::Warn);
                builder.filter_module("wgpu_hal", LevelFilter::Warn);
            }
        }

        builder.write_style(config.write_style);
        builder.format_timestamp_millis();

        if builder.try_init().is_err() {
            eprintln!("logger already installed; lumen logging config ignored");
            return;
        }

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_beats_environment() {
        let got = resolve_filter(Some("debug".into()), Some("trace".into()));
        assert_eq!(got, FilterSource::Directives("debug".into()));
    }

    #[test]
    fn environment_used_when_unconfigured() {
        let got = resolve_filter(None, Some("lumen_engine=trace".into()));
        assert_eq!(got, FilterSource::Directives("lumen_engine=trace".into()));
    }

    #[test]
    fn blank_filter_falls_back_to_info() {
        assert_eq!(resolve_filter(None, None), FilterSource::Level(LevelFilter::Info));
        assert_eq!(
            resolve_filter(Some("  ".into()), None),
            FilterSource::Level(LevelFilter::Info)
        );
    }

    #[test]
    fn blank_config_defers_to_environment() {
        let got = resolve_filter(Some(String::new()), Some("warn".into()));
        assert_eq!(got, FilterSource::Directives("warn".into()));
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::with_filter("warn"));
        init_logging(LoggingConfig::default());
    }
}
