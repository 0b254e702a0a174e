//! Structured logging for the rooted workspace.
//!
//! Console output with uptime timestamps and targets, plus a JSON log file in
//! debug builds. The filter comes from `RUST_LOG` when set, otherwise from the
//! configured log level.

use std::fs::File;
use std::path::Path;

use rooted_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name of the JSON log written in debug builds.
pub const LOG_FILE: &str = "rooted.log";

const DEFAULT_FILTER: &str = "info";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - enables the file layer
/// * `config` - supplies the log level and whether file logging is wanted
///
/// ```no_run
/// use rooted_config::Config;
/// use rooted_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config_filter(config));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true) // chunk workers are named
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let wants_file = debug_build && config.is_none_or(|c| c.debug.log_to_file);
    if let Some(log_file) = log_dir.filter(|_| wants_file).and_then(open_log_file) {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// The filter directive used when `RUST_LOG` is unset.
pub fn filter_string(config: Option<&Config>) -> String {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

// A malformed configured level falls back to the default instead of
// silently dropping directives.
fn config_filter(config: Option<&Config>) -> EnvFilter {
    EnvFilter::try_new(filter_string(config)).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log_file(log_dir: &Path) -> Option<File> {
    std::fs::create_dir_all(log_dir).ok()?;
    File::create(log_dir.join(LOG_FILE)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter = config_filter(None);
        assert!(format!("{filter}").contains("info"));
        assert_eq!(filter_string(None), "info");
    }

    #[test]
    fn test_malformed_config_level_uses_default() {
        let mut config = Config::default();
        config.debug.log_level = "rooted_world=[".to_string();
        let filter = config_filter(Some(&config));
        assert!(format!("{filter}").contains("info"));
        assert!(!format!("{filter}").contains("rooted_world"));
    }

    #[test]
    fn test_config_level_used() {
        let mut config = Config::default();
        config.debug.log_level = "rooted_world=trace,info".to_string();
        assert_eq!(filter_string(Some(&config)), "rooted_world=trace,info");
    }

    #[test]
    fn test_blank_config_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_string(Some(&config)), "info");
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,rooted_world=trace",
            "warn,rooted_growth=debug,rooted_sim=info",
            "error",
        ];
        for filter_str in &valid_filters {
            let result = EnvFilter::try_new(filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {}", filter_str);
        }
    }

    #[test]
    fn test_log_file_created() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("logs");
        let file = open_log_file(&log_dir);
        assert!(file.is_some());
        assert!(log_dir.join(LOG_FILE).exists());
    }
}
