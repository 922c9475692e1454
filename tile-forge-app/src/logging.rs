//! Logging setup for the application.

use crate::config::Settings;
use env_logger::{Builder, DEFAULT_FILTER_ENV};
use log::LevelFilter;

/// Module whose records carry periodic progress reports.
pub const PROGRESS_MODULE: &str = "tile_forge_app::progress";

/// Global and progress-module level filters for the given settings.
pub fn level_filters(settings: &Settings) -> (LevelFilter, LevelFilter) {
    (
        settings.global_log_level.into(),
        settings.progress_log_level.into(),
    )
}

/// Initializes `env_logger` from the settings.
///
/// The global level comes from `global_log_level` and progress reports use
/// `progress_log_level`. Directives in `RUST_LOG` are applied last and win
/// over both.
pub fn init_logger(settings: &Settings) {
    let (global_level, progress_level) = level_filters(settings);

    let mut builder = Builder::new();
    builder
        .filter_level(global_level)
        .filter_module(PROGRESS_MODULE, progress_level);
    if let Ok(directives) = std::env::var(DEFAULT_FILTER_ENV) {
        builder.parse_filters(&directives);
    }

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized; keeping the existing one");
        return;
    }

    log::debug!(
        "Logger initialized with global log level: {:?}, progress log level: {:?}",
        settings.global_log_level,
        settings.progress_log_level
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GlobalLogLevel, ProgressLogLevel};

    #[test]
    fn test_level_filters_follow_settings() {
        let settings = Settings {
            global_log_level: GlobalLogLevel::Warn,
            progress_log_level: ProgressLogLevel::Debug,
            ..Settings::default()
        };
        assert_eq!(
            level_filters(&settings),
            (LevelFilter::Warn, LevelFilter::Debug)
        );
    }
}
