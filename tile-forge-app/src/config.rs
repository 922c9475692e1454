//! Command-line arguments and layered settings.
//!
//! Settings are resolved from, in increasing priority: built-in defaults,
//! an optional TOML file (`--config`), `TILE_FORGE_*` environment variables
//! and finally any flag given explicitly on the command line.

use crate::error::AppError;
use clap::{Parser, ValueEnum};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tile_rules::RandomizerMode;

/// Prefix of the environment variables read into [`Settings`].
pub const ENV_PREFIX: &str = "TILE_FORGE_";

/// How the solved board is shown.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationMode {
    #[default]
    None,
    /// Colored glyphs printed to the terminal.
    Terminal,
}

#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GlobalLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Level at which periodic progress reports are logged.
#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgressLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
}

impl From<GlobalLogLevel> for LevelFilter {
    fn from(level: GlobalLogLevel) -> Self {
        match level {
            GlobalLogLevel::Trace => Self::Trace,
            GlobalLogLevel::Debug => Self::Debug,
            GlobalLogLevel::Info => Self::Info,
            GlobalLogLevel::Warn => Self::Warn,
            GlobalLogLevel::Error => Self::Error,
        }
    }
}

impl From<ProgressLogLevel> for LevelFilter {
    fn from(level: ProgressLogLevel) -> Self {
        match level {
            ProgressLogLevel::Trace => Self::Trace,
            ProgressLogLevel::Debug => Self::Debug,
            ProgressLogLevel::Info => Self::Info,
            ProgressLogLevel::Warn => Self::Warn,
        }
    }
}

/// Command-line arguments for Tile Forge.
///
/// Every flag except `--rule-file` is optional; unset flags fall back to the
/// layered [`Settings`].
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Path to the JSON or RON rule file defining cards and board.
    #[arg(short, long, value_name = "FILE")]
    pub rule_file: PathBuf,

    /// Optional TOML file with default settings.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed for the random draws; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Overrides the board width from the rule file.
    #[arg(long)]
    pub width: Option<usize>,

    /// Overrides the board height from the rule file.
    #[arg(long)]
    pub height: Option<usize>,

    /// Overrides the card selection mode from the rule file.
    #[arg(long, value_enum)]
    pub randomiser: Option<RandomizerMode>,

    /// Number of seeds to try before giving up on a stuck board.
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Where to write the solved board.
    #[arg(short, long, value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub visualization_mode: Option<VisualizationMode>,

    /// Report progress at most once per interval (e.g. "1s", "500ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub report_progress_interval: Option<Duration>,

    #[arg(long, value_enum)]
    pub global_log_level: Option<GlobalLogLevel>,

    #[arg(long, value_enum)]
    pub progress_log_level: Option<ProgressLogLevel>,

    /// Run this many seeded solves in benchmark mode instead of a single solve.
    #[arg(long, value_name = "RUNS")]
    pub benchmark_runs: Option<usize>,

    /// Write one CSV row per benchmark run to this file.
    #[arg(long, value_name = "CSV_FILE")]
    pub benchmark_csv_output: Option<PathBuf>,
}

/// Fully resolved application settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub seed: Option<u64>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub randomiser: Option<RandomizerMode>,
    pub attempts: u32,
    pub output_path: PathBuf,
    pub visualization_mode: VisualizationMode,
    /// Humantime duration string, e.g. `"2s"`.
    pub report_progress_interval: Option<String>,
    pub global_log_level: GlobalLogLevel,
    pub progress_log_level: ProgressLogLevel,
    /// Zero runs a single standard solve.
    pub benchmark_runs: usize,
    pub benchmark_csv_output: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            width: None,
            height: None,
            randomiser: None,
            attempts: 1,
            output_path: PathBuf::from("output.txt"),
            visualization_mode: VisualizationMode::None,
            report_progress_interval: None,
            global_log_level: GlobalLogLevel::Info,
            progress_log_level: ProgressLogLevel::Info,
            benchmark_runs: 0,
            benchmark_csv_output: None,
        }
    }
}

impl Settings {
    /// Resolves settings for the given command line.
    ///
    /// # Errors
    ///
    /// `AppError::Config` if the `--config` file is missing or any layer
    /// holds a value of the wrong type.
    pub fn load(cli: &AppConfig) -> Result<Self, AppError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = &cli.config {
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let mut settings: Self = figment
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;
        settings.apply_cli(cli);
        settings.progress_interval()?;
        Ok(settings)
    }

    fn apply_cli(&mut self, cli: &AppConfig) {
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if cli.width.is_some() {
            self.width = cli.width;
        }
        if cli.height.is_some() {
            self.height = cli.height;
        }
        if cli.randomiser.is_some() {
            self.randomiser = cli.randomiser;
        }
        if let Some(attempts) = cli.attempts {
            self.attempts = attempts;
        }
        if let Some(path) = &cli.output_path {
            self.output_path.clone_from(path);
        }
        if let Some(mode) = cli.visualization_mode {
            self.visualization_mode = mode;
        }
        if let Some(interval) = cli.report_progress_interval {
            self.report_progress_interval = Some(humantime::format_duration(interval).to_string());
        }
        if let Some(level) = cli.global_log_level {
            self.global_log_level = level;
        }
        if let Some(level) = cli.progress_log_level {
            self.progress_log_level = level;
        }
        if let Some(runs) = cli.benchmark_runs {
            self.benchmark_runs = runs;
        }
        if cli.benchmark_csv_output.is_some() {
            self.benchmark_csv_output.clone_from(&cli.benchmark_csv_output);
        }
    }

    /// The parsed progress report interval, if one is configured.
    ///
    /// # Errors
    ///
    /// `AppError::Config` if the interval is not a valid duration string.
    pub fn progress_interval(&self) -> Result<Option<Duration>, AppError> {
        self.report_progress_interval
            .as_deref()
            .map(|text| {
                humantime::parse_duration(text).map_err(|e| {
                    AppError::Config(format!("Invalid progress interval '{text}': {e}"))
                })
            })
            .transpose()
    }

    pub const fn is_benchmark(&self) -> bool {
        self.benchmark_runs > 0
    }
}
