//! Handles the standard solve mode: seeded attempts, output and display.

use crate::config::{Settings, VisualizationMode};
use crate::error::AppError;
use crate::output;
use crate::progress::{progress_callback, LogProgressReporter, ProgressReporter};
use crate::visualization::{TerminalVisualizer, Visualizer};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tile_core::{CpuEntropyCalculator, SeededRng, SolveOutcome, SolveSession, SolverConfig};
use tile_rules::RuleBook;

/// Result of the standard mode: the last attempt made.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Seed of the attempt that produced `outcome`.
    pub seed: u64,
    /// Attempts made, the returned one included.
    pub attempts: u32,
    pub outcome: SolveOutcome,
    pub elapsed: Duration,
}

/// Applies the width, height and randomiser overrides from settings.
pub fn apply_overrides(book: &mut RuleBook, settings: &Settings) {
    if let Some(width) = settings.width {
        book.rules.width = width;
    }
    if let Some(height) = settings.height {
        book.rules.height = height;
    }
    if let Some(randomiser) = settings.randomiser {
        book.rules.randomizer = randomiser;
    }
}

/// Seed used for the zero-based `attempt`.
pub const fn attempt_seed(base: u64, attempt: u32) -> u64 {
    base.wrapping_add(attempt as u64)
}

/// Rounds a duration down to whole milliseconds for display.
fn millis(duration: Duration) -> Duration {
    Duration::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

type SharedReporter = Arc<Mutex<LogProgressReporter>>;

fn with_reporter<T>(
    reporter: Option<&SharedReporter>,
    f: impl FnOnce(&mut LogProgressReporter) -> anyhow::Result<T>,
) -> Result<Option<T>, AppError> {
    let Some(reporter) = reporter else {
        return Ok(None);
    };
    let mut guard = reporter
        .lock()
        .map_err(|_| anyhow::anyhow!("progress reporter lock poisoned"))?;
    Ok(Some(f(&mut guard)?))
}

fn solve_once(
    settings: &Settings,
    book: &RuleBook,
    seed: u64,
    shutdown: &Arc<AtomicBool>,
) -> Result<(SolveOutcome, Duration), AppError> {
    let reporter = settings
        .progress_interval()?
        .map(|interval| Arc::new(Mutex::new(LogProgressReporter::new(interval, settings.progress_log_level))));

    let mut builder = SolverConfig::builder().shutdown_signal(Arc::clone(shutdown));
    if let Some(reporter) = &reporter {
        builder = builder.progress_callback(progress_callback(Arc::clone(reporter)));
    }

    let started = Instant::now();
    let mut session = SolveSession::with_config(
        &book.rules,
        &book.catalog,
        SeededRng::new(seed),
        CpuEntropyCalculator::new(),
        builder.build(),
    )?;

    match session.run() {
        Ok(outcome) => {
            let elapsed = started.elapsed();
            with_reporter(reporter.as_ref(), |r| r.finish(&outcome))?;
            Ok((outcome, elapsed))
        }
        Err(e) => {
            with_reporter(reporter.as_ref(), |r| r.fail(&e))?;
            if shutdown.load(Ordering::Relaxed) {
                Err(AppError::Cancelled)
            } else {
                Err(e.into())
            }
        }
    }
}

/// Solves the board, reseeding with `base_seed + attempt` while the result
/// is stuck and attempts remain.
///
/// # Errors
///
/// Invalid seeds, solver invariant violations, and `AppError::Cancelled`
/// when the shutdown signal stops a run.
pub fn solve_with_attempts(
    settings: &Settings,
    book: &RuleBook,
    base_seed: u64,
    shutdown: &Arc<AtomicBool>,
) -> Result<RunSummary, AppError> {
    let attempts = settings.attempts.max(1);

    for attempt in 0..attempts {
        let seed = attempt_seed(base_seed, attempt);
        info!("Attempt {}/{} with seed {}", attempt + 1, attempts, seed);

        let (outcome, elapsed) = solve_once(settings, book, seed, shutdown)?;
        info!(
            "{} placements in {}",
            outcome.steps_executed,
            humantime::format_duration(millis(elapsed))
        );

        if outcome.is_complete() || attempt + 1 == attempts {
            return Ok(RunSummary {
                seed,
                attempts: attempt + 1,
                outcome,
                elapsed,
            });
        }
        warn!("Board got stuck with seed {}, reseeding", seed);
    }

    Err(AppError::Config("At least one attempt is required".to_string()))
}

/// Runs the standard mode end to end: solve, save, and display.
///
/// Stuck boards are saved too; only errors fail the run.
pub fn run_standard_mode(
    settings: &Settings,
    book: &RuleBook,
    shutdown: &Arc<AtomicBool>,
) -> Result<RunSummary, AppError> {
    let base_seed = settings.seed.unwrap_or_else(rand::random);
    info!(
        "Solving {}x{} board with {} cards, {:?} randomiser, base seed {}",
        book.rules.width,
        book.rules.height,
        book.catalog.len(),
        book.rules.randomizer,
        base_seed
    );

    let summary = solve_with_attempts(settings, book, base_seed, shutdown)?;
    if !summary.outcome.is_complete() {
        warn!(
            "No complete board after {} attempts; saving the last stuck board",
            summary.attempts
        );
    }

    output::save_board_to_file(&summary.outcome.board, &settings.output_path)
        .map_err(|e| AppError::Output(format!("{e:#}")))?;

    if settings.visualization_mode == VisualizationMode::Terminal {
        TerminalVisualizer::new().display_state(&summary.outcome.board, &book.catalog)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_core::TerminalState;
    use tile_rules::{BoardRules, Card, CardCatalog, CardId, Connector, Edges, RandomizerMode};

    const G: Connector = Connector::GRASS;
    const R: Connector = Connector::ROAD;

    fn book(rules: BoardRules) -> RuleBook {
        RuleBook {
            image_size: None,
            rules,
            catalog: CardCatalog::new([
                Card::new(CardId(1), Edges::uniform(G), 1),
                Card::new(CardId(2), Edges::uniform(R), 1),
            ])
            .unwrap(),
            sprites: Vec::new(),
        }
    }

    fn settings(dir: &tempfile::TempDir) -> Settings {
        Settings {
            seed: Some(5),
            output_path: dir.path().join("board.txt"),
            ..Settings::default()
        }
    }

    #[test]
    fn test_apply_overrides() {
        let mut book = book(BoardRules::new(4, 4));
        let settings = Settings {
            width: Some(9),
            randomiser: Some(RandomizerMode::Weighted),
            ..Settings::default()
        };
        apply_overrides(&mut book, &settings);
        assert_eq!(book.rules.width, 9);
        assert_eq!(book.rules.height, 4);
        assert_eq!(book.rules.randomizer, RandomizerMode::Weighted);
    }

    #[test]
    fn test_attempt_seed_wraps() {
        assert_eq!(attempt_seed(10, 2), 12);
        assert_eq!(attempt_seed(u64::MAX, 1), 0);
    }

    #[test]
    fn test_complete_board_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            report_progress_interval: Some("0s".to_string()),
            ..settings(&dir)
        };
        let book = book(BoardRules::new(3, 2).with_seed(0, 0, CardId(1)));

        let summary = run_standard_mode(&settings, &book, &Arc::new(AtomicBool::new(false))).unwrap();
        assert_eq!(summary.outcome.terminal_state, TerminalState::Complete);
        assert_eq!(summary.attempts, 1);
        assert_eq!(summary.seed, 5);
        assert_eq!(
            std::fs::read_to_string(&settings.output_path).unwrap(),
            "1 1 1\n1 1 1\n"
        );
    }

    #[test]
    fn test_stuck_board_uses_every_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            attempts: 3,
            ..settings(&dir)
        };
        let book = book(
            BoardRules::new(3, 1)
                .with_seed(0, 0, CardId(1))
                .with_seed(2, 0, CardId(2)),
        );

        let summary = run_standard_mode(&settings, &book, &Arc::new(AtomicBool::new(false))).unwrap();
        assert_eq!(summary.outcome.terminal_state, TerminalState::Stuck);
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.seed, 7);
        assert_eq!(
            std::fs::read_to_string(&settings.output_path).unwrap(),
            "1 . 2\n"
        );
    }

    #[test]
    fn test_invalid_seed_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let book = book(BoardRules::new(2, 2).with_seed(5, 5, CardId(1)));
        let result = run_standard_mode(&settings(&dir), &book, &Arc::new(AtomicBool::new(false)));
        assert!(matches!(result, Err(AppError::Solve(e)) if e.is_invalid_seed()));
    }

    #[test]
    fn test_shutdown_signal_cancels() {
        let dir = tempfile::tempdir().unwrap();
        let book = book(BoardRules::new(4, 4));
        let result = run_standard_mode(&settings(&dir), &book, &Arc::new(AtomicBool::new(true)));
        assert!(matches!(result, Err(AppError::Cancelled)));
    }
}
