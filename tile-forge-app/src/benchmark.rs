//! Benchmark mode: many independent seeded solves of one rule book.

use crate::config::Settings;
use crate::error::AppError;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tile_core::{
    CpuEntropyCalculator, SeededRng, SolveError, SolveSession, SolverConfig, TerminalState,
};
use tile_rules::RuleBook;

/// Timing and result of one benchmark solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkRun {
    pub seed: u64,
    pub terminal_state: TerminalState,
    pub steps: usize,
    pub duration: Duration,
}

/// Aggregated statistics over all runs.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSummary {
    pub runs: usize,
    pub complete: usize,
    pub stuck: usize,
    pub mean_steps: Option<f64>,
    pub median_steps: Option<f64>,
    pub mean_time_ms: Option<f64>,
    pub median_time_ms: Option<f64>,
    pub stddev_time_ms: Option<f64>,
}

fn calculate_median(data: &mut [f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.sort_unstable_by(f64::total_cmp);
    let mid = data.len() / 2;
    if data.len() % 2 == 0 {
        Some((data[mid - 1] + data[mid]) / 2.0)
    } else {
        Some(data[mid])
    }
}

fn calculate_mean(data: &[f64]) -> Option<f64> {
    (!data.is_empty()).then(|| data.iter().sum::<f64>() / data.len() as f64)
}

fn calculate_std_dev(data: &[f64], mean: f64) -> Option<f64> {
    let n = data.len();
    if n < 2 {
        return None;
    }
    let variance = data
        .iter()
        .map(|value| {
            let diff = mean - value;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Solves the book `runs` times in parallel with seeds `base_seed..`.
///
/// Runs are returned in seed order.
///
/// # Errors
///
/// The first solver error any run hits; `SolveError::Interrupted` once the
/// shutdown signal is raised.
pub fn run_benchmark(
    book: &RuleBook,
    base_seed: u64,
    runs: usize,
    shutdown: &Arc<AtomicBool>,
) -> Result<Vec<BenchmarkRun>, SolveError> {
    (0..runs as u64)
        .into_par_iter()
        .map(|offset| {
            let seed = base_seed.wrapping_add(offset);
            let config = SolverConfig::builder()
                .shutdown_signal(Arc::clone(shutdown))
                .build();
            let started = Instant::now();
            let outcome = SolveSession::with_config(
                &book.rules,
                &book.catalog,
                SeededRng::new(seed),
                CpuEntropyCalculator::new(),
                config,
            )?
            .run()?;
            Ok::<_, SolveError>(BenchmarkRun {
                seed,
                terminal_state: outcome.terminal_state,
                steps: outcome.steps_executed,
                duration: started.elapsed(),
            })
        })
        .collect()
}

pub fn summarize(runs: &[BenchmarkRun]) -> BenchmarkSummary {
    let complete = runs
        .iter()
        .filter(|run| run.terminal_state == TerminalState::Complete)
        .count();
    let steps: Vec<f64> = runs.iter().map(|run| run.steps as f64).collect();
    let times_ms: Vec<f64> = runs
        .iter()
        .map(|run| run.duration.as_secs_f64() * 1000.0)
        .collect();
    let mean_time_ms = calculate_mean(&times_ms);

    BenchmarkSummary {
        runs: runs.len(),
        complete,
        stuck: runs.len() - complete,
        mean_steps: calculate_mean(&steps),
        median_steps: calculate_median(&mut steps.clone()),
        mean_time_ms,
        median_time_ms: calculate_median(&mut times_ms.clone()),
        stddev_time_ms: mean_time_ms.and_then(|mean| calculate_std_dev(&times_ms, mean)),
    }
}

fn format_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.3}"))
}

pub fn print_summary(book: &RuleBook, summary: &BenchmarkSummary) {
    println!("\n--- Benchmark Summary ---");
    println!(
        "Board {}x{}, {} cards, {:?} randomiser",
        book.rules.width,
        book.rules.height,
        book.catalog.len(),
        book.rules.randomizer
    );
    println!("Runs | Complete | Stuck | Mean Steps | Median Steps | Mean (ms) | Median (ms) | Std Dev (ms)");
    println!(
        "{:<4} | {:<8} | {:<5} | {:<10} | {:<12} | {:<9} | {:<11} | {:<12}",
        summary.runs,
        summary.complete,
        summary.stuck,
        format_stat(summary.mean_steps),
        format_stat(summary.median_steps),
        format_stat(summary.mean_time_ms),
        format_stat(summary.median_time_ms),
        format_stat(summary.stddev_time_ms),
    );
}

/// Writes one CSV row per run.
pub fn write_runs_to_csv(runs: &[BenchmarkRun], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record(["Seed", "Result", "Steps", "Time (ms)"])?;
    for run in runs {
        wtr.write_record([
            run.seed.to_string(),
            run.terminal_state.to_string(),
            run.steps.to_string(),
            format!("{:.6}", run.duration.as_secs_f64() * 1000.0),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Runs the configured number of benchmark solves, prints a summary and
/// optionally writes the per-run CSV.
///
/// # Errors
///
/// `AppError::Cancelled` when the shutdown signal stops the runs, solver
/// errors, and CSV write failures.
pub fn run_benchmark_mode(
    settings: &Settings,
    book: &RuleBook,
    shutdown: &Arc<AtomicBool>,
) -> Result<BenchmarkSummary, AppError> {
    let base_seed = settings.seed.unwrap_or_else(rand::random);
    log::info!(
        "Benchmark mode: {} runs starting at seed {}",
        settings.benchmark_runs,
        base_seed
    );

    let started = Instant::now();
    let runs = match run_benchmark(book, base_seed, settings.benchmark_runs, shutdown) {
        Ok(runs) => runs,
        Err(SolveError::Interrupted(_)) if shutdown.load(Ordering::Relaxed) => {
            return Err(AppError::Cancelled)
        }
        Err(e) => return Err(e.into()),
    };
    log::info!(
        "Benchmark finished {} runs in {}",
        runs.len(),
        humantime::format_duration(Duration::from_millis(
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
        ))
    );

    let summary = summarize(&runs);
    print_summary(book, &summary);

    if let Some(csv_path) = &settings.benchmark_csv_output {
        log::info!("Writing benchmark results to {}", csv_path.display());
        write_runs_to_csv(&runs, csv_path)?;
    }

    Ok(summary)
}
