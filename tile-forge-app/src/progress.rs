use crate::config::ProgressLogLevel;
use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tile_core::{ProgressCallback, ProgressInfo, SolveError, SolveOutcome};

/// Receives progress snapshots from a running solve.
pub trait ProgressReporter: Send {
    /// Called after every placement.
    fn report(&mut self, info: &ProgressInfo) -> Result<()>;

    /// Called once the solve reaches a terminal state.
    fn finish(&mut self, outcome: &SolveOutcome) -> Result<()>;

    /// Called when the solve stops with an error.
    fn fail(&mut self, error: &SolveError) -> Result<()>;
}

/// Logs progress at most once per interval.
#[derive(Debug)]
pub struct LogProgressReporter {
    interval: Duration,
    level: ProgressLogLevel,
    last_report: Option<Instant>,
    reports: usize,
}

impl LogProgressReporter {
    pub const fn new(interval: Duration, level: ProgressLogLevel) -> Self {
        Self {
            interval,
            level,
            last_report: None,
            reports: 0,
        }
    }

    /// Number of reports logged so far.
    pub const fn reports(&self) -> usize {
        self.reports
    }

    fn due(&mut self, now: Instant) -> bool {
        match self.last_report {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_report = Some(now);
                true
            }
        }
    }

    fn emit(&self, msg: &str) {
        match self.level {
            ProgressLogLevel::Trace => log::trace!("{msg}"),
            ProgressLogLevel::Debug => log::debug!("{msg}"),
            ProgressLogLevel::Info => log::info!("{msg}"),
            ProgressLogLevel::Warn => log::warn!("{msg}"),
        }
    }
}

/// One-line summary of a progress snapshot.
pub fn format_progress(info: &ProgressInfo) -> String {
    let elapsed_secs = info.elapsed_time.as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        info.steps as f64 / elapsed_secs
    } else {
        0.0
    };
    let percentage = if info.total_cells > 0 {
        info.placed_cells as f64 / info.total_cells as f64 * 100.0
    } else {
        100.0
    };
    format!(
        "Progress: step {}, placed {}/{} ({:.1}%), elapsed {:.2?}, rate {:.1} cells/s",
        info.steps, info.placed_cells, info.total_cells, percentage, info.elapsed_time, rate
    )
}

impl ProgressReporter for LogProgressReporter {
    fn report(&mut self, info: &ProgressInfo) -> Result<()> {
        if self.due(Instant::now()) {
            self.emit(&format_progress(info));
            self.reports += 1;
        }
        Ok(())
    }

    fn finish(&mut self, outcome: &SolveOutcome) -> Result<()> {
        self.emit(&format!(
            "Progress: finished {} after {} placements",
            outcome.terminal_state, outcome.steps_executed
        ));
        Ok(())
    }

    fn fail(&mut self, error: &SolveError) -> Result<()> {
        log::error!("Progress: solve failed: {error}");
        Ok(())
    }
}

/// Wraps a shared reporter as a solver progress callback.
///
/// A reporter error stops the solve with `SolveError::Interrupted`.
pub fn progress_callback<R: ProgressReporter + 'static>(reporter: Arc<Mutex<R>>) -> ProgressCallback {
    Box::new(move |info: &ProgressInfo| {
        let mut guard = reporter
            .lock()
            .map_err(|_| SolveError::Interrupted("progress reporter lock poisoned".to_string()))?;
        guard
            .report(info)
            .map_err(|e| SolveError::Interrupted(format!("progress reporter failed: {e}")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(steps: usize) -> ProgressInfo {
        ProgressInfo {
            placed_cells: steps + 1,
            total_cells: 10,
            steps,
            elapsed_time: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_report_respects_interval() {
        let mut reporter = LogProgressReporter::new(Duration::from_secs(3600), ProgressLogLevel::Info);
        for steps in 1..=5 {
            reporter.report(&info(steps)).unwrap();
        }
        assert_eq!(reporter.reports(), 1);
    }

    #[test]
    fn test_zero_interval_reports_every_step() {
        let mut reporter = LogProgressReporter::new(Duration::ZERO, ProgressLogLevel::Debug);
        for steps in 1..=5 {
            reporter.report(&info(steps)).unwrap();
        }
        assert_eq!(reporter.reports(), 5);
    }

    #[test]
    fn test_format_progress() {
        let line = format_progress(&info(4));
        assert!(line.contains("step 4"), "{line}");
        assert!(line.contains("placed 5/10 (50.0%)"), "{line}");
        assert!(line.contains("rate 8.0 cells/s"), "{line}");
    }

    struct FailingReporter;

    impl ProgressReporter for FailingReporter {
        fn report(&mut self, _info: &ProgressInfo) -> Result<()> {
            anyhow::bail!("disk full")
        }

        fn finish(&mut self, _outcome: &SolveOutcome) -> Result<()> {
            Ok(())
        }

        fn fail(&mut self, _error: &SolveError) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_callback_maps_reporter_errors() {
        let mut callback = progress_callback(Arc::new(Mutex::new(FailingReporter)));
        match callback(&info(1)) {
            Err(SolveError::Interrupted(msg)) => assert!(msg.contains("disk full"), "{msg}"),
            other => panic!("Expected Interrupted, got {other:?}"),
        }
    }
}
