use crate::entropy::{CandidateGrid, CpuEntropyCalculator, EntropyCalculator};
use crate::grid::{ConstraintGrid, Grid, ResultBoard};
use crate::rng::TileRng;
use crate::{ProgressInfo, SolveError};
use log::{debug, info, warn};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tile_rules::{BoardRules, CardCatalog, CardId, RandomizerMode};

/// Called after every successful placement. Returning an error stops the solve.
pub type ProgressCallback = Box<dyn FnMut(&ProgressInfo) -> Result<(), SolveError> + Send>;

/// Optional knobs for a solve session.
#[derive(Default)]
pub struct SolverConfig {
    /// Overrides the randomizer named by the board rules.
    pub randomizer: Option<RandomizerMode>,
    pub progress_callback: Option<ProgressCallback>,
    /// Checked before every step of [`SolveSession::run`].
    pub shutdown_signal: Arc<AtomicBool>,
}

impl SolverConfig {
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder::default()
    }
}

/// Builder for [`SolverConfig`].
#[derive(Default)]
pub struct SolverConfigBuilder {
    randomizer: Option<RandomizerMode>,
    progress_callback: Option<ProgressCallback>,
    shutdown_signal: Option<Arc<AtomicBool>>,
}

impl SolverConfigBuilder {
    #[must_use]
    pub fn randomizer(mut self, mode: RandomizerMode) -> Self {
        self.randomizer = Some(mode);
        self
    }

    #[must_use]
    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    #[must_use]
    pub fn shutdown_signal(mut self, signal: Arc<AtomicBool>) -> Self {
        self.shutdown_signal = Some(signal);
        self
    }

    pub fn build(self) -> SolverConfig {
        SolverConfig {
            randomizer: self.randomizer,
            progress_callback: self.progress_callback,
            shutdown_signal: self.shutdown_signal.unwrap_or_default(),
        }
    }
}

/// Lifecycle of a solve session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveState {
    Initialized,
    InProgress,
    Complete,
    Stuck,
}

impl SolveState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Stuck)
    }
}

/// How a finished solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalState {
    /// Every cell holds a card.
    Complete,
    /// Some cell has no fitting card and can never be filled.
    Stuck,
}

impl From<TerminalState> for SolveState {
    fn from(state: TerminalState) -> Self {
        match state {
            TerminalState::Complete => Self::Complete,
            TerminalState::Stuck => Self::Stuck,
        }
    }
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Stuck => write!(f, "stuck"),
        }
    }
}

/// Result of [`SolveSession::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    pub terminal_state: TerminalState,
    /// Successful placements made by this session; seeds not included.
    pub steps_executed: usize,
    pub board: ResultBoard,
}

impl SolveOutcome {
    pub fn is_complete(&self) -> bool {
        self.terminal_state == TerminalState::Complete
    }
}

/// One solve over a board: owns the constraint grid, the result board and
/// the random source, and advances one placement per [`step`](Self::step).
///
/// Every placed card has edges matching all of its placed neighbors.
pub struct SolveSession<'c, R, E = CpuEntropyCalculator> {
    catalog: &'c CardCatalog,
    grid: ConstraintGrid,
    board: ResultBoard,
    rng: R,
    entropy: E,
    randomizer: RandomizerMode,
    config: SolverConfig,
    state: SolveState,
    steps: usize,
    started: Option<Instant>,
}

impl<'c, R: TileRng> SolveSession<'c, R> {
    /// Starts a session with the CPU entropy calculator and default config.
    ///
    /// # Errors
    ///
    /// See [`ConstraintGrid::initialize`].
    pub fn new(rules: &BoardRules, catalog: &'c CardCatalog, rng: R) -> Result<Self, SolveError> {
        Self::with_config(
            rules,
            catalog,
            rng,
            CpuEntropyCalculator::new(),
            SolverConfig::default(),
        )
    }
}

impl<'c, R: TileRng, E: EntropyCalculator> SolveSession<'c, R, E> {
    /// Starts a session in [`SolveState::Initialized`] with seeds placed.
    ///
    /// # Errors
    ///
    /// See [`ConstraintGrid::initialize`].
    pub fn with_config(
        rules: &BoardRules,
        catalog: &'c CardCatalog,
        rng: R,
        entropy: E,
        config: SolverConfig,
    ) -> Result<Self, SolveError> {
        let (grid, board) = ConstraintGrid::initialize(rules, catalog)?;
        let randomizer = config.randomizer.unwrap_or(rules.randomizer);
        debug!(
            "Initialized {}x{} board with {} seed tiles, {} cards, {:?} randomizer",
            rules.width,
            rules.height,
            grid.placed_count(),
            catalog.len(),
            randomizer
        );

        Ok(Self {
            catalog,
            grid,
            board,
            rng,
            entropy,
            randomizer,
            config,
            state: SolveState::Initialized,
            steps: 0,
            started: None,
        })
    }

    pub const fn state(&self) -> SolveState {
        self.state
    }

    pub const fn grid(&self) -> &ConstraintGrid {
        &self.grid
    }

    pub const fn board(&self) -> &ResultBoard {
        &self.board
    }

    pub fn into_board(self) -> ResultBoard {
        self.board
    }

    pub const fn steps_executed(&self) -> usize {
        self.steps
    }

    pub const fn randomizer(&self) -> RandomizerMode {
        self.randomizer
    }

    /// Candidate lists for the current grid.
    pub fn candidates(&self) -> CandidateGrid {
        self.entropy.compute_candidates(&self.grid, self.catalog)
    }

    /// Entropy of every cell on the current grid; 0 for placed cells.
    pub fn entropies(&self) -> Grid<usize> {
        self.candidates().entropies()
    }

    /// Places one card on a minimal-entropy cell.
    ///
    /// Draws the target cell first, then the card. Returns `Ok(false)`
    /// without drawing when the session has already ended, or when no cell
    /// has candidates left, in which case the session ends as
    /// [`SolveState::Complete`] if every cell is placed and
    /// [`SolveState::Stuck`] otherwise.
    ///
    /// # Errors
    ///
    /// * `SolveError::InvariantViolation` if the random source or the catalog
    ///   breaks its contract.
    /// * Any error returned by the progress callback.
    pub fn step(&mut self) -> Result<bool, SolveError> {
        if self.state.is_terminal() {
            return Ok(false);
        }
        if self.state == SolveState::Initialized {
            self.state = SolveState::InProgress;
            self.started = Some(Instant::now());
        }

        let candidates = self.entropy.compute_candidates(&self.grid, self.catalog);
        let available = self.entropy.pick_available(&candidates);
        if available.is_empty() {
            self.finish();
            return Ok(false);
        }

        let pick = self.rng.int_range(available.len());
        let target = available.get(pick).ok_or_else(|| {
            SolveError::InvariantViolation(format!(
                "Drew cell {pick} from {} available cells",
                available.len()
            ))
        })?;

        let card_id = match self.randomizer {
            RandomizerMode::Basic => {
                let pick = self.rng.int_range(target.candidates.len());
                target.candidates.get(pick).copied().ok_or_else(|| {
                    SolveError::InvariantViolation(format!(
                        "Drew candidate {pick} from {} candidates",
                        target.candidates.len()
                    ))
                })?
            }
            RandomizerMode::Weighted => {
                let catalog = self.catalog;
                select_weighted(&target.candidates, |id| catalog.weight(id), &mut self.rng)?
            }
        };

        let card = self.catalog.get(card_id).ok_or_else(|| {
            SolveError::InvariantViolation(format!("Candidate card {card_id} is not in the catalog"))
        })?;
        if !self.grid.place(target.x, target.y, card) {
            return Err(SolveError::InvariantViolation(format!(
                "Cell ({}, {}) was already placed",
                target.x, target.y
            )));
        }
        if let Some(slot) = self.board.get_mut(target.x, target.y) {
            *slot = Some(card_id);
        }
        self.steps += 1;

        debug!(
            "Step {}: placed card {} at ({}, {}) from {} candidates, {} cells tied",
            self.steps,
            card_id,
            target.x,
            target.y,
            target.entropy(),
            available.len()
        );

        self.report_progress()?;
        Ok(true)
    }

    /// Steps until the session ends, for at most `width * height` steps.
    ///
    /// # Errors
    ///
    /// Anything [`step`](Self::step) returns, and `SolveError::Interrupted`
    /// when the shutdown signal is raised. The session stays in progress in
    /// both cases.
    pub fn run(&mut self) -> Result<SolveOutcome, SolveError> {
        let max_steps = self.grid.len();
        info!(
            "Starting solve: {}x{} board, {} cells open, {:?} randomizer",
            self.grid.width,
            self.grid.height,
            self.grid.len() - self.grid.placed_count(),
            self.randomizer
        );

        while !self.state.is_terminal() && self.steps < max_steps {
            if self.config.shutdown_signal.load(Ordering::Relaxed) {
                warn!("Shutdown signal received after {} steps", self.steps);
                return Err(SolveError::Interrupted(
                    "shutdown signal received".to_string(),
                ));
            }
            if !self.step()? {
                break;
            }
        }

        let terminal_state = self.finish();
        Ok(SolveOutcome {
            terminal_state,
            steps_executed: self.steps,
            board: self.board.clone(),
        })
    }

    /// Executes up to `limit` steps and returns the resulting state.
    ///
    /// Unlike [`run`](Self::run), the session may still be in progress
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Anything [`step`](Self::step) returns.
    pub fn run_steps(&mut self, limit: usize) -> Result<SolveState, SolveError> {
        for _ in 0..limit {
            if !self.step()? {
                break;
            }
        }
        Ok(self.state)
    }

    fn finish(&mut self) -> TerminalState {
        let terminal = match self.state {
            SolveState::Complete => return TerminalState::Complete,
            SolveState::Stuck => return TerminalState::Stuck,
            SolveState::Initialized | SolveState::InProgress => {
                if self.grid.all_placed() {
                    TerminalState::Complete
                } else {
                    TerminalState::Stuck
                }
            }
        };
        self.state = terminal.into();

        let elapsed = self.started.map_or(Duration::ZERO, |start| start.elapsed());
        match terminal {
            TerminalState::Complete => info!(
                "Solve complete: {} placements in {:?}",
                self.steps, elapsed
            ),
            TerminalState::Stuck => warn!(
                "Solve stuck after {} placements in {:?}: {} cells cannot be filled",
                self.steps,
                elapsed,
                self.grid.len() - self.grid.placed_count()
            ),
        }
        terminal
    }

    fn report_progress(&mut self) -> Result<(), SolveError> {
        let info = ProgressInfo {
            placed_cells: self.grid.placed_count(),
            total_cells: self.grid.len(),
            steps: self.steps,
            elapsed_time: self.started.map_or(Duration::ZERO, |start| start.elapsed()),
        };
        match self.config.progress_callback.as_mut() {
            Some(callback) => callback(&info),
            None => Ok(()),
        }
    }
}

/// Picks a candidate with probability proportional to its weight.
///
/// Draws `r` in `[0, total)` and walks the candidates in order,
/// subtracting each weight until `r` drops below zero.
///
/// # Errors
///
/// `SolveError::InvariantViolation` if a weight is missing, the weights sum
/// to zero, or the walk runs off the end of the list.
pub(crate) fn select_weighted<R: TileRng + ?Sized>(
    candidates: &[CardId],
    weight_of: impl Fn(CardId) -> Option<u32>,
    rng: &mut R,
) -> Result<CardId, SolveError> {
    let weights = candidates
        .iter()
        .map(|&id| {
            weight_of(id).ok_or_else(|| {
                SolveError::InvariantViolation(format!("Candidate card {id} has no weight"))
            })
        })
        .collect::<Result<Vec<u32>, _>>()?;

    let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    let total = usize::try_from(total)
        .ok()
        .filter(|&total| total > 0)
        .ok_or_else(|| {
            SolveError::InvariantViolation(format!(
                "Candidate weights sum to {total}, cannot draw"
            ))
        })?;

    let mut remaining = i128::try_from(rng.int_range(total)).unwrap_or(i128::MAX);
    for (&id, &weight) in candidates.iter().zip(&weights) {
        remaining -= i128::from(weight);
        if remaining < 0 {
            return Ok(id);
        }
    }

    Err(SolveError::InvariantViolation(format!(
        "Weighted selection ran past {} candidates",
        candidates.len()
    )))
}
