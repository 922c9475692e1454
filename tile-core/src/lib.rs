//! Core library for the tile-placement solver.
//!
//! Fills a rectangular board with cards so that every pair of adjacent
//! cards shows matching connectors, one minimal-entropy placement per step.
//! Inputs (the card catalog and board rules) come from `tile-rules`.

use std::time::Duration;
use thiserror::Error;
use tile_rules::CardId;

/// Candidate computation and minimal-entropy cell selection.
pub mod entropy;
/// Flat row-major grids: constraint cells and the result board.
pub mod grid;
/// Random draw abstraction used by the solver.
pub mod rng;
/// Solve sessions: single steps, run loop and termination.
pub mod runner;

pub use crate::entropy::{Available, CandidateGrid, CpuEntropyCalculator, EntropyCalculator};
pub use crate::grid::{ConstraintCell, ConstraintGrid, Grid, ResultBoard};
pub use crate::rng::{FirstRng, RoundRobinRng, SeededRng, TileRng};
pub use crate::runner::{
    ProgressCallback, SolveOutcome, SolveSession, SolveState, SolverConfig, TerminalState,
};

/// Errors that can occur while setting up or running a solve.
///
/// A solve that gets stuck is not an error; it ends in
/// [`TerminalState::Stuck`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// A seed tile lies outside the board.
    #[error("Seed tile at ({x}, {y}) lies outside the {width}x{height} board")]
    SeedOutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    /// A seed tile names a card the catalog does not contain.
    #[error("Seed tile at ({x}, {y}) references unknown card {card}")]
    UnknownSeedCard { x: i32, y: i32, card: CardId },
    /// The board has a zero dimension or more cells than fit in memory.
    #[error("Invalid board dimensions {0}x{1}")]
    InvalidDimensions(usize, usize),
    /// A precondition the catalog should guarantee did not hold.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    /// The shutdown signal was raised or a progress callback asked to stop.
    #[error("Solve interrupted: {0}")]
    Interrupted(String),
}

impl SolveError {
    /// True for the errors caused by an invalid seed tile.
    pub const fn is_invalid_seed(&self) -> bool {
        matches!(
            self,
            Self::SeedOutOfBounds { .. } | Self::UnknownSeedCard { .. }
        )
    }
}

/// Snapshot of a solve handed to progress callbacks after each placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressInfo {
    /// Number of placed cells, seeds included.
    pub placed_cells: usize,
    /// The total number of cells on the board.
    pub total_cells: usize,
    /// Successful steps executed so far.
    pub steps: usize,
    /// Time elapsed since the run started.
    pub elapsed_time: Duration,
}
