use crate::grid::{ConstraintGrid, Grid};
use tile_rules::{CardCatalog, CardId};

pub mod cpu;

pub use cpu::CpuEntropyCalculator;

/// Candidate card ids per cell, ascending. Placed cells hold an empty list.
pub type CandidateGrid = Grid<Vec<CardId>>;

/// An unplaced cell tied for the minimal nonzero entropy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Available {
    pub x: usize,
    pub y: usize,
    pub candidates: Vec<CardId>,
}

impl Available {
    /// Entropy of the cell: the number of candidate cards.
    pub fn entropy(&self) -> usize {
        self.candidates.len()
    }
}

pub trait EntropyCalculator {
    /// Lists, for every unplaced cell, the catalog cards whose edges fit the
    /// cell's effective constraint.
    #[must_use]
    fn compute_candidates(&self, grid: &ConstraintGrid, catalog: &CardCatalog) -> CandidateGrid;

    /// All cells whose entropy equals the smallest nonzero entropy on the
    /// grid, in row-major order. Empty when no cell has candidates.
    #[must_use]
    fn pick_available(&self, candidates: &CandidateGrid) -> Vec<Available>;
}

impl CandidateGrid {
    /// Entropy (candidate count) of every cell.
    pub fn entropies(&self) -> Grid<usize> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(Vec::len).collect(),
        }
    }
}
