use super::{Available, CandidateGrid, EntropyCalculator};
use crate::grid::{ConstraintGrid, Grid};
use tile_rules::{CardCatalog, Connector, Direction, Edges};

/// Single-threaded candidate scan over the whole grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuEntropyCalculator;

impl CpuEntropyCalculator {
    pub const fn new() -> Self {
        Self
    }

    /// The edges a card at `(x, y)` must match: each side takes the facing
    /// edge of the neighbor on that side, or `full` past the boundary.
    ///
    /// Unplaced neighbors contribute their superposition edges.
    pub fn effective_constraint(grid: &ConstraintGrid, x: usize, y: usize, full: Connector) -> Edges {
        let mut constraint = Edges::uniform(full);
        for direction in Direction::ALL {
            let facing = grid
                .neighbor(x, y, direction)
                .and_then(|(nx, ny)| grid.get(nx, ny))
                .map(|cell| cell.edges[direction.opposite()]);
            if let Some(connector) = facing {
                constraint.set(direction, connector);
            }
        }
        constraint
    }
}

impl EntropyCalculator for CpuEntropyCalculator {
    fn compute_candidates(&self, grid: &ConstraintGrid, catalog: &CardCatalog) -> CandidateGrid {
        let full = catalog.full_superposition();
        let data = grid
            .iter_coords()
            .map(|(x, y, cell)| {
                if cell.placed {
                    return Vec::new();
                }
                let constraint = Self::effective_constraint(grid, x, y, full);
                catalog
                    .iter()
                    .filter(|card| constraint.intersects_all(&card.edges))
                    .map(|card| card.id)
                    .collect()
            })
            .collect();

        Grid {
            width: grid.width,
            height: grid.height,
            data,
        }
    }

    fn pick_available(&self, candidates: &CandidateGrid) -> Vec<Available> {
        let mut min_entropy = usize::MAX;
        let mut available = Vec::new();

        for (x, y, ids) in candidates.iter_coords() {
            let entropy = ids.len();
            if entropy == 0 || entropy > min_entropy {
                continue;
            }
            if entropy < min_entropy {
                min_entropy = entropy;
                available.clear();
            }
            available.push(Available {
                x,
                y,
                candidates: ids.clone(),
            });
        }

        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ConstraintCell;
    use tile_rules::{BoardRules, Card, CardId};

    const G: Connector = Connector::GRASS;
    const R: Connector = Connector::ROAD;

    fn catalog() -> CardCatalog {
        CardCatalog::new([
            Card::new(CardId(1), Edges::uniform(G), 1),
            Card::new(CardId(2), Edges::uniform(R), 1),
            Card::new(CardId(3), Edges::new(R, R, G, G), 1),
            Card::new(CardId(4), Edges::new(R, G, G, G), 1),
        ])
        .unwrap()
    }

    #[test]
    fn test_boundary_sides_are_unconstrained() {
        let catalog = catalog();
        let (grid, _) = ConstraintGrid::initialize(&BoardRules::new(1, 1), &catalog).unwrap();
        let full = catalog.full_superposition();
        assert_eq!(
            CpuEntropyCalculator::effective_constraint(&grid, 0, 0, full),
            Edges::uniform(G | R)
        );
    }

    #[test]
    fn test_constraint_reads_facing_edges() {
        let catalog = catalog();
        let rules = BoardRules::new(2, 2).with_seed(1, 0, CardId(3));
        let (grid, _) = ConstraintGrid::initialize(&rules, &catalog).unwrap();
        let full = catalog.full_superposition();

        // Card 3 west edge is G, so (0, 0) sees G on its east side.
        let left = CpuEntropyCalculator::effective_constraint(&grid, 0, 0, full);
        assert_eq!(left, Edges::new(G | R, G, G | R, G | R));

        // Card 3 south edge is G, so (1, 1) sees G on its north side.
        let below = CpuEntropyCalculator::effective_constraint(&grid, 1, 1, full);
        assert_eq!(below, Edges::new(G, G | R, G | R, G | R));
    }

    #[test]
    fn test_placed_cells_have_no_candidates() {
        let catalog = catalog();
        let rules = BoardRules::new(2, 1).with_seed(0, 0, CardId(1));
        let (grid, _) = ConstraintGrid::initialize(&rules, &catalog).unwrap();
        let candidates = CpuEntropyCalculator::new().compute_candidates(&grid, &catalog);

        assert!(candidates.get(0, 0).unwrap().is_empty());
        // Only cards with a grass west edge fit next to all-grass.
        assert_eq!(
            candidates.get(1, 0).unwrap(),
            &vec![CardId(1), CardId(3), CardId(4)]
        );
    }

    #[test]
    fn test_pick_available_collects_ties_row_major() {
        let mut candidates = CandidateGrid::new(3, 2);
        *candidates.get_mut(2, 0).unwrap() = vec![CardId(1), CardId(2)];
        *candidates.get_mut(0, 1).unwrap() = vec![CardId(4), CardId(5), CardId(6)];
        *candidates.get_mut(1, 1).unwrap() = vec![CardId(3), CardId(4)];

        let available = CpuEntropyCalculator::new().pick_available(&candidates);
        let coords: Vec<_> = available.iter().map(|a| (a.x, a.y)).collect();
        assert_eq!(coords, vec![(2, 0), (1, 1)]);
        assert!(available.iter().all(|a| a.entropy() == 2));
    }

    #[test]
    fn test_pick_available_empty_when_nothing_fits() {
        let candidates = CandidateGrid::new(2, 2);
        assert!(CpuEntropyCalculator::new()
            .pick_available(&candidates)
            .is_empty());
    }

    #[test]
    fn test_unplaced_neighbor_superposition_constrains() {
        let catalog = CardCatalog::new([Card::new(CardId(1), Edges::uniform(G), 1)]).unwrap();
        let mut grid = ConstraintGrid::filled(2, 1, ConstraintCell::open(Edges::uniform(G)));
        *grid.get_mut(1, 0).unwrap() = ConstraintCell::open(Edges::uniform(R));
        let candidates = CpuEntropyCalculator::new().compute_candidates(&grid, &catalog);
        assert!(candidates.get(0, 0).unwrap().is_empty());
    }
}
