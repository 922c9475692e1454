use crate::SolveError;
use log::warn;
use tile_rules::{BoardRules, Card, CardCatalog, CardId, Direction, Edges};

/// A width × height grid stored as a flat row-major buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    pub(crate) data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a new grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Creates a new grid with the given dimensions, initialized with default values.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, T::default())
    }
}

impl<T> Grid<T> {
    /// Returns an immutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index(x, y).and_then(|idx| self.data.get(idx))
    }

    /// Returns a mutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        self.index(x, y).and_then(move |idx| self.data.get_mut(idx))
    }

    /// Coordinates of the neighbor in `direction`, or None at the boundary.
    pub fn neighbor(&self, x: usize, y: usize, direction: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = direction.offset();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < self.width && ny < self.height).then_some((nx, ny))
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Cells in row-major order together with their `(x, y)` coordinates.
    pub fn iter_coords(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (idx % width, idx / width, cell))
    }

    /// Borrows each row as a slice, top to bottom.
    pub fn rows(&self) -> std::slice::Chunks<'_, T> {
        self.data.chunks(self.width.max(1))
    }

    /// Calculates the flat index for the given coordinates.
    /// Returns None if the coordinates are out of bounds.
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }
}

/// Placement state of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintCell {
    pub placed: bool,
    /// Exact card edges once placed, superpositions before.
    pub edges: Edges,
}

impl ConstraintCell {
    /// An unplaced cell constrained to the given edge superpositions.
    pub const fn open(edges: Edges) -> Self {
        Self {
            placed: false,
            edges,
        }
    }

    pub const fn placed(card: &Card) -> Self {
        Self {
            placed: true,
            edges: card.edges,
        }
    }
}

/// Grid of constraint cells mutated by the solver.
pub type ConstraintGrid = Grid<ConstraintCell>;

/// Placed card per cell; `None` where nothing has been placed yet.
pub type ResultBoard = Grid<Option<CardId>>;

impl ConstraintGrid {
    /// Builds the constraint grid and result board for a fresh solve.
    ///
    /// Unseeded cells start unplaced with every edge set to the catalog's
    /// full superposition. Seeded cells start placed with the seed card's
    /// edges, and the card is recorded on the returned board. When two
    /// seeds share a coordinate the later one wins.
    ///
    /// # Errors
    ///
    /// * `SolveError::InvalidDimensions` if width or height is zero, or the
    ///   cell count overflows `usize`.
    /// * `SolveError::SeedOutOfBounds` if a seed lies outside the board.
    /// * `SolveError::UnknownSeedCard` if a seed names a card missing from the catalog.
    pub fn initialize(
        rules: &BoardRules,
        catalog: &CardCatalog,
    ) -> Result<(Self, ResultBoard), SolveError> {
        let (width, height) = (rules.width, rules.height);
        if width == 0 || height == 0 || width.checked_mul(height).is_none() {
            return Err(SolveError::InvalidDimensions(width, height));
        }

        let open = ConstraintCell::open(Edges::uniform(catalog.full_superposition()));
        let mut grid = Self::filled(width, height, open);
        let mut board = ResultBoard::new(width, height);

        for seed in &rules.seed_tiles {
            let out_of_bounds = SolveError::SeedOutOfBounds {
                x: seed.x,
                y: seed.y,
                width,
                height,
            };
            let x = usize::try_from(seed.x).map_err(|_| out_of_bounds.clone())?;
            let y = usize::try_from(seed.y).map_err(|_| out_of_bounds.clone())?;
            let card = catalog
                .get(seed.card)
                .ok_or(SolveError::UnknownSeedCard {
                    x: seed.x,
                    y: seed.y,
                    card: seed.card,
                })?;
            let (Some(cell), Some(slot)) = (grid.get_mut(x, y), board.get_mut(x, y)) else {
                return Err(out_of_bounds);
            };
            if let Some(previous) = slot.replace(card.id) {
                warn!(
                    "Seed tile at ({}, {}) replaces earlier seed card {} with card {}",
                    x, y, previous, card.id
                );
            }
            *cell = ConstraintCell::placed(card);
        }

        Ok((grid, board))
    }

    /// Number of placed cells.
    pub fn placed_count(&self) -> usize {
        self.data.iter().filter(|cell| cell.placed).count()
    }

    pub fn all_placed(&self) -> bool {
        self.data.iter().all(|cell| cell.placed)
    }

    /// Commits `card` at `(x, y)`.
    ///
    /// Returns false, leaving the grid untouched, if the coordinates are out
    /// of bounds or the cell is already placed.
    pub fn place(&mut self, x: usize, y: usize, card: &Card) -> bool {
        match self.get_mut(x, y) {
            Some(cell) if !cell.placed => {
                *cell = ConstraintCell::placed(card);
                true
            }
            _ => false,
        }
    }
}
