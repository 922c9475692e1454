use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use thiserror::Error;

bitflags! {
    /// Edge types a card side can carry.
    ///
    /// A value with a single bit set is a concrete connector. A value with
    /// several bits set is a superposition: the set of connectors an edge may
    /// still resolve to. Two edges are compatible when they share a bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Connector: u8 {
        /// Open grass.
        const GRASS = 0b0000_0001;
        /// A road crossing the edge.
        const ROAD = 0b0000_0010;
    }
}

impl Connector {
    /// Parses the single-letter spelling used by rule files (`G`, `R`).
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'G' => Some(Self::GRASS),
            'R' => Some(Self::ROAD),
            _ => None,
        }
    }

    /// Returns the rule-file letter for a concrete connector, `None` for
    /// empty sets and superpositions.
    pub fn letter(self) -> Option<char> {
        if self == Self::GRASS {
            Some('G')
        } else if self == Self::ROAD {
            Some('R')
        } else {
            None
        }
    }

    /// True if exactly one connector bit is set.
    #[inline]
    pub fn is_single(self) -> bool {
        self.bits().count_ones() == 1
    }
}

/// One of the four sides of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The side facing this one across a shared edge.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Grid offset `(dx, dy)` of the neighbor in this direction. `y` grows
    /// downwards, so north is `-1`.
    #[inline]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Rotates the direction clockwise by `quarter_turns` steps of 90 degrees.
    #[inline]
    pub const fn rotated_clockwise(self, quarter_turns: u8) -> Self {
        Self::ALL[(self.index() + quarter_turns as usize) % 4]
    }
}

/// A connector (or superposition) per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edges([Connector; 4]);

impl Edges {
    pub const fn new(north: Connector, east: Connector, south: Connector, west: Connector) -> Self {
        Self([north, east, south, west])
    }

    /// The same connector set on every side.
    pub const fn uniform(connector: Connector) -> Self {
        Self([connector; 4])
    }

    /// Parses a four-letter connector string in N, E, S, W order, e.g. `"RRGG"`.
    ///
    /// Returns `None` unless the string holds exactly four valid letters.
    pub fn from_letters(letters: &str) -> Option<Self> {
        let mut edges = [Connector::empty(); 4];
        let mut count = 0;
        for letter in letters.chars() {
            if count == 4 {
                return None;
            }
            edges[count] = Connector::from_letter(letter)?;
            count += 1;
        }
        (count == 4).then_some(Self(edges))
    }

    #[inline]
    pub fn get(&self, direction: Direction) -> Connector {
        self.0[direction.index()]
    }

    #[inline]
    pub fn set(&mut self, direction: Direction, connector: Connector) {
        self.0[direction.index()] = connector;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, Connector)> + '_ {
        Direction::ALL.iter().map(move |&d| (d, self.get(d)))
    }

    /// True if every side shares at least one connector with `other`'s side
    /// in the same direction.
    pub fn intersects_all(&self, other: &Self) -> bool {
        Direction::ALL
            .iter()
            .all(|&d| self.get(d).intersects(other.get(d)))
    }

    /// Union of the connectors on all four sides.
    pub fn union(&self) -> Connector {
        self.0.iter().fold(Connector::empty(), |acc, &c| acc | c)
    }

    /// Returns the edges of a card turned clockwise: the connector on side
    /// `d` ends up on side `d` rotated by `quarter_turns`.
    pub fn rotated(&self, quarter_turns: u8) -> Self {
        let mut rotated = *self;
        for d in Direction::ALL {
            rotated.set(d.rotated_clockwise(quarter_turns), self.get(d));
        }
        rotated
    }
}

impl Index<Direction> for Edges {
    type Output = Connector;

    fn index(&self, direction: Direction) -> &Connector {
        &self.0[direction.index()]
    }
}

impl fmt::Display for Edges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, connector) in self.iter() {
            match connector.letter() {
                Some(letter) => write!(f, "{letter}")?,
                None => write!(f, "[{:#04b}]", connector.bits())?,
            }
        }
        Ok(())
    }
}

/// Identifier of a card within a catalog. Valid ids are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A placeable card: one concrete connector per side and a selection weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub id: CardId,
    pub edges: Edges,
    pub weight: u32,
}

impl Card {
    pub const fn new(id: CardId, edges: Edges, weight: u32) -> Self {
        Self { id, edges, weight }
    }

    /// Builds a new card turned clockwise by `quarter_turns`, registered
    /// under `id`. The receiver is left untouched.
    pub fn rotated(&self, quarter_turns: u8, id: CardId) -> Self {
        Self {
            id,
            edges: self.edges.rotated(quarter_turns),
            weight: self.weight,
        }
    }
}

/// Errors raised while validating a card catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Card catalog cannot be empty.")]
    Empty,
    #[error("Card ids must be positive, found id 0.")]
    ZeroId,
    #[error("Duplicate card id: {0}")]
    DuplicateId(CardId),
    #[error("Card {0} has weight 0; weights must be at least 1.")]
    ZeroWeight(CardId),
    #[error("Card {0} must carry exactly one connector on its {1:?} edge.")]
    InvalidEdge(CardId, Direction),
}

/// The immutable set of cards a solve may place, ordered by id.
#[derive(Debug, Clone)]
pub struct CardCatalog {
    cards: BTreeMap<CardId, Card>,
    connectors: Connector,
}

impl CardCatalog {
    /// Validates and builds a catalog.
    ///
    /// # Errors
    ///
    /// Rejects empty catalogs, id 0, duplicate ids, weights below 1, and
    /// edges that are not exactly one connector.
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        let mut connectors = Connector::empty();
        for card in cards {
            if card.id.0 == 0 {
                return Err(CatalogError::ZeroId);
            }
            if card.weight == 0 {
                return Err(CatalogError::ZeroWeight(card.id));
            }
            if let Some((direction, _)) = card.edges.iter().find(|(_, c)| !c.is_single()) {
                return Err(CatalogError::InvalidEdge(card.id, direction));
            }
            connectors |= card.edges.union();
            if map.insert(card.id, card).is_some() {
                return Err(CatalogError::DuplicateId(card.id));
            }
        }
        if map.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self {
            cards: map,
            connectors,
        })
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    pub fn weight(&self, id: CardId) -> Option<u32> {
        self.cards.get(&id).map(|card| card.weight)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.values()
    }

    /// Union of every connector used by any card; the unconstrained edge.
    pub fn full_superposition(&self) -> Connector {
        self.connectors
    }
}

/// How the solver picks a card among a cell's candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum RandomizerMode {
    /// Uniform choice, card weights ignored.
    #[default]
    Basic,
    /// Choice proportional to card weight.
    #[serde(alias = "SimpleWeighted")]
    Weighted,
}

impl RandomizerMode {
    /// Maps the numeric spelling used by older rule files (`0` basic,
    /// `1` weighted).
    pub const fn from_index(index: u64) -> Option<Self> {
        match index {
            0 => Some(Self::Basic),
            1 => Some(Self::Weighted),
            _ => None,
        }
    }
}

/// A card fixed on the board before solving starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedTile {
    pub x: i32,
    pub y: i32,
    pub card: CardId,
}

impl SeedTile {
    pub const fn new(x: i32, y: i32, card: CardId) -> Self {
        Self { x, y, card }
    }
}

/// Board shape, pre-placed seeds and selection mode for one solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRules {
    pub width: usize,
    pub height: usize,
    pub seed_tiles: Vec<SeedTile>,
    pub randomizer: RandomizerMode,
}

impl BoardRules {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            seed_tiles: Vec::new(),
            randomizer: RandomizerMode::Basic,
        }
    }

    /// Adds a seed tile.
    pub fn with_seed(mut self, x: i32, y: i32, card: CardId) -> Self {
        self.seed_tiles.push(SeedTile::new(x, y, card));
        self
    }

    pub fn with_randomizer(mut self, randomizer: RandomizerMode) -> Self {
        self.randomizer = randomizer;
        self
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}
