//! Card catalog, board rules and rule-file loading for the tile solver.
//!
//! The types in this crate are the immutable inputs of a solve: a validated
//! [`CardCatalog`] and the [`BoardRules`] describing the board shape, seed
//! tiles and card selection mode.

use thiserror::Error;

pub mod book;
pub mod formats;
pub mod generator;
pub mod loader;
pub mod types;

pub use book::{CardSprite, RuleBook};
pub use types::{
    BoardRules, Card, CardCatalog, CardId, CatalogError, Connector, Direction, Edges,
    RandomizerMode, SeedTile,
};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse rules format (e.g., JSON/RON): {0}")]
    ParseError(String),
    #[error("Invalid rule data: {0}")]
    InvalidData(String),
    #[error("Unsupported rule file format: {0}")]
    UnsupportedFormat(String),
}
