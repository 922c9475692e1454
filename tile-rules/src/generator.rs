use crate::book::{CardSprite, RuleBook};
use crate::formats::document::{BaseCardData, RuleDocument};
use crate::types::{BoardRules, Card, CardCatalog, CardId, CatalogError, Edges, SeedTile};
use crate::LoadError;
use log::debug;

/// Converts a rotation in degrees into clockwise quarter turns.
///
/// # Errors
///
/// `LoadError::InvalidData` if `degrees` is not a multiple of 90.
pub fn quarter_turns(degrees: i32) -> Result<u8, LoadError> {
    if degrees % 90 != 0 {
        return Err(LoadError::InvalidData(format!(
            "Rotation of {degrees} degrees is not a multiple of 90"
        )));
    }
    Ok((degrees.rem_euclid(360) / 90) as u8)
}

/// Expands base cards and their rotations into a catalog.
///
/// Ids are handed out from 1 in document order: each base card takes the
/// next id, then each of its rotations takes the next id in listed order.
/// Rotated cards inherit the base card's weight and image.
///
/// # Errors
///
/// `LoadError::InvalidData` for malformed connector strings, rotations that
/// are not multiples of 90, or a catalog that fails validation.
pub fn generate_catalog(
    base_cards: &[BaseCardData],
) -> Result<(CardCatalog, Vec<CardSprite>), LoadError> {
    let mut cards = Vec::new();
    let mut sprites = Vec::new();
    let mut next_id = 1u32;

    for (index, base_data) in base_cards.iter().enumerate() {
        let edges = Edges::from_letters(&base_data.connectors).ok_or_else(|| {
            LoadError::InvalidData(format!(
                "Base card {index} has invalid connectors '{}': expected four of G/R",
                base_data.connectors
            ))
        })?;
        let base = Card::new(CardId(next_id), edges, base_data.weight);
        next_id += 1;
        cards.push(base);
        sprites.push(CardSprite {
            card: base.id,
            filename: base_data.filename.clone(),
            image_location: base_data.image_location,
            quarter_turns: 0,
        });

        for &degrees in &base_data.rotations {
            let turns = quarter_turns(degrees)?;
            let rotated = base.rotated(turns, CardId(next_id));
            next_id += 1;
            debug!(
                "Card {} derived from base card {} ({}) by {} degrees: {}",
                rotated.id, base.id, base.edges, degrees, rotated.edges
            );
            cards.push(rotated);
            sprites.push(CardSprite {
                card: rotated.id,
                filename: base_data.filename.clone(),
                image_location: base_data.image_location,
                quarter_turns: turns,
            });
        }
    }

    debug!(
        "Generated catalog of {} cards from {} base cards",
        cards.len(),
        base_cards.len()
    );
    let catalog = CardCatalog::new(cards)?;
    Ok((catalog, sprites))
}

/// Validates a parsed rule document and expands it into a [`RuleBook`].
///
/// Seed tiles are carried over unchecked; the solver rejects seeds that are
/// out of bounds or name unknown cards when a solve is initialized.
pub fn build_rule_book(document: RuleDocument) -> Result<RuleBook, LoadError> {
    if document.board_width == 0 || document.board_height == 0 {
        return Err(LoadError::InvalidData(format!(
            "Board dimensions must be positive, got {}x{}",
            document.board_width, document.board_height
        )));
    }

    let (catalog, sprites) = generate_catalog(&document.base_cards)?;

    let rules = BoardRules {
        width: document.board_width,
        height: document.board_height,
        seed_tiles: document
            .seed_tiles
            .iter()
            .map(|seed| SeedTile::new(seed.x, seed.y, CardId(seed.id)))
            .collect(),
        randomizer: document.randomiser,
    };

    Ok(RuleBook {
        image_size: document.image_size,
        rules,
        catalog,
        sprites,
    })
}

impl From<CatalogError> for LoadError {
    fn from(error: CatalogError) -> Self {
        Self::InvalidData(format!("Catalog error: {error}"))
    }
}
