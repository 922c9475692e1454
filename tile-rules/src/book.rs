use crate::types::{BoardRules, CardCatalog, CardId};

/// Image metadata for one catalog card, for collaborators that draw tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSprite {
    pub card: CardId,
    pub filename: String,
    /// `[x, y, width, height]` inside the image file, if the file is a sheet.
    pub image_location: Option<[u32; 4]>,
    /// Clockwise quarter turns applied to the image when drawn.
    pub quarter_turns: u8,
}

/// Everything a rule file describes: the board rules, the expanded card
/// catalog, and the sprites used to draw each card.
#[derive(Debug, Clone)]
pub struct RuleBook {
    pub image_size: Option<u32>,
    pub rules: BoardRules,
    pub catalog: CardCatalog,
    pub sprites: Vec<CardSprite>,
}

impl RuleBook {
    /// Looks up the sprite for a card id.
    pub fn sprite(&self, card: CardId) -> Option<&CardSprite> {
        self.sprites.iter().find(|sprite| sprite.card == card)
    }
}
