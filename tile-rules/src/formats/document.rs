//! Serde mirror of the rule file document shared by every format.

use crate::types::RandomizerMode;
use serde::Deserialize;

/// One base card as written in a rule file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseCardData {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub image_location: Option<[u32; 4]>,
    /// Four connector letters in N, E, S, W order, e.g. `"RRGG"`.
    pub connectors: String,
    /// Extra rotated copies to register, in degrees clockwise.
    #[serde(default)]
    pub rotations: Vec<i32>,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

const fn default_weight() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SeedTileData {
    pub x: i32,
    pub y: i32,
    pub id: u32,
}

/// Top-level structure of a rule file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDocument {
    #[serde(default)]
    pub image_size: Option<u32>,
    pub board_width: usize,
    pub board_height: usize,
    pub base_cards: Vec<BaseCardData>,
    #[serde(default)]
    pub seed_tiles: Vec<SeedTileData>,
    #[serde(default)]
    pub randomiser: RandomizerMode,
}
