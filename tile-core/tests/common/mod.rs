#![allow(dead_code)]

use tile_core::ResultBoard;
use tile_rules::{BoardRules, Card, CardCatalog, CardId, Connector, Direction, Edges};

pub const G: Connector = Connector::GRASS;
pub const R: Connector = Connector::ROAD;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Grass, crossroads, road corner and road end.
pub fn road_catalog() -> CardCatalog {
    CardCatalog::new([
        Card::new(CardId(1), Edges::uniform(G), 1),
        Card::new(CardId(2), Edges::uniform(R), 1),
        Card::new(CardId(3), Edges::new(R, R, G, G), 1),
        Card::new(CardId(4), Edges::new(R, G, G, G), 1),
    ])
    .expect("valid catalog")
}

/// 3x3 board with the crossroads seeded in the middle.
pub fn crossroads_rules() -> BoardRules {
    BoardRules::new(3, 3).with_seed(1, 1, CardId(2))
}

/// Asserts that every pair of placed neighbors shows the same connector on
/// the shared edge.
pub fn assert_adjacency_valid(board: &ResultBoard, catalog: &CardCatalog) {
    for (x, y, slot) in board.iter_coords() {
        let Some(id) = slot else { continue };
        let card = catalog.get(*id).expect("placed card is in the catalog");
        for direction in Direction::ALL {
            let Some((nx, ny)) = board.neighbor(x, y, direction) else {
                continue;
            };
            if let Some(Some(other_id)) = board.get(nx, ny) {
                let other = catalog.get(*other_id).expect("placed card is in the catalog");
                assert_eq!(
                    card.edges[direction],
                    other.edges[direction.opposite()],
                    "card {id} at ({x}, {y}) clashes with card {other_id} to the {direction:?}"
                );
            }
        }
    }
}

pub fn board_rows(board: &ResultBoard) -> Vec<Vec<Option<u32>>> {
    board
        .rows()
        .map(|row| row.iter().map(|slot| slot.map(|id| id.0)).collect())
        .collect()
}
