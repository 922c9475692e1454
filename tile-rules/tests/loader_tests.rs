use tile_rules::loader::load_from_file;
use tile_rules::{CardId, Connector, Edges, LoadError, RandomizerMode, SeedTile};

const G: Connector = Connector::GRASS;
const R: Connector = Connector::ROAD;

// Helper function to create the full path to test data
fn test_data_path(filename: &str) -> std::path::PathBuf {
    let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("rules_data");
    path.push(filename);
    path
}

#[test]
fn test_load_basic_json() {
    let book = load_from_file(&test_data_path("basic_rules.json")).unwrap();

    assert_eq!(book.image_size, Some(32));
    assert_eq!(book.rules.width, 20);
    assert_eq!(book.rules.height, 10);
    assert_eq!(book.rules.randomizer, RandomizerMode::Weighted);
    assert_eq!(book.rules.seed_tiles, vec![SeedTile::new(10, 5, CardId(4))]);

    // 5 base cards, 1 + 3 + 3 rotations
    let expected = [
        (1, Edges::new(G, G, G, G)),
        (2, Edges::new(R, G, R, G)),
        (3, Edges::new(G, R, G, R)),
        (4, Edges::new(R, R, R, R)),
        (5, Edges::new(R, R, G, G)),
        (6, Edges::new(G, R, R, G)),
        (7, Edges::new(G, G, R, R)),
        (8, Edges::new(R, G, G, R)),
        (9, Edges::new(G, G, G, R)),
        (10, Edges::new(R, G, G, G)),
        (11, Edges::new(G, R, G, G)),
        (12, Edges::new(G, G, R, G)),
    ];
    assert_eq!(book.catalog.len(), expected.len());
    for (id, edges) in expected {
        let card = book.catalog.get(CardId(id)).expect("card missing");
        assert_eq!(card.edges, edges, "card {id}");
    }
    assert_eq!(book.catalog.weight(CardId(1)), Some(4));
    assert_eq!(book.catalog.weight(CardId(8)), Some(1));

    let corner = book.sprite(CardId(7)).expect("sprite missing");
    assert_eq!(corner.filename, "corner.png");
    assert_eq!(corner.image_location, Some([96, 0, 32, 32]));
    assert_eq!(corner.quarter_turns, 2);
}

#[test]
fn test_load_valid_simple_ron() {
    let book = load_from_file(&test_data_path("valid_simple.ron")).unwrap();
    assert_eq!(book.rules.width, 3);
    assert_eq!(book.rules.height, 3);
    assert_eq!(book.rules.randomizer, RandomizerMode::Basic);
    assert_eq!(book.catalog.len(), 4);
    assert_eq!(book.catalog.get(CardId(3)).unwrap().edges, Edges::new(R, R, G, G));
    assert_eq!(book.rules.seed_tiles, vec![SeedTile::new(1, 1, CardId(2))]);
}

#[test]
fn test_load_invalid_connectors() {
    match load_from_file(&test_data_path("invalid_connectors.json")) {
        Err(LoadError::InvalidData(msg)) => assert!(msg.contains("invalid connectors 'GGG'")),
        other => panic!("Expected InvalidData error for connectors, got {other:?}"),
    }
}

#[test]
fn test_load_invalid_rotation() {
    match load_from_file(&test_data_path("invalid_rotation.json")) {
        Err(LoadError::InvalidData(msg)) => assert!(msg.contains("not a multiple of 90")),
        other => panic!("Expected InvalidData error for rotation, got {other:?}"),
    }
}

#[test]
fn test_load_invalid_zero_weight() {
    match load_from_file(&test_data_path("invalid_zero_weight.json")) {
        Err(LoadError::InvalidData(msg)) => {
            assert!(msg.contains("weight 0"), "Error message missing 'weight 0': {msg}");
        }
        other => panic!("Expected InvalidData error for zero weight, got {other:?}"),
    }
}

#[test]
fn test_load_invalid_dimensions() {
    match load_from_file(&test_data_path("invalid_dimensions.json")) {
        Err(LoadError::InvalidData(msg)) => assert!(msg.contains("0x4")),
        other => panic!("Expected InvalidData error for dimensions, got {other:?}"),
    }
}

#[test]
fn test_load_invalid_json_format() {
    match load_from_file(&test_data_path("invalid_format.json")) {
        Err(LoadError::ParseError(msg)) => assert!(msg.contains("JSON deserialization failed")),
        other => panic!("Expected ParseError for invalid format, got {other:?}"),
    }
}

#[test]
fn test_load_invalid_ron_format() {
    match load_from_file(&test_data_path("invalid_format.ron")) {
        Err(LoadError::ParseError(msg)) => assert!(msg.contains("RON deserialization failed")),
        other => panic!("Expected ParseError for invalid format, got {other:?}"),
    }
}

#[test]
fn test_load_unsupported_extension() {
    match load_from_file(&test_data_path("rules.yaml")) {
        Err(LoadError::UnsupportedFormat(path)) => assert!(path.ends_with("rules.yaml")),
        other => panic!("Expected UnsupportedFormat, got {other:?}"),
    }
}

#[test]
fn test_load_file_not_found() {
    let result = load_from_file(&test_data_path("non_existent_file.json"));
    assert!(matches!(result, Err(LoadError::Io(_))));
}

#[test]
fn test_load_from_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("RULES.JSON");
    std::fs::write(
        &path,
        r#"{"boardWidth": 2, "boardHeight": 2, "baseCards": [{"connectors": "RGRG", "rotations": [-90]}]}"#,
    )
    .unwrap();

    let book = load_from_file(&path).unwrap();
    assert_eq!(book.catalog.len(), 2);
    assert_eq!(book.catalog.get(CardId(2)).unwrap().edges, Edges::new(G, R, G, R));
}
