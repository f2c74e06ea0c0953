use sprite_packer_core::config::{Algorithm, InvalidItemPolicy, PackerConfig};
use sprite_packer_core::error::SpritePackerError;
use sprite_packer_core::model::{Item, RejectReason};
use sprite_packer_core::{pack_items, pack_layout, pack_shelf};

/// Test zero-sized canvas dimensions
#[test]
fn test_zero_width() {
    let cfg = PackerConfig {
        canvas_width: 0,
        canvas_height: 1024,
        ..Default::default()
    };

    match cfg.validate() {
        Err(SpritePackerError::InvalidDimensions { width, height }) => {
            assert_eq!(width, 0);
            assert_eq!(height, 1024);
        }
        other => panic!("Expected InvalidDimensions error, got {:?}", other),
    }
}

#[test]
fn test_zero_height_fails_the_whole_call() {
    let result = pack_shelf(64, 0, 0, vec![Item::new("a", 8, 8)]);
    assert!(matches!(
        result,
        Err(SpritePackerError::InvalidDimensions {
            width: 64,
            height: 0
        })
    ));
}

#[test]
fn test_huge_spacing_is_not_an_error() {
    let cfg = PackerConfig::builder()
        .with_canvas(16, 16)
        .spacing(16)
        .build();
    assert!(cfg.validate().is_ok());
    let out = pack_layout(vec![("a", 1, 1)], cfg).expect("pack");
    assert!(out.placed.is_empty());
    assert_eq!(out.unplaced.len(), 1);
}

/// Zero-sized items
#[test]
fn test_zero_item_is_an_error_by_default() {
    let items = vec![Item::new("ok", 10, 10), Item::new("bad", 0, 5)];
    let result = pack_items(items, PackerConfig::default());
    match result {
        Err(SpritePackerError::InvalidItem {
            index,
            width,
            height,
        }) => {
            assert_eq!(index, 1);
            assert_eq!(width, 0);
            assert_eq!(height, 5);
        }
        other => panic!("Expected InvalidItem error, got {:?}", other),
    }
}

#[test]
fn test_zero_items_reported_separately() {
    let cfg = PackerConfig::builder()
        .with_canvas(100, 100)
        .spacing(0)
        .invalid_items(InvalidItemPolicy::Report)
        .build();
    let items = vec![
        Item::new("w0", 0, 5),
        Item::new("ok", 10, 10),
        Item::new("h0", 5, 0),
        Item::new("both", 0, 0),
        Item::new("big", 200, 10),
    ];
    let out = pack_items(items, cfg).expect("pack");
    assert_eq!(out.placed.len(), 1);
    assert_eq!(out.unplaced.len(), 1);
    assert_eq!(out.unplaced[0].item.key, "big");

    let rejected: Vec<(usize, &str, RejectReason)> = out
        .rejected
        .iter()
        .map(|r| (r.index, r.item.key, r.reason))
        .collect();
    assert_eq!(
        rejected,
        vec![
            (0, "w0", RejectReason::ZeroWidth),
            (2, "h0", RejectReason::ZeroHeight),
            (3, "both", RejectReason::ZeroSize),
        ]
    );
    assert_eq!(
        out.placed.len() + out.unplaced.len() + out.rejected.len(),
        5
    );
}

#[test]
fn test_item_exactly_canvas_sized() {
    for alg in [Algorithm::Shelf, Algorithm::Guillotine] {
        let cfg = PackerConfig::builder()
            .with_canvas(128, 64)
            .spacing(0)
            .algorithm(alg)
            .build();
        let out = pack_layout(vec![("full", 128, 64), ("more", 1, 1)], cfg).expect("pack");
        assert_eq!(out.placed.len(), 1);
        assert_eq!(out.placed[0].key, "full");
        assert_eq!(out.unplaced[0].item.key, "more");
        assert!(!out.is_complete());
    }
}

#[test]
fn test_large_dimensions_do_not_overflow() {
    let cfg = PackerConfig::builder()
        .with_canvas(u32::MAX, u32::MAX)
        .spacing(u32::MAX)
        .build();
    let out = pack_layout(vec![("a", u32::MAX, 1)], cfg).expect("pack");
    assert!(out.placed.is_empty());
    assert_eq!(out.unplaced.len(), 1);
}

#[test]
fn test_parse_enums() {
    assert_eq!("FFDH".parse::<Algorithm>().ok(), Some(Algorithm::Shelf));
    assert_eq!("shelf".parse::<Algorithm>().ok(), Some(Algorithm::Shelf));
    assert_eq!("binary".parse::<Algorithm>().ok(), Some(Algorithm::Guillotine));
    assert_eq!("Auto".parse::<Algorithm>().ok(), Some(Algorithm::Auto));
    assert!(matches!(
        "maxrects".parse::<Algorithm>(),
        Err(SpritePackerError::InvalidConfig(msg)) if msg.contains("maxrects")
    ));
    assert_eq!(
        "report".parse::<InvalidItemPolicy>().ok(),
        Some(InvalidItemPolicy::Report)
    );
}

#[test]
fn test_config_serde_defaults() {
    let cfg: PackerConfig =
        serde_json::from_str(r#"{"canvas_width": 256, "canvas_height": 128, "spacing": 1}"#)
            .expect("parse");
    assert_eq!(cfg.algorithm, Algorithm::Guillotine);
    assert_eq!(cfg.invalid_items, InvalidItemPolicy::Error);
    assert!(!cfg.parallel);
}
