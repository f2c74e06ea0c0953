use sprite_packer_core::prelude::*;

#[test]
fn test_fill_ratio_full_canvas() {
    for alg in [Algorithm::Shelf, Algorithm::Guillotine] {
        let cfg = PackerConfig::builder()
            .with_canvas(100, 100)
            .spacing(0)
            .algorithm(alg)
            .build();
        let inputs = (0..4).map(|i| (format!("tex_{}", i), 50, 50)).collect();
        let out = pack_layout(inputs, cfg).expect("pack");
        let stats = out.stats();

        assert_eq!(stats.num_placed, 4, "{:?}", alg);
        assert_eq!(stats.num_unplaced, 0);
        assert_eq!(stats.used_area, 4 * 50 * 50);
        assert_eq!(stats.canvas_area, 100 * 100);
        assert!((stats.fill_ratio - 100.0).abs() < 1e-9);
        assert_eq!(stats.wasted_area(), 0);
        assert_eq!(stats.waste_percentage(), 0.0);
    }
}

#[test]
fn test_fill_ratio_ignores_spacing() {
    let cfg = PackerConfig::builder()
        .with_canvas(100, 50)
        .spacing(4)
        .algorithm(Algorithm::Shelf)
        .build();
    let out = pack_layout(vec![("a", 20, 10), ("b", 30, 10)], cfg).expect("pack");
    // (200 + 300) / 5000
    assert!((out.fill_ratio() - 10.0).abs() < 1e-9);
    assert_eq!(out.used_area(), 500);
}

#[test]
fn test_stats_counts_reasons() {
    let cfg = PackerConfig::builder()
        .with_canvas(64, 64)
        .spacing(0)
        .invalid_items(InvalidItemPolicy::Report)
        .algorithm(Algorithm::Guillotine)
        .build();
    let inputs = vec![
        ("big", 64, 40),
        ("blocked", 64, 30),
        ("huge", 65, 1),
        ("zero", 0, 3),
    ];
    let out = pack_layout(inputs, cfg).expect("pack");
    let stats = out.stats();
    assert_eq!(stats.num_placed, 1);
    assert_eq!(stats.num_unplaced, 2);
    assert_eq!(stats.num_oversized, 1);
    assert_eq!(stats.num_rejected, 1);
    assert_eq!(stats.wasted_area(), 64 * 64 - 64 * 40);

    let summary = stats.summary();
    assert!(summary.contains("Placed: 1"), "{}", summary);
    assert!(summary.contains("Rejected: 1"), "{}", summary);
    assert!(summary.contains("62.50%"), "{}", summary);
}
