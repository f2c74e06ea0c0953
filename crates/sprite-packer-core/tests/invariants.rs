use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sprite_packer_core::prelude::*;

fn random_items(seed: u64, count: usize, min: u32, max: u32) -> Vec<Item<String>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min..=max);
            let h = rng.gen_range(min..=max);
            Item::new(format!("r{:03}", i), w, h)
        })
        .collect()
}

fn cfg(algorithm: Algorithm, spacing: u32) -> PackerConfig {
    PackerConfig::builder()
        .with_canvas(512, 384)
        .spacing(spacing)
        .algorithm(algorithm)
        .build()
}

fn footprints_disjoint(placed: &[Placement<String>]) -> bool {
    for i in 0..placed.len() {
        for j in (i + 1)..placed.len() {
            if placed[i].footprint.intersects(&placed[j].footprint) {
                return false;
            }
        }
    }
    true
}

#[test]
fn placements_are_disjoint_and_in_bounds() {
    for alg in [Algorithm::Shelf, Algorithm::Guillotine, Algorithm::Auto] {
        for (seed, spacing) in [(1u64, 0u32), (7, 2), (42, 3)] {
            let items = random_items(seed, 200, 4, 64);
            let out = pack_items(items.clone(), cfg(alg, spacing)).expect("pack");
            let canvas = Rect::new(0, 0, 512, 384);

            assert!(
                footprints_disjoint(&out.placed),
                "overlap alg={:?} seed={}",
                alg,
                seed
            );
            for p in &out.placed {
                assert!(canvas.contains(&p.footprint), "out of bounds: {:?}", p);
                assert!(p.footprint.contains(&p.frame));
                assert_eq!(p.footprint.w, p.frame.w + spacing);
                assert_eq!(p.footprint.h, p.frame.h + spacing);
                let src = items.iter().find(|it| it.key == p.key).expect("known key");
                assert_eq!((p.frame.w, p.frame.h), (src.w, src.h));
            }
            // 200 random items never all fit on this canvas
            assert!(!out.unplaced.is_empty());
        }
    }
}

#[test]
fn every_item_is_accounted_for_once() {
    for alg in [Algorithm::Shelf, Algorithm::Guillotine] {
        let items = random_items(99, 150, 1, 80);
        let out = pack_items(items.clone(), cfg(alg, 2)).expect("pack");
        assert_eq!(out.placed.len() + out.unplaced.len(), items.len());

        let mut seen: Vec<&str> = out
            .placed
            .iter()
            .map(|p| p.key.as_str())
            .chain(out.unplaced.iter().map(|u| u.item.key.as_str()))
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), items.len());
    }
}

#[test]
fn repeated_calls_are_identical() {
    for alg in [Algorithm::Shelf, Algorithm::Guillotine, Algorithm::Auto] {
        let items = random_items(5, 120, 2, 90);
        let a = pack_items(items.clone(), cfg(alg, 1)).expect("pack a");
        let b = pack_items(items, cfg(alg, 1)).expect("pack b");
        assert_eq!(a, b);
    }
}

#[test]
fn input_order_does_not_matter() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(2024);
    for alg in [Algorithm::Shelf, Algorithm::Guillotine] {
        let items = random_items(11, 100, 4, 48);
        let reference = pack_items(items.clone(), cfg(alg, 2)).expect("pack");
        for _ in 0..5 {
            let mut shuffled = items.clone();
            shuffled.shuffle(&mut rng);
            let out = pack_items(shuffled, cfg(alg, 2)).expect("pack shuffled");
            assert_eq!(out.placed, reference.placed);
            assert_eq!(out.unplaced, reference.unplaced);
        }
    }
}

#[test]
fn oversized_items_are_always_unplaced() {
    for alg in [Algorithm::Shelf, Algorithm::Guillotine] {
        let mut items = random_items(3, 40, 4, 32);
        items.push(Item::new("too_wide".into(), 513, 10));
        items.push(Item::new("too_tall".into(), 10, 385));
        // fits alone only without spacing
        items.push(Item::new("edge".into(), 512, 1));
        let out = pack_items(items, cfg(alg, 1)).expect("pack");
        for key in ["too_wide", "too_tall", "edge"] {
            let u = out
                .unplaced
                .iter()
                .find(|u| u.item.key == key)
                .unwrap_or_else(|| panic!("{} should be unplaced", key));
            assert_eq!(u.reason, UnplacedReason::Oversized);
        }
        assert!(out.placed.iter().all(|p| !p.key.starts_with("too_")));
    }
}

#[test]
fn unit_items_fill_the_canvas_completely() {
    for alg in [Algorithm::Shelf, Algorithm::Guillotine] {
        let items: Vec<Item<u32>> = (0..2500).map(|i| Item::new(i, 1, 1)).collect();
        let cfg = PackerConfig::builder()
            .with_canvas(50, 50)
            .spacing(0)
            .algorithm(alg)
            .build();
        let out = pack_items(items, cfg).expect("pack");
        assert_eq!(out.placed.len(), 2500, "{:?}", alg);
        assert!(out.unplaced.is_empty());
        assert!((out.fill_ratio() - 100.0).abs() < f64::EPSILON);
    }
}

#[test]
fn independent_calls_can_run_concurrently() {
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            std::thread::spawn(move || {
                let items = random_items(seed, 80, 4, 40);
                let a = pack_items(items.clone(), cfg(Algorithm::Guillotine, 2)).expect("pack");
                let b = pack_items(items, cfg(Algorithm::Guillotine, 2)).expect("pack");
                a == b
            })
        })
        .collect();
    for h in handles {
        assert!(h.join().expect("thread"));
    }
}
