use crate::config::{Algorithm, InvalidItemPolicy, PackerConfig};
use crate::error::{Result, SpritePackerError};
use crate::model::{Item, PackResult, Placement, RejectReason, Rejected, Unplaced, UnplacedReason};
use crate::packer::{Packer, footprint, guillotine::GuillotinePacker, shelf::ShelfPacker};
use tracing::{debug, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[instrument(skip_all, fields(algorithm = ?cfg.algorithm, items = items.len()))]
/// Packs `items` onto one canvas described by `cfg`.
///
/// Notes:
/// - Items are packed tallest first; equal heights are ordered by key, so the
///   result does not depend on input order.
/// - Items that do not fit are returned in `unplaced`; that is not an error.
/// - Zero-sized items fail the call or land in `rejected`, per `cfg.invalid_items`.
/// - All scratch state is local to the call.
pub fn pack_items<K: Ord + Clone>(items: Vec<Item<K>>, cfg: PackerConfig) -> Result<PackResult<K>> {
    cfg.validate()?;

    let (sorted, rejected) = prepare_items(items, cfg.invalid_items)?;
    let sized: Vec<Item<usize>> = sorted
        .iter()
        .enumerate()
        .map(|(i, it)| Item::new(i, it.w, it.h))
        .collect();

    let (algorithm, run) = match cfg.algorithm {
        Algorithm::Auto => pack_auto(&sized, &cfg),
        algorithm => (algorithm, run_packer(algorithm, &cfg, &sized)),
    };

    let mut out = PackResult::empty(cfg.canvas_width, cfg.canvas_height, cfg.spacing, algorithm);
    out.rejected = rejected;
    out.placed = run
        .placed
        .into_iter()
        .map(|p| Placement {
            key: sorted[p.key].key.clone(),
            frame: p.frame,
            footprint: p.footprint,
        })
        .collect();
    out.unplaced = run
        .unplaced
        .into_iter()
        .map(|idx| {
            let item = sorted[idx].clone();
            let reason = unplaced_reason(&item, &cfg);
            Unplaced { item, reason }
        })
        .collect();

    debug!(
        ?algorithm,
        placed = out.placed.len(),
        unplaced = out.unplaced.len(),
        rejected = out.rejected.len(),
        fill = format!("{:.2}%", out.fill_ratio()),
        "packed"
    );
    Ok(out)
}

/// First-Fit Decreasing Height packing of `items` onto a `canvas_width x canvas_height` canvas.
pub fn pack_shelf<K: Ord + Clone>(
    canvas_width: u32,
    canvas_height: u32,
    spacing: u32,
    items: Vec<Item<K>>,
) -> Result<PackResult<K>> {
    let cfg = PackerConfig::builder()
        .with_canvas(canvas_width, canvas_height)
        .spacing(spacing)
        .algorithm(Algorithm::Shelf)
        .build();
    pack_items(items, cfg)
}

/// Binary-tree guillotine packing of `items` onto a `canvas_width x canvas_height` canvas.
pub fn pack_guillotine<K: Ord + Clone>(
    canvas_width: u32,
    canvas_height: u32,
    spacing: u32,
    items: Vec<Item<K>>,
) -> Result<PackResult<K>> {
    let cfg = PackerConfig::builder()
        .with_canvas(canvas_width, canvas_height)
        .spacing(spacing)
        .algorithm(Algorithm::Guillotine)
        .build();
    pack_items(items, cfg)
}

/// Packs sizes without any payload. Inputs are (key, width, height).
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, u32, u32)>,
    cfg: PackerConfig,
) -> Result<PackResult<String>> {
    let items = inputs
        .into_iter()
        .map(|(k, w, h)| Item::new(k.into(), w, h))
        .collect();
    pack_items(items, cfg)
}

// ---------- helpers ----------

/// Separates malformed items and sorts the rest into packing order
/// (height descending, then key ascending).
fn prepare_items<K: Ord>(
    items: Vec<Item<K>>,
    policy: InvalidItemPolicy,
) -> Result<(Vec<Item<K>>, Vec<Rejected<K>>)> {
    let mut valid = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match RejectReason::of(item.w, item.h) {
            None => valid.push(item),
            Some(reason) => match policy {
                InvalidItemPolicy::Error => {
                    return Err(SpritePackerError::InvalidItem {
                        index,
                        width: item.w,
                        height: item.h,
                    });
                }
                InvalidItemPolicy::Report => {
                    debug!(index, w = item.w, h = item.h, ?reason, "rejected item");
                    rejected.push(Rejected {
                        index,
                        item,
                        reason,
                    });
                }
            },
        }
    }
    valid.sort_by(|a, b| b.h.cmp(&a.h).then_with(|| a.key.cmp(&b.key)));
    Ok((valid, rejected))
}

fn unplaced_reason<K>(item: &Item<K>, cfg: &PackerConfig) -> UnplacedReason {
    match footprint(item.w, item.h, cfg.spacing) {
        Some((fw, fh)) if fw <= cfg.canvas_width && fh <= cfg.canvas_height => {
            UnplacedReason::NoSpace
        }
        _ => UnplacedReason::Oversized,
    }
}

/// Placements and unplaced items of one strategy run, keyed by position in the sorted list.
struct Run {
    placed: Vec<Placement<usize>>,
    unplaced: Vec<usize>,
}

impl Run {
    fn used_area(&self) -> u64 {
        self.placed.iter().map(|p| p.frame.area()).sum()
    }
}

fn run_packer(algorithm: Algorithm, cfg: &PackerConfig, items: &[Item<usize>]) -> Run {
    let mut packer: Box<dyn Packer<usize>> = match algorithm {
        Algorithm::Shelf => Box::new(ShelfPacker::new(cfg)),
        Algorithm::Guillotine => Box::new(GuillotinePacker::new(cfg)),
        Algorithm::Auto => unreachable!(),
    };
    let mut placed = Vec::with_capacity(items.len());
    let mut unplaced = Vec::new();
    for item in items {
        match packer.pack(item) {
            Some(p) => {
                trace!(idx = item.key, x = p.frame.x, y = p.frame.y, w = item.w, h = item.h, "placed");
                placed.push(p);
            }
            None => {
                trace!(idx = item.key, w = item.w, h = item.h, "no fit");
                unplaced.push(item.key);
            }
        }
    }
    Run { placed, unplaced }
}

/// Runs every strategy and keeps the one with the largest placed area,
/// then the fewest unplaced items, then the earliest candidate.
fn pack_auto(items: &[Item<usize>], cfg: &PackerConfig) -> (Algorithm, Run) {
    const CANDIDATES: [Algorithm; 2] = [Algorithm::Shelf, Algorithm::Guillotine];

    #[cfg(feature = "parallel")]
    let runs: Vec<(Algorithm, Run)> = if cfg.parallel {
        CANDIDATES[..]
            .par_iter()
            .map(|&alg| (alg, run_packer(alg, cfg, items)))
            .collect()
    } else {
        CANDIDATES
            .iter()
            .map(|&alg| (alg, run_packer(alg, cfg, items)))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let runs: Vec<(Algorithm, Run)> = CANDIDATES
        .iter()
        .map(|&alg| (alg, run_packer(alg, cfg, items)))
        .collect();

    let mut best: Option<(Algorithm, Run, u64)> = None;
    for (alg, run) in runs {
        let area = run.used_area();
        debug!(?alg, area, unplaced = run.unplaced.len(), "auto candidate");
        match &mut best {
            None => best = Some((alg, run, area)),
            Some((balg, brun, barea)) => {
                if area > *barea || (area == *barea && run.unplaced.len() < brun.unplaced.len()) {
                    *balg = alg;
                    *brun = run;
                    *barea = area;
                }
            }
        }
    }
    match best {
        Some((alg, run, _)) => (alg, run),
        None => (
            Algorithm::Shelf,
            Run {
                placed: Vec::new(),
                unplaced: Vec::new(),
            },
        ),
    }
}
