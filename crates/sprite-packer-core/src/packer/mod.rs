use crate::model::{Item, Placement, Rect};

pub mod guillotine;
pub mod shelf;

/// A packer places items onto one fixed canvas.
///
/// Implementations own all of their free-space bookkeeping; a fresh packer is
/// built for every pack call, so nothing leaks between calls.
/// Items are expected in packing order and with non-zero sizes; `pack`
/// returns `None` when the item's footprint fits nowhere.
pub trait Packer<K> {
    fn can_pack(&self, w: u32, h: u32) -> bool;
    fn pack(&mut self, item: &Item<K>) -> Option<Placement<K>>;
}

/// Item size grown by the spacing, or `None` when that overflows `u32`
/// (such an item fits no canvas).
pub(crate) fn footprint(w: u32, h: u32, spacing: u32) -> Option<(u32, u32)> {
    Some((w.checked_add(spacing)?, h.checked_add(spacing)?))
}

/// Builds a placement whose footprint starts at `(x, y)`. The frame keeps the
/// item's true size in the footprint's top-left corner.
pub(crate) fn place_at<K: Clone>(item: &Item<K>, x: u32, y: u32, spacing: u32) -> Placement<K> {
    Placement {
        key: item.key.clone(),
        frame: Rect::new(x, y, item.w, item.h),
        footprint: Rect::new(x, y, item.w + spacing, item.h + spacing),
    }
}
