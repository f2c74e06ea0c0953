//! First-Fit Decreasing Height over a list of free shelves.
//!
//! Every free shelf is a plain rectangle. An item goes into the most recently
//! created shelf that can hold its footprint; the shelf is then consumed from
//! the left, from the top, or split into a right remainder (pushed as a new
//! shelf) and a band below (kept in place).

use super::{Packer, footprint, place_at};
use crate::config::PackerConfig;
use crate::model::{Item, Placement, Rect};

pub struct ShelfPacker {
    spacing: u32,
    free: Vec<Rect>,
}

impl ShelfPacker {
    pub fn new(config: &PackerConfig) -> Self {
        Self {
            spacing: config.spacing,
            free: vec![Rect::new(0, 0, config.canvas_width, config.canvas_height)],
        }
    }

    /// Current free shelves, oldest first.
    pub fn free_spaces(&self) -> &[Rect] {
        &self.free
    }

    /// Index of the last shelf that holds a `fw x fh` footprint.
    fn find(&self, fw: u32, fh: u32) -> Option<usize> {
        self.free.iter().rposition(|space| space.fits(fw, fh))
    }

    fn consume(&mut self, idx: usize, fw: u32, fh: u32) {
        let space = self.free[idx];
        match (fw == space.w, fh == space.h) {
            (true, true) => {
                self.free.swap_remove(idx);
            }
            (false, true) => {
                let s = &mut self.free[idx];
                s.x += fw;
                s.w -= fw;
            }
            (true, false) => {
                let s = &mut self.free[idx];
                s.y += fh;
                s.h -= fh;
            }
            (false, false) => {
                self.free
                    .push(Rect::new(space.x + fw, space.y, space.w - fw, fh));
                let s = &mut self.free[idx];
                s.y += fh;
                s.h -= fh;
            }
        }
    }
}

impl<K: Clone> Packer<K> for ShelfPacker {
    fn can_pack(&self, w: u32, h: u32) -> bool {
        footprint(w, h, self.spacing).is_some_and(|(fw, fh)| self.find(fw, fh).is_some())
    }

    fn pack(&mut self, item: &Item<K>) -> Option<Placement<K>> {
        let (fw, fh) = footprint(item.w, item.h, self.spacing)?;
        let idx = self.find(fw, fh)?;
        let space = self.free[idx];
        self.consume(idx, fw, fh);
        Some(place_at(item, space.x, space.y, self.spacing))
    }
}
