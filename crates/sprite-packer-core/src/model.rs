use crate::config::Algorithm;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn x2(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn y2(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.x2() <= self.x2() && r.y2() <= self.y2()
    }
    /// Returns true if the interiors of `self` and `r` overlap. Touching edges do not count.
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.x2() || r.x >= self.x2() || self.y >= r.y2() || r.y >= self.y2())
    }
    pub fn fits(&self, w: u32, h: u32) -> bool {
        w <= self.w && h <= self.h
    }
}

/// An item to pack: a size plus an opaque key used to correlate results with inputs.
///
/// The key only participates in ordering (as the tie-break between equal heights);
/// the packers never inspect it otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item<K = String> {
    pub key: K,
    pub w: u32,
    pub h: u32,
}

impl<K> Item<K> {
    pub fn new(key: K, w: u32, h: u32) -> Self {
        Self { key, w, h }
    }
    pub fn is_valid(&self) -> bool {
        self.w > 0 && self.h > 0
    }
}

/// A placed item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement<K = String> {
    pub key: K,
    /// Drawn rectangle: the item's true size at its placed position.
    pub frame: Rect,
    /// Reserved rectangle: `frame` grown by the spacing on its right and bottom.
    pub footprint: Rect,
}

/// Why an item ended up unplaced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnplacedReason {
    /// The footprint is larger than the empty canvas.
    Oversized,
    /// The footprint fits the empty canvas but earlier placements used up the room.
    NoSpace,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Unplaced<K = String> {
    pub item: Item<K>,
    pub reason: UnplacedReason,
}

/// Why an input item was refused before packing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    ZeroWidth,
    ZeroHeight,
    ZeroSize,
}

impl RejectReason {
    pub fn of(w: u32, h: u32) -> Option<Self> {
        match (w == 0, h == 0) {
            (true, true) => Some(Self::ZeroSize),
            (true, false) => Some(Self::ZeroWidth),
            (false, true) => Some(Self::ZeroHeight),
            (false, false) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rejected<K = String> {
    /// Position of the item in the caller's input list.
    pub index: usize,
    pub item: Item<K>,
    pub reason: RejectReason,
}

/// Outcome of one pack call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackResult<K = String> {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub spacing: u32,
    /// Strategy that produced this result (the winner when `Auto` was requested).
    pub algorithm: Algorithm,
    /// Placements in packing order (height descending, then key ascending).
    pub placed: Vec<Placement<K>>,
    /// Items that did not fit, in packing order.
    pub unplaced: Vec<Unplaced<K>>,
    /// Malformed inputs, only populated under `InvalidItemPolicy::Report`.
    pub rejected: Vec<Rejected<K>>,
}

impl<K> PackResult<K> {
    pub(crate) fn empty(
        canvas_width: u32,
        canvas_height: u32,
        spacing: u32,
        algorithm: Algorithm,
    ) -> Self {
        Self {
            canvas_width,
            canvas_height,
            spacing,
            algorithm,
            placed: Vec::new(),
            unplaced: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn canvas_area(&self) -> u64 {
        (self.canvas_width as u64) * (self.canvas_height as u64)
    }

    /// Sum of the placed frames' true areas.
    pub fn used_area(&self) -> u64 {
        self.placed.iter().map(|p| p.frame.area()).sum()
    }

    /// Percentage (0.0 to 100.0) of the canvas covered by placed frames.
    pub fn fill_ratio(&self) -> f64 {
        let total = self.canvas_area();
        if total > 0 {
            self.used_area() as f64 / total as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty() && self.rejected.is_empty()
    }

    /// Computes packing statistics for this result.
    pub fn stats(&self) -> PackStats {
        let canvas_area = self.canvas_area();
        let used_area = self.used_area();
        PackStats {
            num_placed: self.placed.len(),
            num_unplaced: self.unplaced.len(),
            num_oversized: self
                .unplaced
                .iter()
                .filter(|u| u.reason == UnplacedReason::Oversized)
                .count(),
            num_rejected: self.rejected.len(),
            canvas_area,
            used_area,
            fill_ratio: self.fill_ratio(),
        }
    }
}

/// Statistics about one pack call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PackStats {
    pub num_placed: usize,
    /// Items left out for any reason, oversized ones included.
    pub num_unplaced: usize,
    pub num_oversized: usize,
    pub num_rejected: usize,
    /// Canvas width * height.
    pub canvas_area: u64,
    /// Sum of placed frame width * height (spacing excluded).
    pub used_area: u64,
    /// used_area / canvas_area, as a percentage (0.0 to 100.0).
    pub fill_ratio: f64,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Placed: {}, Unplaced: {} ({} oversized), Rejected: {}, Filled: {:.2}%, Canvas: {} px², Used: {} px²",
            self.num_placed,
            self.num_unplaced,
            self.num_oversized,
            self.num_rejected,
            self.fill_ratio,
            self.canvas_area,
            self.used_area,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.canvas_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.canvas_area > 0 {
            (self.wasted_area() as f64 / self.canvas_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
