//! Core library for packing sprites onto a single fixed-size canvas.
//!
//! - Algorithms: Shelf (First-Fit Decreasing Height) and Guillotine (binary tree), plus Auto
//! - Pipeline: `pack_items` takes sized items and returns placements, unplaced items and stats
//! - No pixels and no I/O here; compositing belongs to the caller (see the CLI crate).
//!
//! Quick example:
//! ```
//! use sprite_packer_core::{Algorithm, Item, PackerConfig, pack_items};
//! # fn main() -> sprite_packer_core::Result<()> {
//! let items = vec![Item::new("a", 60, 60), Item::new("b", 30, 30)];
//! let cfg = PackerConfig::builder()
//!     .with_canvas(100, 100)
//!     .spacing(0)
//!     .algorithm(Algorithm::Shelf)
//!     .build();
//! let out = pack_items(items, cfg)?;
//! assert_eq!(out.placed.len(), 2);
//! println!("filled: {:.1}%", out.fill_ratio());
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `sprite_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{Algorithm, InvalidItemPolicy, PackerConfig, PackerConfigBuilder};
    pub use crate::model::{
        Item, PackResult, PackStats, Placement, Rect, RejectReason, Rejected, Unplaced,
        UnplacedReason,
    };
    pub use crate::{pack_guillotine, pack_items, pack_layout, pack_shelf};
}
