use crate::error::SpritePackerError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Packing strategies. Both share the same contract: items in, placements + unplaced out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// First-Fit Decreasing Height over a list of free shelves.
    Shelf,
    /// Binary-tree guillotine partition (right/down splits).
    Guillotine,
    /// Run both and keep the better result (placed area, then fewer unplaced).
    Auto,
}

impl FromStr for Algorithm {
    type Err = SpritePackerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shelf" | "ffdh" => Ok(Self::Shelf),
            "guillotine" | "binary" | "tree" => Ok(Self::Guillotine),
            "auto" => Ok(Self::Auto),
            other => Err(SpritePackerError::InvalidConfig(format!(
                "unknown algorithm: {}",
                other
            ))),
        }
    }
}

/// What to do with zero-sized input items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvalidItemPolicy {
    /// Fail the whole call on the first zero-sized item.
    Error,
    /// Leave zero-sized items out and list them in `PackResult::rejected`.
    Report,
}

impl FromStr for InvalidItemPolicy {
    type Err = SpritePackerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "report" => Ok(Self::Report),
            other => Err(SpritePackerError::InvalidConfig(format!(
                "unknown invalid item policy: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackerConfig {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Pixels reserved to the right of and below every item.
    pub spacing: u32,

    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    #[serde(default = "default_invalid_items")]
    pub invalid_items: InvalidItemPolicy,
    /// Evaluate auto candidates in parallel when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1024,
            canvas_height: 1024,
            spacing: 2,
            algorithm: default_algorithm(),
            invalid_items: default_invalid_items(),
            parallel: false,
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if either canvas dimension is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(SpritePackerError::InvalidDimensions {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }

        // Not an error: every item simply comes back oversized.
        if self.spacing >= self.canvas_width || self.spacing >= self.canvas_height {
            tracing::warn!(
                spacing = self.spacing,
                canvas_width = self.canvas_width,
                canvas_height = self.canvas_height,
                "spacing leaves no room on the canvas"
            );
        }

        Ok(())
    }
}

fn default_algorithm() -> Algorithm {
    Algorithm::Guillotine
}
fn default_invalid_items() -> InvalidItemPolicy {
    InvalidItemPolicy::Error
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_canvas(mut self, w: u32, h: u32) -> Self {
        self.cfg.canvas_width = w;
        self.cfg.canvas_height = h;
        self
    }
    pub fn spacing(mut self, v: u32) -> Self {
        self.cfg.spacing = v;
        self
    }
    pub fn algorithm(mut self, v: Algorithm) -> Self {
        self.cfg.algorithm = v;
        self
    }
    pub fn invalid_items(mut self, v: InvalidItemPolicy) -> Self {
        self.cfg.invalid_items = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
