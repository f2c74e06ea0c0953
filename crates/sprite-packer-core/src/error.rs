use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpritePackerError {
    #[error("Invalid canvas dimensions: {width}x{height} (both must be greater than zero)")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid item at index {index}: {width}x{height} (both must be greater than zero)")]
    InvalidItem { index: usize, width: u32, height: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SpritePackerError>;
