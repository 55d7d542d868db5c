//! Error types.
//!
//! Widget outcomes are `Reply` values; this enum only covers the edges of
//! the crate: the terminal device, configuration files and checked canvas
//! access.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("canvas index {index} out of range (len {len})")]
    CanvasIndex { index: usize, len: usize },

    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
