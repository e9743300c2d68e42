//! Error types
//!
//! Only load-time and growth failures are errors. Everything that can go
//! wrong inside a frame (full pool, unknown type id, no active scene) is a
//! `None` the caller inspects.

use thiserror::Error;

/// The slab container could not grow its backing storage.
#[derive(Debug, Error)]
pub enum SlabError {
    #[error("slab allocation failed growing to {requested} slots: {source}")]
    Alloc {
        requested: usize,
        #[source]
        source: std::collections::TryReserveError,
    },
}

/// Malformed baked asset data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("{what}: expected at least {expected} elements, found {actual}")]
    Truncated {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("sprite has zero width or height ({width}x{height})")]
    ZeroSize { width: u16, height: u16 },
    #[error("sprite pixel count {pixels} is not a whole number of {width}x{height} frames")]
    PartialFrame { width: u16, height: u16, pixels: usize },
    #[error("animation clip {clip} has no frames")]
    EmptyClip { clip: usize },
    #[error("animation clip {clip} has unknown play mode {mode}")]
    UnknownMode { clip: usize, mode: u8 },
    #[error("tilemap {field} {value} is outside 0..=255")]
    BadDimension { field: &'static str, value: i16 },
    #[error("byte buffer has odd length {0}, expected 16-bit words")]
    OddLength(usize),
}

/// Error type for runtime configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}
