//! Error types for the core layer.

use std::path::PathBuf;

/// Failures that prevent motion from being set up at all.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    /// Every feature animates through the engine, so this is fatal.
    #[error("animation engine unavailable: frame rate must be at least 1 fps (got {fps})")]
    EngineUnavailable { fps: u32 },
}

/// Failures loading a deck file.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("failed to read deck {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse deck {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("deck has no cards")]
    Empty,
    #[error("duplicate card key `{0}`")]
    DuplicateKey(String),
}
