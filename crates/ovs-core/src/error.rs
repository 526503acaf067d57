//! Error types for the core crate.

use std::path::PathBuf;

/// An image could not be turned into pixels.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unsupported or corrupt image data: {0}")]
    Image(#[from] image::ImageError),

    #[error("image has no pixels ({width}×{height})")]
    Empty { width: u32, height: u32 },

    #[error("decode worker exited before delivering a result")]
    WorkerLost,
}

/// An editor configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{field}` must be a positive number, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("font size range is empty: {min}..={max}")]
    FontRange { min: f64, max: f64 },
}

/// A named default overlay asset could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset name {0:?} is not a plain file name")]
    InvalidName(String),

    #[error("asset {name:?} not found under {}", root.display())]
    NotFound { name: String, root: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("asset {name:?} failed to decode: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },
}

/// A remote collaborator (overlay generation) failed.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("overlay service request failed: {0}")]
    Service(String),

    #[error("overlay service returned an undecodable image: {0}")]
    Decode(#[from] DecodeError),
}
