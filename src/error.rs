//! Error type for the fallible outer surfaces (file I/O, JSON, validation).
//!
//! The simulator and hit-testing never fail; degenerate input is handled
//! numerically there.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine the config directory")]
    NoConfigDir,

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid viewport {width}x{height}: dimensions must be positive and finite")]
    InvalidViewport { width: f32, height: f32 },

    #[error(
        "edge {from} -> {to} has weight {weight}, expected a positive number up to {max}",
        max = crate::graph::types::MAX_EDGE_WEIGHT
    )]
    InvalidWeight { from: String, to: String, weight: f32 },
}

impl NetworkError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;
