use std::path::PathBuf;

use thiserror::Error;

/// Library error type for stereogram synthesis and its inputs.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected command-line options or option combinations.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The windowing subsystem failed to come up.
    #[error("initialization failed: {0}")]
    Init(String),

    /// A tile image, depth map, or font could not be opened or decoded.
    #[error("failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// Input geometry or pixel format the synthesizer cannot accept.
    #[error("unsupported format: {0}")]
    Format(String),

    /// Output image could not be encoded or written.
    #[error("failed to write output: {0}")]
    Encode(String),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
