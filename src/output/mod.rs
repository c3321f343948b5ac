//! Output layout and integrity sidecars
//!
//! Downloads for one run land under `<base>/<SLUG>/<timestamp>/`, with one
//! `NNNN_<video id>.mp4` file per item and a matching `.sha256` sidecar
//! holding the lowercase hex digest of the file's contents.

pub mod checksum;
pub mod path;

/// Output errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
