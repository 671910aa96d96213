//! Error types for topology resolution operations.
//!
//! Lookup misses are not errors: a name with no matching configuration entry
//! resolves to `None`. The variants here cover the few genuinely fatal
//! conditions, chiefly a certificate file that cannot be read.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving a network topology
#[derive(Error, Debug)]
pub enum TopologyError {
    /// A file-referenced certificate could not be read
    #[error("Problem reading the PEM file {path}: {source}")]
    PemRead {
        /// Absolute path of the certificate file
        path: PathBuf,
        /// The underlying read failure
        source: std::io::Error,
    },

    /// I/O error while resolving a path against the working directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration document is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
