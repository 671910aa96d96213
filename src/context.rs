//! Ambient context injected into the resolver.
//!
//! The only environment a resolution ever touches is the directory that
//! relative certificate and credential-store paths are resolved against.
//! That capability is injected here rather than read ad hoc, so callers can
//! pin lookups to a configuration directory instead of the process working
//! directory.

use std::path::{Path, PathBuf};

use crate::error::TopologyError;

/// Path-resolution context for a [`crate::TopologyResolver`].
///
/// With no base directory set, relative paths resolve against the process
/// working directory at the time of the lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientContext {
    base_dir: Option<PathBuf>,
}

impl ClientContext {
    /// Creates a context that resolves against the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that resolves against `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// The configured base directory, if any
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Resolves `path` to absolute form.
    ///
    /// Absolute paths pass through unchanged. Relative paths are joined to
    /// the base directory, or to the process working directory when no base
    /// is set; failure to determine the working directory propagates.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, TopologyError> {
        let path = path.as_ref();
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        match &self.base_dir {
            Some(base) => Ok(base.join(path)),
            None => Ok(std::env::current_dir()?.join(path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_passes_through() {
        let ctx = ClientContext::with_base_dir("/etc/topology");
        let resolved = ctx.resolve_path("/certs/ca.pem").unwrap();
        assert_eq!(resolved, PathBuf::from("/certs/ca.pem"));
    }

    #[test]
    fn test_relative_path_joins_base_dir() {
        let ctx = ClientContext::with_base_dir("/etc/topology");
        let resolved = ctx.resolve_path("certs/ca.pem").unwrap();
        assert_eq!(resolved, PathBuf::from("/etc/topology/certs/ca.pem"));
    }

    #[test]
    fn test_default_resolves_against_working_directory() {
        let ctx = ClientContext::new();
        let resolved = ctx.resolve_path("ca.pem").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("ca.pem"));
    }
}
