//! Certificate material resolution.
//!
//! A certificate descriptor carries either inline PEM text or the path of a
//! PEM file. Inline text always wins; a file reference is read through the
//! client context and normalized to end in exactly one newline. A descriptor
//! with neither form yields no certificate rather than an error, while a
//! failing file read is the one fatal condition in the whole resolver.

use std::fs;

use crate::context::ClientContext;
use crate::document::CertDescriptor;
use crate::error::TopologyError;

/// Resolves a certificate descriptor to PEM text.
///
/// Returns `Ok(None)` when the descriptor carries neither inline text nor a
/// file path. Inline text is returned verbatim. File contents are stripped
/// of trailing whitespace from the raw read, then get exactly one trailing
/// newline appended.
pub fn resolve_pem(
    descriptor: &CertDescriptor,
    context: &ClientContext,
) -> Result<Option<String>, TopologyError> {
    if let Some(pem) = &descriptor.pem {
        return Ok(Some(pem.clone()));
    }
    let Some(path) = &descriptor.path else {
        return Ok(None);
    };

    let resolved = context.resolve_path(path)?;
    let raw = fs::read_to_string(&resolved).map_err(|source| TopologyError::PemRead {
        path: resolved.clone(),
        source,
    })?;
    Ok(Some(format!("{}\n", raw.trim_end())))
}

/// Resolves an optional descriptor, treating an absent descriptor as an
/// absent certificate
pub(crate) fn resolve_opt_pem(
    descriptor: Option<&CertDescriptor>,
    context: &ClientContext,
) -> Result<Option<String>, TopologyError> {
    match descriptor {
        Some(descriptor) => resolve_pem(descriptor, context),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn inline(pem: &str) -> CertDescriptor {
        CertDescriptor {
            pem: Some(pem.to_string()),
            path: None,
        }
    }

    #[test]
    fn test_inline_pem_wins_over_path() {
        let descriptor = CertDescriptor {
            pem: Some("INLINE".to_string()),
            path: Some("/does/not/exist.pem".to_string()),
        };
        let resolved = resolve_pem(&descriptor, &ClientContext::new()).unwrap();
        assert_eq!(resolved.as_deref(), Some("INLINE"));
    }

    #[test]
    fn test_inline_pem_is_verbatim() {
        // no newline normalization on inline text
        let resolved = resolve_pem(&inline("CERT\n\n"), &ClientContext::new()).unwrap();
        assert_eq!(resolved.as_deref(), Some("CERT\n\n"));
    }

    #[test]
    fn test_file_contents_end_in_exactly_one_newline() {
        let cases = vec![
            "-----CERT-----",
            "-----CERT-----\n",
            "-----CERT-----\n\n\n",
            "-----CERT-----\r\n",
            "-----CERT-----  \n",
        ];

        for contents in cases {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            file.write_all(contents.as_bytes()).unwrap();

            let descriptor = CertDescriptor {
                pem: None,
                path: Some(file.path().to_string_lossy().into_owned()),
            };
            let resolved = resolve_pem(&descriptor, &ClientContext::new())
                .unwrap()
                .unwrap();
            assert_eq!(resolved, "-----CERT-----\n", "input {contents:?}");
        }
    }

    #[test]
    fn test_relative_path_resolves_against_context() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ca.pem"), "CERT\n").unwrap();

        let descriptor = CertDescriptor {
            pem: None,
            path: Some("ca.pem".to_string()),
        };
        let ctx = ClientContext::with_base_dir(dir.path());
        let resolved = resolve_pem(&descriptor, &ctx).unwrap();
        assert_eq!(resolved.as_deref(), Some("CERT\n"));
    }

    #[test]
    fn test_empty_descriptor_is_absent() {
        let resolved = resolve_pem(&CertDescriptor::default(), &ClientContext::new()).unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn test_unreadable_file_is_fatal() {
        let descriptor = CertDescriptor {
            pem: None,
            path: Some("/does/not/exist.pem".to_string()),
        };
        let err = resolve_pem(&descriptor, &ClientContext::new()).unwrap_err();
        match err {
            TopologyError::PemRead { path, .. } => {
                assert_eq!(path, std::path::PathBuf::from("/does/not/exist.pem"));
            }
            other => panic!("expected PemRead, got {other:?}"),
        }
    }
}
