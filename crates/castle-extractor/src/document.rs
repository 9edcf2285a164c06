//! Document loading

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use castle_core::{CastleError, Document, Result};

/// Read a UTF-8 text document in full.
///
/// A missing file yields an empty document rather than an error, so the
/// pipeline still runs and produces empty outputs.
pub fn read_document(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();

    match std::fs::read_to_string(path) {
        Ok(text) => {
            debug!(path = %path.display(), bytes = text.len(), "read input document");
            Ok(Document::new(text).with_source(path))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "input document not found, treating as empty");
            Ok(Document::empty(path))
        }
        Err(e) => Err(CastleError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.txt");
        std::fs::write(&path, "John likes Mary.").unwrap();

        let doc = read_document(&path).unwrap();
        assert_eq!(doc.text, "John likes Mary.");
        assert_eq!(doc.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_missing_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let doc = read_document(&path).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_document(dir.path()),
            Err(CastleError::Io { .. })
        ));
    }
}
