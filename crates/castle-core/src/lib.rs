//! Castle Core - Domain models, namespaces, and shared types
//!
//! This crate defines the core abstractions used throughout Castle:
//! - Documents read from disk
//! - RDF namespaces and IRIs
//! - Triples emitted by the extraction pipeline
//! - Common error types
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, CleaningConfig, ConfigError, GazetteerConfig, GazetteerEntry, GazetteerPattern,
    GraphFormat, LoggingConfig, NamespaceConfig, OutputConfig, RelationRuleConfig,
    RelationTableConfig,
};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for Castle operations
#[derive(Error, Debug)]
pub enum CastleError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tagger error: {0}")]
    Tagger(String),

    #[error("Invalid pattern: {0}")]
    Pattern(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CastleError>;

// ============================================================================
// Namespaces
// ============================================================================

/// Default application namespace for subjects and objects
pub const DEFAULT_BASE_NS: &str = "http://cs7320.castle/";

/// FOAF vocabulary namespace
pub const FOAF_NS: &str = "http://xmlns.com/foaf/0.1/";

/// Schema.org vocabulary namespace
pub const SCHEMA_NS: &str = "https://schema.org/";

/// A namespace binding (prefix -> IRI)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// Prefix used in CURIEs and Turtle output ("" for the default prefix)
    pub prefix: String,

    /// Namespace IRI, always ending in `/` or `#`
    pub iri: String,
}

impl Namespace {
    /// Create a namespace, appending a `/` separator if the IRI lacks one
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        let mut iri = iri.into();
        if !iri.ends_with('/') && !iri.ends_with('#') {
            iri.push('/');
        }
        Self {
            prefix: prefix.into(),
            iri,
        }
    }

    /// The FOAF vocabulary
    pub fn foaf() -> Self {
        Self::new("foaf", FOAF_NS)
    }

    /// The Schema.org vocabulary
    pub fn schema() -> Self {
        Self::new("schema", SCHEMA_NS)
    }

    /// Qualify a local name against this namespace
    pub fn term(&self, local: impl Into<String>) -> Iri {
        Iri::new(self.iri.clone(), local)
    }
}

/// An IRI split into namespace and raw local name.
///
/// The local name is kept exactly as extracted; it is percent-encoded only
/// when the IRI is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Iri {
    namespace: String,
    local: String,
}

impl Iri {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Raw local name (namespace stripped, not encoded)
    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// Full IRI string with the local name percent-encoded
    pub fn as_string(&self) -> String {
        format!("{}{}", self.namespace, urlencoding::encode(&self.local))
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

// ============================================================================
// Knowledge Models
// ============================================================================

/// A relationship triple (Subject, Predicate, Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject resource
    pub subject: Iri,

    /// Predicate from a controlled vocabulary
    pub predicate: Iri,

    /// Object resource
    pub object: Iri,
}

impl Triple {
    /// Create a new triple
    pub fn new(subject: Iri, predicate: Iri, object: Iri) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}> <{}> <{}>", self.subject, self.predicate, self.object)
    }
}

// ============================================================================
// Document Models
// ============================================================================

/// A raw input document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Where the text was read from, if anywhere
    pub source: Option<PathBuf>,

    /// Full document text
    pub text: String,
}

impl Document {
    /// Create a document from in-memory text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            source: None,
            text: text.into(),
        }
    }

    /// An empty document, as produced for a missing input file
    pub fn empty(source: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
            text: String::new(),
        }
    }

    /// Set the source path
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_appends_separator() {
        let ns = Namespace::new("", "http://cs7320.castle");
        assert_eq!(ns.iri, "http://cs7320.castle/");

        let hash = Namespace::new("ex", "http://example.org/terms#");
        assert_eq!(hash.iri, "http://example.org/terms#");
    }

    #[test]
    fn test_iri_encodes_local_name_only_when_rendered() {
        let iri = Namespace::new("", DEFAULT_BASE_NS).term("John Smith");
        assert_eq!(iri.local_name(), "John Smith");
        assert_eq!(iri.to_string(), "http://cs7320.castle/John%20Smith");
    }

    #[test]
    fn test_vocabulary_terms() {
        assert_eq!(
            Namespace::foaf().term("knows").to_string(),
            "http://xmlns.com/foaf/0.1/knows"
        );
        assert_eq!(
            Namespace::schema().term("worksFor").to_string(),
            "https://schema.org/worksFor"
        );
    }

    #[test]
    fn test_triple_display() {
        let base = Namespace::new("", DEFAULT_BASE_NS);
        let triple = Triple::new(
            base.term("John"),
            Namespace::foaf().term("knows"),
            base.term("Mary"),
        );
        assert_eq!(
            triple.to_string(),
            "<http://cs7320.castle/John> <http://xmlns.com/foaf/0.1/knows> <http://cs7320.castle/Mary>"
        );
    }

    #[test]
    fn test_document_builder() {
        let doc = Document::new("John likes Mary.").with_source("facts.txt");
        assert_eq!(doc.source, Some(PathBuf::from("facts.txt")));
        assert!(!doc.is_empty());
        assert!(Document::empty("missing.txt").is_empty());
    }
}
