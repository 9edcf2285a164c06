//! Castle Graph - RDF graph storage and serialization
//!
//! Collects extracted triples in a graph store and writes them out
//! as Turtle or N-Triples.

use std::path::Path;

use castle_core::{CastleError, GraphFormat, Namespace, Result, Triple};

pub mod memory;
pub mod serialize;

pub use memory::RdfGraph;
pub use serialize::{to_ntriples, to_turtle};

/// Trait for triple stores
pub trait TripleStore {
    /// Store a triple; returns false if the statement was already present
    fn insert(&mut self, triple: Triple) -> bool;

    /// Number of distinct statements
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All statements in insertion order
    fn triples(&self) -> Vec<Triple>;

    /// Store many triples, returning how many were new
    fn extend(&mut self, triples: impl IntoIterator<Item = Triple>) -> usize
    where
        Self: Sized,
    {
        triples
            .into_iter()
            .map(|t| self.insert(t))
            .filter(|added| *added)
            .count()
    }
}

/// Prefix bindings for output: the base namespace as the default prefix,
/// plus the FOAF and Schema.org vocabularies
pub fn standard_prefixes(base: &Namespace) -> Vec<Namespace> {
    vec![
        Namespace::new("", base.iri.clone()),
        Namespace::foaf(),
        Namespace::schema(),
    ]
}

/// Serialize a store in the given format
pub fn serialize(store: &dyn TripleStore, format: GraphFormat, prefixes: &[Namespace]) -> String {
    let triples = store.triples();
    match format {
        GraphFormat::Turtle => to_turtle(&triples, prefixes),
        GraphFormat::NTriples => to_ntriples(&triples),
    }
}

/// Serialize a store and write it to a file
pub fn write_graph(
    path: impl AsRef<Path>,
    store: &dyn TripleStore,
    format: GraphFormat,
    prefixes: &[Namespace],
) -> Result<()> {
    let path = path.as_ref();
    let content = serialize(store, format, prefixes);

    std::fs::write(path, content).map_err(|e| CastleError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), %format, triples = store.len(), "graph written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        let base = Namespace::new("", "http://cs7320.castle");
        Triple::new(base.term(s), Namespace::foaf().term(p), base.term(o))
    }

    #[test]
    fn test_extend_counts_new_statements() {
        let mut graph = RdfGraph::new();
        let added = graph.extend(vec![
            triple("John", "knows", "Mary"),
            triple("John", "knows", "Mary"),
            triple("Bob", "based_near", "Paris"),
        ]);
        assert_eq!(added, 2);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_write_graph_formats() {
        let dir = tempfile::tempdir().unwrap();
        let base = Namespace::new("", "http://cs7320.castle");
        let mut graph = RdfGraph::new();
        graph.insert(triple("John", "knows", "Mary"));

        let ttl = dir.path().join("facts.ttl");
        write_graph(&ttl, &graph, GraphFormat::Turtle, &standard_prefixes(&base)).unwrap();
        let content = std::fs::read_to_string(&ttl).unwrap();
        assert!(content.contains("@prefix : <http://cs7320.castle/> ."));
        assert!(content.contains(":John foaf:knows :Mary ."));

        let nt = dir.path().join("facts.nt");
        write_graph(&nt, &graph, GraphFormat::NTriples, &[]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&nt).unwrap(),
            "<http://cs7320.castle/John> <http://xmlns.com/foaf/0.1/knows> <http://cs7320.castle/Mary> .\n"
        );
    }

    #[test]
    fn test_write_graph_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("facts.ttl");
        let result = write_graph(&path, &RdfGraph::new(), GraphFormat::Turtle, &[]);
        assert!(matches!(result, Err(CastleError::Io { .. })));
    }
}
