//! In-memory RDF graph backed by petgraph

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use castle_core::{Iri, Triple};

use crate::TripleStore;

/// Directed graph with IRI nodes and predicate edges.
///
/// Nodes are shared between statements; identical statements are stored once.
#[derive(Debug, Clone, Default)]
pub struct RdfGraph {
    graph: DiGraph<Iri, Iri>,
    nodes: HashMap<Iri, NodeIndex>,
}

impl RdfGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, iri: &Iri) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(iri) {
            return idx;
        }
        let idx = self.graph.add_node(iri.clone());
        self.nodes.insert(iri.clone(), idx);
        idx
    }

    /// Number of distinct resources
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        let (Some(&s), Some(&o)) = (self.nodes.get(&triple.subject), self.nodes.get(&triple.object))
        else {
            return false;
        };
        self.graph
            .edges_connecting(s, o)
            .any(|e| e.weight() == &triple.predicate)
    }

    /// Objects linked from `subject` by `predicate`, in insertion order
    pub fn objects(&self, subject: &Iri, predicate: &Iri) -> Vec<&Iri> {
        let Some(&s) = self.nodes.get(subject) else {
            return Vec::new();
        };

        let mut edges: Vec<_> = self
            .graph
            .edges(s)
            .filter(|e| e.weight() == predicate)
            .collect();
        edges.sort_by_key(|e| e.id());

        edges.into_iter().map(|e| &self.graph[e.target()]).collect()
    }
}

impl TripleStore for RdfGraph {
    fn insert(&mut self, triple: Triple) -> bool {
        if self.contains(&triple) {
            return false;
        }
        let s = self.node(&triple.subject);
        let o = self.node(&triple.object);
        self.graph.add_edge(s, o, triple.predicate);
        true
    }

    fn len(&self) -> usize {
        self.graph.edge_count()
    }

    fn triples(&self) -> Vec<Triple> {
        self.graph
            .edge_references()
            .map(|e| {
                Triple::new(
                    self.graph[e.source()].clone(),
                    e.weight().clone(),
                    self.graph[e.target()].clone(),
                )
            })
            .collect()
    }
}
