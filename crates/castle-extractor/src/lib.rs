//! Castle Extractor - Fact extraction pipeline
//!
//! Turns a plain-text document into RDF triples:
//! sentence segmentation, cleaning, named-entity tagging,
//! entity-pair selection, phrase extraction and relation mapping.

use serde::{Deserialize, Serialize};

use castle_core::Result;

pub mod document;
pub mod normalize;
pub mod phrase;
pub mod pipeline;
pub mod relation;
pub mod report;
pub mod segment;
pub mod selector;
pub mod tagger;

pub use pipeline::{Extraction, Pipeline};
pub use relation::{RelationTable, RelationType, TripleBuilder};
pub use report::{PipelineStats, RunReport};
pub use tagger::{EntityLabel, GazetteerTagger, TaggerAdapter};

/// A token as returned by the tagging service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    /// Index of the token within its sentence
    pub position: usize,
    /// Entity label, if the token is part of a named entity
    pub label: Option<EntityLabel>,
    /// True for the first token of an entity chunk
    pub begins_entity: bool,
}

impl TaggedToken {
    /// A token outside any named entity
    pub fn outside(text: impl Into<String>, position: usize) -> Self {
        Self {
            text: text.into(),
            position,
            label: None,
            begins_entity: false,
        }
    }

    /// First token of a named entity
    pub fn begin(text: impl Into<String>, position: usize, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            position,
            label: Some(label),
            begins_entity: true,
        }
    }

    /// Continuation token of a multi-token named entity
    pub fn inside(text: impl Into<String>, position: usize, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            position,
            label: Some(label),
            begins_entity: false,
        }
    }
}

/// A named entity, represented by its first token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedEntity {
    pub label: EntityLabel,
    pub text: String,
    pub position: usize,
}

/// A cleaned sentence with its tagging results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSentence {
    /// Index of the sentence in the document
    pub index: usize,
    pub sentence: String,
    pub tokens: Vec<TaggedToken>,
    /// Entities in order of appearance
    pub entities: Vec<TaggedEntity>,
}

impl TaggedSentence {
    /// Entity labels in order of appearance
    pub fn labels(&self) -> Vec<EntityLabel> {
        self.entities.iter().map(|e| e.label).collect()
    }

    /// Entity surface texts, parallel to `labels()`
    pub fn surface_texts(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.text.as_str()).collect()
    }
}

/// Exactly two entities from one sentence, the first a PERSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPair {
    pub first: TaggedEntity,
    pub second: TaggedEntity,
}

/// A qualifying sentence together with its entity pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub sentence_index: usize,
    pub sentence: String,
    pub pair: EntityPair,
}

/// Text span bracketed by an entity pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    /// First entity text through second entity text, inclusive
    pub full: String,
    /// Text strictly between the two entities, trimmed
    pub connector: String,
}

/// Splits a document into sentences
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Part-of-speech / named-entity tagging service.
///
/// Implementations must return exactly one `TaggedToken` per input token,
/// in input order.
pub trait EntityTagger: Send + Sync {
    fn tag(&self, tokens: &[&str]) -> Result<Vec<TaggedToken>>;
}
