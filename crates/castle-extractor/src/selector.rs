//! Entity-pair selection
//!
//! A sentence qualifies only when it has exactly two named entities and
//! the first is a PERSON. Every other shape is dropped.

use tracing::debug;

use crate::{EntityLabel, EntityPair, Selection, TaggedSentence};

/// Number of entities a qualifying sentence must have
pub const PAIR_SIZE: usize = 2;

/// Whether a label sequence qualifies for pair extraction
pub fn qualifies(labels: &[EntityLabel]) -> bool {
    labels.len() == PAIR_SIZE && labels[0] == EntityLabel::Person
}

/// The entity pair of a qualifying sentence
pub fn select_pair(tagged: &TaggedSentence) -> Option<EntityPair> {
    if !qualifies(&tagged.labels()) {
        return None;
    }

    Some(EntityPair {
        first: tagged.entities[0].clone(),
        second: tagged.entities[1].clone(),
    })
}

/// Keep qualifying sentences, preserving document order
pub fn select_pairs<'a>(tagged: impl IntoIterator<Item = &'a TaggedSentence>) -> Vec<Selection> {
    tagged
        .into_iter()
        .filter_map(|t| match select_pair(t) {
            Some(pair) => Some(Selection {
                sentence_index: t.index,
                sentence: t.sentence.clone(),
                pair,
            }),
            None => {
                debug!(sentence = t.index, labels = ?t.labels(), "sentence does not qualify");
                None
            }
        })
        .collect()
}
