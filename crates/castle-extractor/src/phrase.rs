//! Phrase extraction
//!
//! Finds the shortest span of a sentence running from the first entity's
//! surface text to the second entity's surface text, and the connector
//! between them.

use regex::Regex;
use tracing::debug;

use crate::{EntityPair, Phrase, Selection};

/// Extract the phrase bracketed by an entity pair.
///
/// The search is a single leftmost match with a non-greedy interior, so
/// the span ends at the first occurrence of the second entity after the
/// first. Returns `None` when the two texts do not occur in that order.
pub fn extract_phrase(sentence: &str, pair: &EntityPair) -> Option<Phrase> {
    let (first, second) = (pair.first.text.as_str(), pair.second.text.as_str());
    let pattern = format!("{}(.*?){}", regex::escape(first), regex::escape(second));

    // Both halves are escaped, so this only fails on size limits.
    let regex = Regex::new(&pattern).ok()?;
    let interior = regex.captures(sentence)?.get(1)?.as_str();

    Some(Phrase {
        full: format!("{first}{interior}{second}"),
        connector: interior.trim().to_string(),
    })
}

/// Extract phrases for all selections, skipping those without a span
pub fn extract_phrases(selections: &[Selection]) -> Vec<Phrase> {
    selections
        .iter()
        .filter_map(|s| {
            let phrase = extract_phrase(&s.sentence, &s.pair);
            if phrase.is_none() {
                debug!(
                    sentence = s.sentence_index,
                    first = %s.pair.first.text,
                    second = %s.pair.second.text,
                    "entity span not found in sentence"
                );
            }
            phrase
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityLabel, TaggedEntity};

    fn pair(first: &str, second: &str) -> EntityPair {
        EntityPair {
            first: TaggedEntity {
                label: EntityLabel::Person,
                text: first.to_string(),
                position: 0,
            },
            second: TaggedEntity {
                label: EntityLabel::Person,
                text: second.to_string(),
                position: 1,
            },
        }
    }

    #[test]
    fn test_basic_phrase() {
        let phrase = extract_phrase("Alice called Bob yesterday", &pair("Alice", "Bob")).unwrap();
        assert_eq!(phrase.full, "Alice called Bob");
        assert_eq!(phrase.connector, "called");
    }

    #[test]
    fn test_shortest_match() {
        let sentence = "Alice knows Bob and Alice trusts Carol and Carol likes Dave";
        let phrase = extract_phrase(sentence, &pair("Alice", "Carol")).unwrap();

        assert_eq!(phrase.full, "Alice knows Bob and Alice trusts Carol");
        assert_eq!(phrase.connector, "knows Bob and Alice trusts");
    }

    #[test]
    fn test_span_not_found() {
        // Tagger saw "Bob" but the cleaned sentence spells it differently.
        assert!(extract_phrase("Alice called bob", &pair("Alice", "Bob")).is_none());
        // Second entity only occurs before the first.
        assert!(extract_phrase("Bob called Alice", &pair("Alice", "Bob")).is_none());
    }

    #[test]
    fn test_entity_text_is_escaped() {
        let phrase = extract_phrase("A.J. met C++ fans", &pair("A.J.", "C++")).unwrap();
        assert_eq!(phrase.connector, "met");
        assert!(extract_phrase("AxJx met C++", &pair("A.J.", "C++")).is_none());
    }

    #[test]
    fn test_adjacent_entities_have_empty_connector() {
        let phrase = extract_phrase("Alice Bob", &pair("Alice", "Bob")).unwrap();
        assert_eq!(phrase.full, "Alice Bob");
        assert_eq!(phrase.connector, "");
    }

    #[test]
    fn test_extract_phrases_stays_aligned() {
        let selections = vec![
            Selection {
                sentence_index: 0,
                sentence: "John likes Mary".to_string(),
                pair: pair("John", "Mary"),
            },
            Selection {
                sentence_index: 1,
                sentence: "john likes mary".to_string(),
                pair: pair("John", "Mary"),
            },
            Selection {
                sentence_index: 2,
                sentence: "Alice works for Acme".to_string(),
                pair: pair("Alice", "Acme"),
            },
        ];

        let phrases = extract_phrases(&selections);
        let full: Vec<&str> = phrases.iter().map(|p| p.full.as_str()).collect();
        assert_eq!(full, vec!["John likes Mary", "Alice works for Acme"]);
        assert_eq!(phrases[1].connector, "works for");
    }
}
