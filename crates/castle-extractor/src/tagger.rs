//! Named-entity tagging
//!
//! - `EntityLabel`: the fixed set of entity categories
//! - `TaggerAdapter`: wraps any `EntityTagger` and reduces its token tags
//!   to an ordered entity list
//! - `GazetteerTagger`: rule-based tagger using a dictionary of known
//!   names, regex patterns and an optional capitalized-name rule

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use castle_core::{CastleError, ConfigError, GazetteerConfig, Result};

use crate::normalize::{is_stopword, tokenize};
use crate::{EntityTagger, TaggedEntity, TaggedSentence, TaggedToken};

// ============================================================================
// Entity Labels
// ============================================================================

/// Entity categories produced by the tagging service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Person,
    Organization,
    Location,
    /// Geo-political entity
    Gpe,
    Facility,
    /// Geo-socio-political group
    Gsp,
}

impl EntityLabel {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Organization => "ORGANIZATION",
            Self::Location => "LOCATION",
            Self::Gpe => "GPE",
            Self::Facility => "FACILITY",
            Self::Gsp => "GSP",
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityLabel {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PERSON" => Ok(Self::Person),
            "ORGANIZATION" => Ok(Self::Organization),
            "LOCATION" => Ok(Self::Location),
            "GPE" => Ok(Self::Gpe),
            "FACILITY" => Ok(Self::Facility),
            "GSP" => Ok(Self::Gsp),
            _ => Err(ConfigError::InvalidValue {
                key: "entity label".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// Tagger Adapter
// ============================================================================

/// Adapter between the pipeline and an `EntityTagger`
pub struct TaggerAdapter {
    tagger: Box<dyn EntityTagger>,
}

impl TaggerAdapter {
    pub fn new(tagger: impl EntityTagger + 'static) -> Self {
        Self {
            tagger: Box::new(tagger),
        }
    }

    /// Tokenize and tag one cleaned sentence.
    ///
    /// Each entity chunk is represented by its first token only.
    pub fn tag_sentence(&self, index: usize, sentence: &str) -> Result<TaggedSentence> {
        let words = tokenize(sentence);
        let tokens = self.tagger.tag(&words)?;

        if tokens.len() != words.len() {
            return Err(CastleError::Tagger(format!(
                "tagger returned {} tokens for {} words",
                tokens.len(),
                words.len()
            )));
        }

        let entities = chunk_entities(&tokens);
        debug!(
            sentence = index,
            tokens = tokens.len(),
            entities = entities.len(),
            "tagged sentence"
        );

        Ok(TaggedSentence {
            index,
            sentence: sentence.to_string(),
            tokens,
            entities,
        })
    }
}

/// Reduce token tags to one entity per chunk, keyed by the chunk's first token
pub fn chunk_entities(tokens: &[TaggedToken]) -> Vec<TaggedEntity> {
    let mut entities = Vec::new();
    let mut current: Option<EntityLabel> = None;

    for token in tokens {
        match token.label {
            Some(label) if token.begins_entity || current != Some(label) => {
                entities.push(TaggedEntity {
                    label,
                    text: token.text.clone(),
                    position: token.position,
                });
                current = Some(label);
            }
            Some(_) => {}
            None => current = None,
        }
    }

    entities
}

// ============================================================================
// Gazetteer Tagger
// ============================================================================

/// Dictionary term split into tokens
#[derive(Debug, Clone)]
struct GazetteerTerm {
    tokens: Vec<String>,
    label: EntityLabel,
}

/// Rule-based tagger using a dictionary of names and token patterns
#[derive(Debug, Clone, Default)]
pub struct GazetteerTagger {
    /// Terms indexed by first token, longest first
    dictionary: HashMap<String, Vec<GazetteerTerm>>,
    /// Whole-token regex rules, tried in order
    patterns: Vec<(Regex, EntityLabel)>,
    /// Tag remaining capitalized non-stopword tokens as PERSON
    capitalized_names: bool,
}

impl GazetteerTagger {
    /// Create an empty tagger
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration
    pub fn from_config(config: &GazetteerConfig) -> Result<Self> {
        let mut tagger = Self::new().with_capitalized_names(config.capitalized_names);

        for entry in &config.entries {
            tagger.add_term(&entry.term, entry.label.parse()?);
        }
        for rule in &config.patterns {
            tagger.add_pattern(&rule.pattern, rule.label.parse()?)?;
        }

        Ok(tagger)
    }

    /// Add a dictionary term (case-sensitive, may span several tokens)
    pub fn add_term(&mut self, term: &str, label: EntityLabel) {
        let tokens: Vec<String> = tokenize(term).into_iter().map(str::to_string).collect();
        let Some(first) = tokens.first().cloned() else {
            return;
        };

        let terms = self.dictionary.entry(first).or_default();
        terms.push(GazetteerTerm { tokens, label });
        terms.sort_by(|a, b| b.tokens.len().cmp(&a.tokens.len()));
    }

    /// Builder form of `add_term`
    pub fn with_term(mut self, term: &str, label: EntityLabel) -> Self {
        self.add_term(term, label);
        self
    }

    /// Add a regex that must match a whole token
    pub fn add_pattern(&mut self, pattern: &str, label: EntityLabel) -> Result<()> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|e| CastleError::Pattern(format!("{pattern}: {e}")))?;
        self.patterns.push((regex, label));
        Ok(())
    }

    /// Enable or disable the capitalized-name rule
    pub fn with_capitalized_names(mut self, enabled: bool) -> Self {
        self.capitalized_names = enabled;
        self
    }

    /// Whether this tagger can tag anything at all
    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty() && self.patterns.is_empty() && !self.capitalized_names
    }

    /// Number of dictionary terms
    pub fn term_count(&self) -> usize {
        self.dictionary.values().map(Vec::len).sum()
    }

    /// Longest dictionary term starting at `start`
    fn match_term(&self, tokens: &[&str], start: usize) -> Option<&GazetteerTerm> {
        self.dictionary.get(tokens[start])?.iter().find(|term| {
            let end = start + term.tokens.len();
            end <= tokens.len()
                && term
                    .tokens
                    .iter()
                    .zip(&tokens[start..end])
                    .all(|(a, b)| a == b)
        })
    }

    /// Capitalized token that is not a stopword once lowercased
    fn is_name_like(token: &str) -> bool {
        token.chars().next().is_some_and(char::is_uppercase)
            && !is_stopword(&token.to_lowercase())
    }

    fn match_pattern(&self, token: &str) -> Option<EntityLabel> {
        self.patterns
            .iter()
            .find(|(regex, _)| regex.is_match(token))
            .map(|(_, label)| *label)
    }
}

impl EntityTagger for GazetteerTagger {
    fn tag(&self, tokens: &[&str]) -> Result<Vec<TaggedToken>> {
        let mut tagged = Vec::with_capacity(tokens.len());
        let mut i = 0;
        // Consecutive capitalized tokens form one name chunk
        let mut in_name = false;

        while i < tokens.len() {
            if let Some(term) = self.match_term(tokens, i) {
                tagged.push(TaggedToken::begin(tokens[i], i, term.label));
                for j in i + 1..i + term.tokens.len() {
                    tagged.push(TaggedToken::inside(tokens[j], j, term.label));
                }
                i += term.tokens.len();
                in_name = false;
                continue;
            }

            if let Some(label) = self.match_pattern(tokens[i]) {
                tagged.push(TaggedToken::begin(tokens[i], i, label));
                in_name = false;
            } else if self.capitalized_names && Self::is_name_like(tokens[i]) {
                let token = if in_name {
                    TaggedToken::inside(tokens[i], i, EntityLabel::Person)
                } else {
                    TaggedToken::begin(tokens[i], i, EntityLabel::Person)
                };
                tagged.push(token);
                in_name = true;
            } else {
                tagged.push(TaggedToken::outside(tokens[i], i));
                in_name = false;
            }
            i += 1;
        }

        Ok(tagged)
    }
}

// ============================================================================
// Tests
// ============================================================================
