//! Relation mapping
//!
//! Maps relation keywords found in a phrase to ontology predicates and
//! builds (subject, predicate, object) triples.

use serde::{Deserialize, Serialize};
use tracing::debug;

use castle_core::{ConfigError, Iri, Namespace, RelationTableConfig, Triple};

use crate::Phrase;

// ============================================================================
// Relation Types
// ============================================================================

/// Predicates available to the relation table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    /// foaf:knows
    Knows,
    /// foaf:based_near
    BasedNear,
    /// schema:worksFor
    WorksFor,
}

impl RelationType {
    /// Get the CURIE form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Knows => "foaf:knows",
            Self::BasedNear => "foaf:based_near",
            Self::WorksFor => "schema:worksFor",
        }
    }

    /// Vocabulary namespace of the predicate
    pub fn namespace(&self) -> Namespace {
        match self {
            Self::Knows | Self::BasedNear => Namespace::foaf(),
            Self::WorksFor => Namespace::schema(),
        }
    }

    /// Local name within the vocabulary
    pub fn local_name(&self) -> &'static str {
        match self {
            Self::Knows => "knows",
            Self::BasedNear => "based_near",
            Self::WorksFor => "worksFor",
        }
    }

    /// Full predicate IRI
    pub fn iri(&self) -> Iri {
        self.namespace().term(self.local_name())
    }

    /// Parse a CURIE (`foaf:knows`) or full IRI
    pub fn from_curie(s: &str) -> Option<Self> {
        let s = s.trim();
        [Self::Knows, Self::BasedNear, Self::WorksFor]
            .into_iter()
            .find(|r| s == r.as_str() || s == r.iri().as_string())
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Relation Table
// ============================================================================

/// Keyword -> predicate rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRule {
    /// Literal, case-sensitive substring
    pub keyword: String,
    pub relation: RelationType,
}

/// Ordered keyword table. Rules are tried in insertion order and the
/// first keyword contained in a phrase wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationTable {
    rules: Vec<RelationRule>,
}

/// A phrase split around its relation keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationMatch<'a> {
    pub subject: &'a str,
    pub rule: &'a RelationRule,
    pub object: &'a str,
}

impl RelationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the standard keywords
    pub fn standard() -> Self {
        // The default config only names known predicates.
        Self::from_config(&RelationTableConfig::default()).unwrap_or_default()
    }

    /// Build from configuration, rejecting unknown predicates
    pub fn from_config(config: &RelationTableConfig) -> Result<Self, ConfigError> {
        let mut table = Self::new();
        for rule in &config.rules {
            let relation =
                RelationType::from_curie(&rule.predicate).ok_or_else(|| ConfigError::InvalidValue {
                    key: format!("relations.rules[{}].predicate", rule.keyword),
                    value: rule.predicate.clone(),
                })?;
            table.add(&rule.keyword, relation);
        }
        Ok(table)
    }

    /// Append a rule
    pub fn add(&mut self, keyword: &str, relation: RelationType) {
        self.rules.push(RelationRule {
            keyword: keyword.to_string(),
            relation,
        });
    }

    /// Builder form of `add`
    pub fn with_rule(mut self, keyword: &str, relation: RelationType) -> Self {
        self.add(keyword, relation);
        self
    }

    /// Rules in match order
    pub fn rules(&self) -> &[RelationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule whose keyword occurs in the phrase, with the byte offset
    /// of the keyword's first occurrence
    pub fn find(&self, phrase: &str) -> Option<(&RelationRule, usize)> {
        self.rules
            .iter()
            .find_map(|rule| phrase.find(&rule.keyword).map(|idx| (rule, idx)))
    }

    /// Split a phrase into trimmed subject and object around the matched keyword
    pub fn split<'a>(&'a self, phrase: &'a str) -> Option<RelationMatch<'a>> {
        let (rule, idx) = self.find(phrase)?;
        Some(RelationMatch {
            subject: phrase[..idx].trim(),
            rule,
            object: phrase[idx + rule.keyword.len()..].trim(),
        })
    }
}

// ============================================================================
// Triple Builder
// ============================================================================

/// Builds triples from phrases using a relation table
#[derive(Debug, Clone)]
pub struct TripleBuilder {
    table: RelationTable,
    base: Namespace,
}

impl TripleBuilder {
    pub fn new(table: RelationTable, base: Namespace) -> Self {
        Self { table, base }
    }

    pub fn table(&self) -> &RelationTable {
        &self.table
    }

    pub fn base(&self) -> &Namespace {
        &self.base
    }

    /// At most one triple per phrase
    pub fn build(&self, phrase: &Phrase) -> Option<Triple> {
        let Some(m) = self.table.split(&phrase.full) else {
            debug!(phrase = %phrase.full, "no relation keyword in phrase");
            return None;
        };

        if m.subject.is_empty() || m.object.is_empty() {
            debug!(
                phrase = %phrase.full,
                keyword = %m.rule.keyword,
                "relation keyword leaves an empty subject or object"
            );
            return None;
        }

        Some(Triple::new(
            self.base.term(m.subject),
            m.rule.relation.iri(),
            self.base.term(m.object),
        ))
    }

    /// Build triples for every phrase, in order
    pub fn build_all(&self, phrases: &[Phrase]) -> Vec<Triple> {
        phrases.iter().filter_map(|p| self.build(p)).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use castle_core::{RelationRuleConfig, DEFAULT_BASE_NS};

    fn phrase(full: &str) -> Phrase {
        Phrase {
            full: full.to_string(),
            connector: String::new(),
        }
    }

    fn builder() -> TripleBuilder {
        TripleBuilder::new(RelationTable::standard(), Namespace::new("", DEFAULT_BASE_NS))
    }

    #[test]
    fn test_relation_type_display() {
        assert_eq!(RelationType::Knows.to_string(), "foaf:knows");
        assert_eq!(
            RelationType::WorksFor.iri().as_string(),
            "https://schema.org/worksFor"
        );
    }

    #[test]
    fn test_relation_type_from_curie() {
        assert_eq!(
            RelationType::from_curie("foaf:based_near"),
            Some(RelationType::BasedNear)
        );
        assert_eq!(
            RelationType::from_curie("http://xmlns.com/foaf/0.1/knows"),
            Some(RelationType::Knows)
        );
        assert_eq!(RelationType::from_curie("foaf:hates"), None);
    }

    #[test]
    fn test_standard_table() {
        let table = RelationTable::standard();
        assert_eq!(table.len(), 11);
        assert_eq!(table.rules()[0].keyword, "knows");
        assert_eq!(table.rules()[10].relation, RelationType::WorksFor);
    }

    #[test]
    fn test_no_keyword_no_triple() {
        assert!(builder().build(&phrase("Alice called Bob")).is_none());
    }

    #[test]
    fn test_works_for() {
        let triple = builder().build(&phrase("Alice works for Acme")).unwrap();
        assert_eq!(triple.subject.local_name(), "Alice");
        assert_eq!(triple.predicate, RelationType::WorksFor.iri());
        assert_eq!(triple.object.local_name(), "Acme");
    }

    #[test]
    fn test_keyword_inside_longer_connector() {
        let triple = builder().build(&phrase("Alice also works for Acme")).unwrap();
        assert_eq!(triple.subject.local_name(), "Alice also");
        assert_eq!(triple.predicate, RelationType::WorksFor.iri());
        assert_eq!(triple.object.local_name(), "Acme");
    }

    #[test]
    fn test_lives_in() {
        let triple = builder().build(&phrase("Bob lives in Paris")).unwrap();
        assert_eq!(triple.predicate.as_string(), "http://xmlns.com/foaf/0.1/based_near");
        assert_eq!(triple.object.to_string(), "http://cs7320.castle/Paris");
    }

    #[test]
    fn test_table_order_breaks_ties() {
        // "knows" is listed before "works for" in the standard table.
        let t = builder()
            .build(&phrase("Alice knows who works for Acme"))
            .unwrap();
        assert_eq!(t.predicate, RelationType::Knows.iri());
        assert_eq!(t.object.local_name(), "who works for Acme");

        let reversed = TripleBuilder::new(
            RelationTable::new()
                .with_rule("works for", RelationType::WorksFor)
                .with_rule("knows", RelationType::Knows),
            Namespace::new("", DEFAULT_BASE_NS),
        );
        let t = reversed
            .build(&phrase("Alice knows who works for Acme"))
            .unwrap();
        assert_eq!(t.predicate, RelationType::WorksFor.iri());
        assert_eq!(t.subject.local_name(), "Alice knows who");
    }

    #[test]
    fn test_keyword_match_is_case_sensitive() {
        assert!(builder().build(&phrase("Alice Works For Acme")).is_none());
    }

    #[test]
    fn test_split_round_trip() {
        let table = RelationTable::standard();
        let b = builder();
        for full in [
            "John likes Mary",
            "Alice  hangs out with   Bob",
            "Carol is employed at Initech",
            "Dave has friend Erin",
        ] {
            let m = table.split(full).unwrap();
            let triple = b.build(&phrase(full)).unwrap();
            assert_eq!(triple.subject.local_name(), m.subject);
            assert_eq!(triple.object.local_name(), m.object);
            assert_eq!(
                triple.subject.local_name(),
                full[..full.find(&m.rule.keyword).unwrap()].trim()
            );
        }
    }

    #[test]
    fn test_empty_side_skipped() {
        assert!(builder().build(&phrase("knows Bob")).is_none());
        assert!(builder().build(&phrase("Alice likes")).is_none());
    }

    #[test]
    fn test_from_config_rejects_unknown_predicate() {
        let config = RelationTableConfig {
            rules: vec![RelationRuleConfig::new("hates", "foaf:hates")],
        };
        assert!(matches!(
            RelationTable::from_config(&config),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
