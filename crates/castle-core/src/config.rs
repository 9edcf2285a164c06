//! Castle Configuration Management
//!
//! Handles configuration from a TOML file and environment variables,
//! with defaults for the standard extraction run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{Namespace, DEFAULT_BASE_NS};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Sentence cleaning flags
    pub cleaning: CleaningConfig,

    /// Namespace bindings
    pub namespaces: NamespaceConfig,

    /// Relation keyword table, in match order
    pub relations: RelationTableConfig,

    /// Built-in tagger dictionary and patterns
    pub gazetteer: GazetteerConfig,

    /// Output artifact locations
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(base) = std::env::var("CASTLE_BASE_NAMESPACE") {
            if base.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "CASTLE_BASE_NAMESPACE".to_string(),
                    value: base,
                });
            }
            config.namespaces.base = base;
        }

        if let Ok(format) = std::env::var("CASTLE_GRAPH_FORMAT") {
            config.output.graph_format = format.parse()?;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError { path, message },
            other => other,
        })
    }

    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;
        let defaults = Self::default();

        // Only override if env values differ from defaults
        if env_config.namespaces.base != defaults.namespaces.base {
            self.namespaces.base = env_config.namespaces.base;
        }
        if env_config.output.graph_format != defaults.output.graph_format {
            self.output.graph_format = env_config.output.graph_format;
        }
        if env_config.logging.level != defaults.logging.level {
            self.logging.level = env_config.logging.level;
        }

        Ok(self)
    }

    /// Structural checks that do not need the extractor's vocabularies
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespaces.base.trim().is_empty() {
            return Err(ConfigError::MissingRequired("namespaces.base".to_string()));
        }
        if let Some(rule) = self.relations.rules.iter().find(|r| r.keyword.is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "relations.keyword".to_string(),
                value: format!("empty keyword for predicate {}", rule.predicate),
            });
        }
        Ok(())
    }
}

/// Sentence cleaning flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Clean sentences before tagging at all
    pub enabled: bool,

    /// Remove every character that is neither a word character nor whitespace
    pub remove_punctuation: bool,

    /// Lowercase the whole sentence
    pub lowercase: bool,

    /// Drop English stopwords
    pub remove_stopwords: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remove_punctuation: true,
            lowercase: false,
            remove_stopwords: false,
        }
    }
}

/// Namespace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Base namespace for subjects and objects, bound as the default prefix
    pub base: String,
}

impl NamespaceConfig {
    /// Base namespace as a default-prefix binding
    pub fn base_namespace(&self) -> Namespace {
        Namespace::new("", self.base.trim())
    }
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_NS.to_string(),
        }
    }
}

/// One keyword -> predicate mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRuleConfig {
    /// Literal, case-sensitive substring to look for
    pub keyword: String,

    /// Predicate as a CURIE, e.g. `foaf:knows`
    pub predicate: String,
}

impl RelationRuleConfig {
    pub fn new(keyword: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            predicate: predicate.into(),
        }
    }
}

/// Relation keyword table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationTableConfig {
    /// Rules in match order; the first keyword found in a phrase wins
    pub rules: Vec<RelationRuleConfig>,
}

impl Default for RelationTableConfig {
    fn default() -> Self {
        let knows = [
            "knows",
            "loves",
            "talks to",
            "hangs out with",
            "has friend",
            "works with",
            "likes",
        ];
        let works_for = ["works for", "works at", "is employed at"];

        let mut rules: Vec<RelationRuleConfig> = knows
            .iter()
            .map(|k| RelationRuleConfig::new(*k, "foaf:knows"))
            .collect();
        rules.push(RelationRuleConfig::new("lives in", "foaf:based_near"));
        rules.extend(
            works_for
                .iter()
                .map(|k| RelationRuleConfig::new(*k, "schema:worksFor")),
        );

        Self { rules }
    }
}

/// Dictionary term for the built-in tagger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    /// Surface form, one or more whitespace-separated tokens
    pub term: String,

    /// Entity label name (PERSON, ORGANIZATION, LOCATION, GPE, ...)
    pub label: String,
}

/// Regex rule for the built-in tagger, matched against single tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazetteerPattern {
    pub pattern: String,
    pub label: String,
}

/// Built-in tagger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GazetteerConfig {
    pub entries: Vec<GazetteerEntry>,
    pub patterns: Vec<GazetteerPattern>,

    /// Tag capitalized tokens that match nothing else as PERSON,
    /// skipping stopwords such as a sentence-initial "The"
    pub capitalized_names: bool,
}

impl Default for GazetteerConfig {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            patterns: Vec::new(),
            capitalized_names: true,
        }
    }
}

/// Serialization format for the RDF graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    #[default]
    Turtle,
    NTriples,
}

impl GraphFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::NTriples => "nt",
        }
    }
}

impl std::str::FromStr for GraphFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "turtle" | "ttl" => Ok(Self::Turtle),
            "ntriples" | "n-triples" | "nt" => Ok(Self::NTriples),
            _ => Err(ConfigError::InvalidValue {
                key: "graph_format".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Turtle => write!(f, "turtle"),
            Self::NTriples => write!(f, "ntriples"),
        }
    }
}

/// Output artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Extracted phrases, one per line
    pub phrases_path: PathBuf,

    /// Serialized RDF graph
    pub graph_path: PathBuf,

    /// RDF serialization format
    pub graph_format: GraphFormat,

    /// Optional CSV dump of every tagged entity
    pub entity_report_path: Option<PathBuf>,

    /// Optional JSON run summary
    pub run_report_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            phrases_path: PathBuf::from("phrases.txt"),
            graph_path: PathBuf::from("facts.ttl"),
            graph_format: GraphFormat::Turtle,
            entity_report_path: None,
            run_report_path: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.cleaning.enabled);
        assert!(config.cleaning.remove_punctuation);
        assert!(!config.cleaning.lowercase);
        assert_eq!(config.namespaces.base, "http://cs7320.castle/");
        assert_eq!(config.output.graph_format, GraphFormat::Turtle);
        assert!(config.gazetteer.capitalized_names);
    }

    #[test]
    fn test_default_relation_order() {
        let config = AppConfig::default();
        let keywords: Vec<&str> = config
            .relations
            .rules
            .iter()
            .map(|r| r.keyword.as_str())
            .collect();

        assert_eq!(
            keywords,
            vec![
                "knows",
                "loves",
                "talks to",
                "hangs out with",
                "has friend",
                "works with",
                "likes",
                "lives in",
                "works for",
                "works at",
                "is employed at",
            ]
        );
        assert_eq!(config.relations.rules[7].predicate, "foaf:based_near");
        assert_eq!(config.relations.rules[8].predicate, "schema:worksFor");
    }

    #[test]
    fn test_graph_format_parse() {
        assert_eq!("turtle".parse::<GraphFormat>().unwrap(), GraphFormat::Turtle);
        assert_eq!("NT".parse::<GraphFormat>().unwrap(), GraphFormat::NTriples);
        assert!("rdfxml".parse::<GraphFormat>().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [cleaning]
            lowercase = true

            [namespaces]
            base = "http://example.org/people"

            [[gazetteer.entries]]
            term = "John"
            label = "PERSON"
            "#,
        )
        .unwrap();

        assert!(config.cleaning.lowercase);
        assert!(config.cleaning.remove_punctuation);
        assert_eq!(
            config.namespaces.base_namespace().iri,
            "http://example.org/people/"
        );
        assert_eq!(config.gazetteer.entries.len(), 1);
        assert!(config.gazetteer.capitalized_names);
        assert_eq!(config.relations.rules.len(), 11);
    }

    #[test]
    fn test_custom_relation_table_replaces_default() {
        let config = AppConfig::from_toml_str(
            r#"
            [[relations.rules]]
            keyword = "admires"
            predicate = "foaf:knows"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.relations.rules,
            vec![RelationRuleConfig::new("admires", "foaf:knows")]
        );
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let err = AppConfig::from_toml_str(
            r#"
            [[relations.rules]]
            keyword = ""
            predicate = "foaf:knows"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("castle.toml");
        std::fs::write(&path, "[cleaning\nbroken").unwrap();

        match AppConfig::from_file(&path) {
            Err(ConfigError::ParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {other:?}"),
        }

        let missing = AppConfig::from_file(dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::FileReadError { .. })));
    }

    #[test]
    fn test_example_config_parses() {
        let config = AppConfig::from_toml_str(include_str!("../../../castle.example.toml")).unwrap();

        assert_eq!(config.relations.rules.len(), 4);
        assert_eq!(config.relations.rules[2].predicate, "foaf:based_near");
        assert_eq!(config.gazetteer.entries.len(), 3);
        assert_eq!(config.output.graph_format, GraphFormat::Turtle);
        assert_eq!(
            config.output.entity_report_path,
            Some(PathBuf::from("entity_data.csv"))
        );
    }
}
