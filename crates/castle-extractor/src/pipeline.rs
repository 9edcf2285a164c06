//! Extraction pipeline
//!
//! Document -> sentences -> cleaned sentences -> tagged sentences
//! -> qualifying pairs -> phrases -> triples.
//!
//! Each stage only drops data; nothing is retried and a failure in one
//! sentence never aborts the run.

use tracing::{info, info_span, warn};

use castle_core::{AppConfig, CleaningConfig, Document, Result, Triple};

use crate::normalize::clean_text;
use crate::phrase::extract_phrases;
use crate::relation::{RelationTable, TripleBuilder};
use crate::report::PipelineStats;
use crate::segment::UnicodeSentenceSegmenter;
use crate::selector::select_pairs;
use crate::tagger::{GazetteerTagger, TaggerAdapter};
use crate::{EntityTagger, Phrase, Selection, SentenceSegmenter, TaggedSentence};

/// Output of every stage of one run
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub sentences: Vec<String>,
    /// Parallel to `sentences`
    pub cleaned: Vec<String>,
    /// Sentences the tagger handled, in document order
    pub tagged: Vec<TaggedSentence>,
    pub selections: Vec<Selection>,
    pub phrases: Vec<Phrase>,
    pub triples: Vec<Triple>,
    pub stats: PipelineStats,
}

impl Extraction {
    /// Connectors, aligned with `phrases`
    pub fn connectors(&self) -> Vec<&str> {
        self.phrases.iter().map(|p| p.connector.as_str()).collect()
    }
}

/// The fact-extraction pipeline
pub struct Pipeline {
    segmenter: Box<dyn SentenceSegmenter>,
    tagger: TaggerAdapter,
    cleaning: CleaningConfig,
    builder: TripleBuilder,
}

impl Pipeline {
    pub fn new(
        segmenter: impl SentenceSegmenter + 'static,
        tagger: impl EntityTagger + 'static,
        cleaning: CleaningConfig,
        builder: TripleBuilder,
    ) -> Self {
        Self {
            segmenter: Box::new(segmenter),
            tagger: TaggerAdapter::new(tagger),
            cleaning,
            builder,
        }
    }

    /// Pipeline with the Unicode segmenter and the configured gazetteer
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let tagger = GazetteerTagger::from_config(&config.gazetteer)?;
        if tagger.is_empty() {
            warn!("gazetteer is empty, no entities will be tagged");
        }

        let table = RelationTable::from_config(&config.relations)?;
        let builder = TripleBuilder::new(table, config.namespaces.base_namespace());

        Ok(Self::new(
            UnicodeSentenceSegmenter::new(),
            tagger,
            config.cleaning,
            builder,
        ))
    }

    pub fn triple_builder(&self) -> &TripleBuilder {
        &self.builder
    }

    fn clean(&self, sentence: &str) -> String {
        if self.cleaning.enabled {
            clean_text(sentence, &self.cleaning)
        } else {
            sentence.to_string()
        }
    }

    /// Run every stage over the document
    pub fn run(&self, document: &Document) -> Extraction {
        let _span = info_span!("extract", source = ?document.source).entered();
        let mut stats = PipelineStats::default();

        let sentences = self.segmenter.segment(&document.text);
        stats.sentences = sentences.len();

        let cleaned: Vec<String> = sentences.iter().map(|s| self.clean(s)).collect();

        let mut tagged = Vec::with_capacity(cleaned.len());
        for (index, sentence) in cleaned.iter().enumerate() {
            match self.tagger.tag_sentence(index, sentence) {
                Ok(t) => tagged.push(t),
                Err(e) => {
                    warn!(sentence = index, error = %e, "tagging failed, skipping sentence");
                    stats.tagger_failures += 1;
                }
            }
        }
        stats.tagged = tagged.len();

        let selections = select_pairs(&tagged);
        stats.qualifying = selections.len();

        let phrases = extract_phrases(&selections);
        stats.phrases = phrases.len();
        stats.span_not_found = selections.len() - phrases.len();

        let triples = self.builder.build_all(&phrases);
        stats.triples = triples.len();
        stats.no_relation = phrases.len() - triples.len();

        info!(
            sentences = stats.sentences,
            qualifying = stats.qualifying,
            phrases = stats.phrases,
            triples = stats.triples,
            "extraction finished"
        );

        Extraction {
            sentences,
            cleaned,
            tagged,
            selections,
            phrases,
            triples,
            stats,
        }
    }
}
