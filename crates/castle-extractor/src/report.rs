//! Run statistics and report files
//!
//! Counters for every filtering outcome of a pipeline run, plus writers
//! for the phrases file, the entity CSV and the JSON run summary.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use castle_core::{CastleError, Result};

use crate::{Phrase, TaggedSentence};

// ============================================================================
// Pipeline Statistics
// ============================================================================

/// Counts of what each stage kept and dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Sentences produced by segmentation
    pub sentences: usize,
    /// Sentences the tagger processed successfully
    pub tagged: usize,
    /// Sentences dropped because the tagger failed
    pub tagger_failures: usize,
    /// Sentences with exactly two entities, the first a PERSON
    pub qualifying: usize,
    /// Qualifying sentences whose entity span could not be located
    pub span_not_found: usize,
    /// Phrases extracted
    pub phrases: usize,
    /// Phrases without any relation keyword (or with an empty side)
    pub no_relation: usize,
    /// Triples emitted
    pub triples: usize,
}

impl PipelineStats {
    /// Tagged sentences that did not qualify for pair extraction
    pub fn not_qualifying(&self) -> usize {
        self.tagged.saturating_sub(self.qualifying)
    }

    /// Fraction of sentences that produced a triple
    pub fn yield_rate(&self) -> f32 {
        if self.sentences == 0 {
            0.0
        } else {
            self.triples as f32 / self.sentences as f32
        }
    }
}

// ============================================================================
// Run Report
// ============================================================================

/// Summary of one extraction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub input: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub stats: PipelineStats,
}

impl RunReport {
    /// Start a report for the given input
    pub fn start(input: Option<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            input,
            started_at: Utc::now(),
            finished_at: None,
            stats: PipelineStats::default(),
        }
    }

    /// Record the final statistics
    pub fn finish(mut self, stats: PipelineStats) -> Self {
        self.stats = stats;
        self.finished_at = Some(Utc::now());
        self
    }

    /// Run duration in milliseconds, if finished
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CastleError::Serialization(e.to_string()))
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| io_error(path, e))
    }
}

// ============================================================================
// Writers
// ============================================================================

fn io_error(path: &Path, source: std::io::Error) -> CastleError {
    CastleError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write full phrases, one per line, in document order
pub fn write_phrases(path: impl AsRef<Path>, phrases: &[Phrase]) -> Result<()> {
    let path = path.as_ref();
    let mut file = std::fs::File::create(path).map_err(|e| io_error(path, e))?;

    for phrase in phrases {
        writeln!(file, "{}", phrase.full).map_err(|e| io_error(path, e))?;
    }

    Ok(())
}

/// Write every tagged entity as a CSV row
pub fn write_entity_report(path: impl AsRef<Path>, tagged: &[TaggedSentence]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| io_error(path, e))?;
    write_entity_csv(file, tagged)
}

/// Write the entity CSV to any writer
pub fn write_entity_csv<W: Write>(writer: W, tagged: &[TaggedSentence]) -> Result<()> {
    let csv_error = |e: csv::Error| CastleError::Serialization(e.to_string());
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["sentence", "position", "label", "entity"])
        .map_err(csv_error)?;

    for sentence in tagged {
        for entity in &sentence.entities {
            wtr.write_record([
                sentence.index.to_string(),
                entity.position.to_string(),
                entity.label.to_string(),
                entity.text.clone(),
            ])
            .map_err(csv_error)?;
        }
    }

    wtr.flush()
        .map_err(|e| CastleError::Serialization(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
