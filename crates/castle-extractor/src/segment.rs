//! Sentence segmentation

use unicode_segmentation::UnicodeSegmentation;

use crate::SentenceSegmenter;

/// Segmenter based on Unicode (UAX #29) sentence boundaries.
///
/// Abbreviations and other punctuation ambiguities are resolved by the
/// Unicode rules alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceSegmenter;

impl UnicodeSentenceSegmenter {
    pub fn new() -> Self {
        Self
    }
}

impl SentenceSegmenter for UnicodeSentenceSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_sentence_bounds()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
