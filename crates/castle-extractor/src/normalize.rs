//! Text normalization
//!
//! Punctuation stripping, case folding, tokenization and English
//! stopword removal for sentences before they are tagged.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use castle_core::CleaningConfig;

/// Anything that is neither a word character nor whitespace
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("static regex"));

/// Standard English stopword list (NLTK corpus, 179 words)
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ENGLISH_STOPWORDS.iter().copied().collect());

/// Whether a token is in the English stopword list (case-sensitive)
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Split text into word and punctuation tokens on Unicode word boundaries
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_word_bounds()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Remove every character that is neither a word character nor whitespace
pub fn strip_punctuation(text: &str) -> String {
    PUNCTUATION.replace_all(text, "").into_owned()
}

/// Clean a sentence according to the given flags.
///
/// Tokens are rejoined with single spaces, so the result never contains
/// leading, trailing or repeated whitespace. `cleaning.enabled` is not
/// consulted here; callers decide whether to clean at all.
pub fn clean_text(text: &str, cleaning: &CleaningConfig) -> String {
    let mut text = if cleaning.remove_punctuation {
        strip_punctuation(text)
    } else {
        text.to_string()
    };

    if cleaning.lowercase {
        text = text.to_lowercase();
    }

    tokenize(&text)
        .into_iter()
        .filter(|t| !(cleaning.remove_stopwords && is_stopword(t)))
        .collect::<Vec<_>>()
        .join(" ")
}
