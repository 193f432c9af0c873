//! Word tokenization of message bodies.
//!
//! A word is a maximal run of Unicode letters, combining marks, decimal
//! digits, underscores, apostrophes or hyphens bounded by word boundaries. Words are lower-cased
//! and anything shorter than the configured minimum is dropped, so both the
//! unigram and the bigram counts see the same token sequence.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Default minimum token length, in code points
pub const DEFAULT_MIN_WORD_LENGTH: usize = 2;

/// Pattern matching a single word
///
/// Combining marks are in the class since `\b` counts them as word
/// characters.
pub const WORD_PATTERN: &str = r"\b[\p{L}\p{M}\p{Nd}_'-]+\b";

static WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(WORD_PATTERN).expect("word pattern is valid"));

/// Anything that turns text into an ordered sequence of tokens
pub trait WordTokenizer {
    /// Tokenize one message body. Order of appearance is kept and duplicates
    /// are retained.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Tokenize an optional body; an absent body yields no tokens.
    fn tokenize_body(&self, body: Option<&str>) -> Vec<String> {
        body.map(|text| self.tokenize(text)).unwrap_or_default()
    }
}

impl<T: WordTokenizer + ?Sized> WordTokenizer for &T {
    fn tokenize(&self, text: &str) -> Vec<String> {
        (**self).tokenize(text)
    }
}

/// Regex-driven tokenizer with a minimum word length
#[derive(Debug, Clone)]
pub struct RegexTokenizer {
    pattern: Regex,
    min_word_length: usize,
}

impl RegexTokenizer {
    /// Create a tokenizer using the default word pattern
    pub fn new(min_word_length: usize) -> Self {
        RegexTokenizer {
            pattern: WORD_REGEX.clone(),
            min_word_length,
        }
    }

    /// Create a tokenizer with a custom word pattern
    pub fn with_pattern(pattern: &str, min_word_length: usize) -> Result<Self, regex::Error> {
        Ok(RegexTokenizer {
            pattern: Regex::new(pattern)?,
            min_word_length,
        })
    }

    /// The minimum token length, in code points
    pub fn min_word_length(&self) -> usize {
        self.min_word_length
    }

    fn long_enough(&self, word: &str) -> bool {
        word.chars().count() >= self.min_word_length
    }
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        RegexTokenizer::new(DEFAULT_MIN_WORD_LENGTH)
    }
}

impl WordTokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        // Composed form keeps combining accents inside their word
        let normalized: String = text.nfc().collect();

        self.pattern
            .find_iter(&normalized)
            .map(|m| m.as_str())
            .filter(|word| self.long_enough(word))
            .map(str::to_lowercase)
            .filter(|word| self.long_enough(word))
            .collect()
    }
}
