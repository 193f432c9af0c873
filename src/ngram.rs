//! N-gram kinds and bigram generation.
//!
//! A bigram is two adjacent tokens of the same message joined by one space.
//! Bigrams are produced per message, so a pair never spans two messages.

use serde::{Deserialize, Serialize};

/// Separator placed between the two halves of a bigram
pub const BIGRAM_SEPARATOR: char = ' ';

/// The kind of a counted n-gram
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NgramKind {
    /// A single token
    #[default]
    Unigram,
    /// Two adjacent tokens
    Bigram,
}

impl NgramKind {
    /// Convert to a string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NgramKind::Unigram => "UNIGRAM",
            NgramKind::Bigram => "BIGRAM",
        }
    }

    /// Classify rendered n-gram text.
    ///
    /// Tokens never contain whitespace, so any space means a phrase.
    pub fn of(text: &str) -> Self {
        if text.contains(BIGRAM_SEPARATOR) {
            NgramKind::Bigram
        } else {
            NgramKind::Unigram
        }
    }
}

impl std::fmt::Display for NgramKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Iterate the consecutive pairs of one message's tokens.
///
/// Yields exactly `max(tokens.len() - 1, 0)` bigrams, in order.
pub fn bigrams<S: AsRef<str>>(tokens: &[S]) -> impl Iterator<Item = String> + '_ {
    tokens.windows(2).map(|pair| {
        let (first, second) = (pair[0].as_ref(), pair[1].as_ref());
        let mut bigram = String::with_capacity(first.len() + second.len() + 1);
        bigram.push_str(first);
        bigram.push(BIGRAM_SEPARATOR);
        bigram.push_str(second);
        bigram
    })
}
