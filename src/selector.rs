//! Threshold-based selection of dictionary entries.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dictionary::DictionaryEntry;
use crate::frequency::NgramCounts;
use crate::ngram::NgramKind;

/// Default minimum count for a single word
pub const DEFAULT_UNIGRAM_THRESHOLD: u64 = 5;

/// Default minimum count for a word pair
pub const DEFAULT_BIGRAM_THRESHOLD: u64 = 3;

/// Minimum occurrence counts, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub unigram: u64,
    pub bigram: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            unigram: DEFAULT_UNIGRAM_THRESHOLD,
            bigram: DEFAULT_BIGRAM_THRESHOLD,
        }
    }
}

/// The n-grams that met their threshold.
///
/// Both sets are ordered by code point, so iteration order depends only on
/// their contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    unigrams: BTreeSet<String>,
    bigrams: BTreeSet<String>,
}

impl Selection {
    /// Pick every unigram and bigram whose count reaches its threshold
    pub fn from_counts(counts: &NgramCounts, thresholds: &Thresholds) -> Self {
        Selection {
            unigrams: counts
                .unigrams
                .at_least(thresholds.unigram)
                .map(String::from)
                .collect(),
            bigrams: counts
                .bigrams
                .at_least(thresholds.bigram)
                .map(String::from)
                .collect(),
        }
    }

    /// Number of selected unigrams
    pub fn unigram_count(&self) -> usize {
        self.unigrams.len()
    }

    /// Number of selected bigrams
    pub fn bigram_count(&self) -> usize {
        self.bigrams.len()
    }

    /// Check if nothing was selected
    pub fn is_empty(&self) -> bool {
        self.unigrams.is_empty() && self.bigrams.is_empty()
    }

    /// The deduplicated union of both sets, in ascending code-point order
    pub fn entries(&self) -> Vec<DictionaryEntry> {
        let mut merged: Vec<DictionaryEntry> = self
            .unigrams
            .iter()
            .map(|text| DictionaryEntry {
                text: text.clone(),
                kind: NgramKind::Unigram,
            })
            .chain(self.bigrams.iter().map(|text| DictionaryEntry {
                text: text.clone(),
                kind: NgramKind::Bigram,
            }))
            .collect();
        merged.sort_by(|a, b| a.text.cmp(&b.text));
        merged.dedup_by(|a, b| a.text == b.text);
        merged
    }
}
