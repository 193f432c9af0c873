//! Unigram and bigram frequency counting.
//!
//! Counts are plain values returned by the counting pass. Nothing here is
//! shared or global, so two partial counts can be built separately and then
//! combined with [`NgramCounts::merge`].

use std::collections::HashMap;

use crate::ngram::bigrams;
use crate::tokenizer::WordTokenizer;

/// Occurrence counts keyed by token or bigram text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    /// Create a new empty table
    pub fn new() -> Self {
        FrequencyTable::default()
    }

    /// Record one occurrence of `key`
    pub fn add(&mut self, key: &str) {
        if let Some(count) = self.counts.get_mut(key) {
            *count += 1;
        } else {
            self.counts.insert(key.to_string(), 1);
        }
    }

    /// Record one occurrence of an owned key
    pub fn add_owned(&mut self, key: String) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// Count for `key`, zero when never seen
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if nothing was counted
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(key, count)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(key, count)| (key.as_str(), *count))
    }

    /// Keys whose count is at least `threshold`
    pub fn at_least(&self, threshold: u64) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(move |(_, count)| *count >= threshold)
            .map(|(key, _)| key)
    }

    /// Add every count of `other` into this table
    pub fn merge(&mut self, other: FrequencyTable) {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
    }
}

/// Unigram and bigram tables for a whole corpus
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NgramCounts {
    /// Single-token counts
    pub unigrams: FrequencyTable,
    /// Adjacent-pair counts
    pub bigrams: FrequencyTable,
    /// Number of messages observed
    pub messages: usize,
}

impl NgramCounts {
    /// Create empty counts
    pub fn new() -> Self {
        NgramCounts::default()
    }

    /// Count one message's token sequence.
    ///
    /// Unigrams and bigrams come from the same slice, so whatever the
    /// tokenizer dropped is missing from both.
    pub fn add_message<S: AsRef<str>>(&mut self, tokens: &[S]) {
        self.messages += 1;
        for token in tokens {
            self.unigrams.add(token.as_ref());
        }
        for bigram in bigrams(tokens) {
            self.bigrams.add_owned(bigram);
        }
    }

    /// Fold another partial count into this one
    pub fn merge(&mut self, other: NgramCounts) {
        self.unigrams.merge(other.unigrams);
        self.bigrams.merge(other.bigrams);
        self.messages += other.messages;
    }
}

/// Feeds message bodies through a tokenizer into [`NgramCounts`]
#[derive(Debug, Clone)]
pub struct FrequencyCounter<T> {
    tokenizer: T,
    counts: NgramCounts,
}

impl<T: WordTokenizer> FrequencyCounter<T> {
    /// Create a counter around a tokenizer
    pub fn new(tokenizer: T) -> Self {
        FrequencyCounter {
            tokenizer,
            counts: NgramCounts::new(),
        }
    }

    /// Count one message body. Absent bodies still count as a message.
    pub fn observe(&mut self, body: Option<&str>) {
        let tokens = self.tokenizer.tokenize_body(body);
        self.counts.add_message(&tokens);
    }

    /// Messages observed so far
    pub fn messages(&self) -> usize {
        self.counts.messages
    }

    /// Finish counting and hand back the tables
    pub fn finish(self) -> NgramCounts {
        self.counts
    }
}

/// Count every body of a corpus in one pass
pub fn count_ngrams<T, I, S>(tokenizer: T, bodies: I) -> NgramCounts
where
    T: WordTokenizer,
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let mut counter = FrequencyCounter::new(tokenizer);
    for body in bodies {
        counter.observe(body.as_ref().map(|b| b.as_ref()));
    }
    counter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::RegexTokenizer;

    fn count(bodies: &[&str]) -> NgramCounts {
        count_ngrams(RegexTokenizer::default(), bodies.iter().map(|b| Some(*b)))
    }

    #[test]
    fn test_counts_across_messages() {
        let counts = count(&["see you soon", "see you tomorrow", "soon"]);

        assert_eq!(counts.messages, 3);
        assert_eq!(counts.unigrams.get("see"), 2);
        assert_eq!(counts.unigrams.get("soon"), 2);
        assert_eq!(counts.bigrams.get("see you"), 2);
        assert_eq!(counts.bigrams.get("you tomorrow"), 1);
    }

    #[test]
    fn test_no_cross_message_bigrams() {
        let counts = count(&["hello world", "foo bar"]);

        assert_eq!(counts.bigrams.get("hello world"), 1);
        assert_eq!(counts.bigrams.get("foo bar"), 1);
        assert_eq!(counts.bigrams.get("world foo"), 0);
        assert_eq!(counts.bigrams.len(), 2);
    }

    #[test]
    fn test_short_tokens_skipped_in_bigrams() {
        // "a" is dropped before pairing, so "want pie" becomes adjacent
        let counts = count(&["I want a pie"]);

        assert_eq!(counts.bigrams.get("want pie"), 1);
        assert_eq!(counts.bigrams.get("want a"), 0);
        assert_eq!(counts.unigrams.get("a"), 0);
    }

    #[test]
    fn test_absent_body_counts_as_message() {
        let counts = count_ngrams(RegexTokenizer::default(), vec![None, Some("hey there")]);

        assert_eq!(counts.messages, 2);
        assert_eq!(counts.unigrams.len(), 2);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let whole = count(&["good morning", "good night", "morning run"]);

        let mut left = count(&["good morning"]);
        left.merge(count(&["good night", "morning run"]));

        assert_eq!(left, whole);
    }

    #[test]
    fn test_at_least() {
        let mut table = FrequencyTable::new();
        for _ in 0..3 {
            table.add("three");
        }
        table.add("one");

        let mut selected: Vec<&str> = table.at_least(3).collect();
        selected.sort();
        assert_eq!(selected, vec!["three"]);
        assert_eq!(table.at_least(1).count(), 2);
    }
}
