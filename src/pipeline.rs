//! The dictionary builder: records in, dictionary out.
//!
//! Only outgoing messages are counted. The filter runs here, once, before
//! tokenization, so it does not matter how the backup was pre-filtered.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DictionaryConfig;
use crate::dictionary::{Dictionary, Footer, Statistics};
use crate::error::Result;
use crate::frequency::{FrequencyCounter, NgramCounts};
use crate::selector::{Selection, Thresholds};
use crate::sms::{SmsReader, SmsRecord};
use crate::tokenizer::{RegexTokenizer, WordTokenizer};

/// Everything produced by one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub dictionary: Dictionary,
    pub statistics: Statistics,
}

/// Run report printed by the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub output: String,
    pub statistics: Statistics,
    pub thresholds: Thresholds,
    pub min_word_length: usize,
}

/// Builds a dictionary from SMS records
#[derive(Debug, Clone)]
pub struct DictionaryBuilder<T = RegexTokenizer> {
    tokenizer: T,
    thresholds: Thresholds,
    min_word_length: usize,
    include_statistics: bool,
}

impl DictionaryBuilder<RegexTokenizer> {
    /// Create a builder from configuration
    pub fn new(config: &DictionaryConfig) -> Self {
        DictionaryBuilder {
            tokenizer: config.tokenizer(),
            thresholds: config.thresholds(),
            min_word_length: config.min_word_length,
            include_statistics: config.include_statistics,
        }
    }
}

impl Default for DictionaryBuilder<RegexTokenizer> {
    fn default() -> Self {
        DictionaryBuilder::new(&DictionaryConfig::default())
    }
}

impl<T: WordTokenizer> DictionaryBuilder<T> {
    /// Create a builder around a custom tokenizer.
    ///
    /// `min_word_length` is only echoed in the statistics block; the
    /// tokenizer is responsible for enforcing it.
    pub fn with_tokenizer(tokenizer: T, thresholds: Thresholds, min_word_length: usize) -> Self {
        DictionaryBuilder {
            tokenizer,
            thresholds,
            min_word_length,
            include_statistics: true,
        }
    }

    /// Toggle the trailing statistics block
    pub fn include_statistics(mut self, include: bool) -> Self {
        self.include_statistics = include;
        self
    }

    /// The thresholds in use
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Count the outgoing messages of a record stream.
    ///
    /// Returns the counts and the number of records that were skipped
    /// because they were not outgoing. The first source error aborts.
    pub fn count<I>(&self, records: I) -> Result<(NgramCounts, usize)>
    where
        I: IntoIterator<Item = Result<SmsRecord>>,
    {
        let mut counter = FrequencyCounter::new(&self.tokenizer);
        let mut skipped = 0;

        for record in records {
            let record = record?;
            if !record.is_outgoing() {
                skipped += 1;
                continue;
            }
            counter.observe(record.body.as_deref());
        }

        debug!(messages = counter.messages(), skipped, "counting finished");
        Ok((counter.finish(), skipped))
    }

    /// Turn finished counts into a dictionary
    pub fn select(&self, counts: &NgramCounts, skipped: usize) -> BuildOutput {
        let selection = Selection::from_counts(counts, &self.thresholds);
        let mut dictionary = Dictionary::from_selection(&selection);

        let statistics = Statistics {
            messages: counts.messages,
            skipped,
            frequent_unigrams: selection.unigram_count(),
            frequent_bigrams: selection.bigram_count(),
            entries: dictionary.len(),
        };

        if self.include_statistics {
            dictionary = dictionary.with_footer(Footer {
                statistics,
                thresholds: self.thresholds,
                min_word_length: self.min_word_length,
            });
        }

        BuildOutput {
            dictionary,
            statistics,
        }
    }

    /// Count and select in one go
    pub fn build<I>(&self, records: I) -> Result<BuildOutput>
    where
        I: IntoIterator<Item = Result<SmsRecord>>,
    {
        let (counts, skipped) = self.count(records)?;
        Ok(self.select(&counts, skipped))
    }

    /// Read a backup file, build its dictionary, and write it atomically
    pub fn build_file(&self, input: &Path, output: &Path) -> Result<Statistics> {
        let reader = SmsReader::open(input)?;
        let result = self.build(reader)?;
        result.dictionary.write_to(output)?;

        let stats = result.statistics;
        info!(
            input = %input.display(),
            output = %output.display(),
            messages = stats.messages,
            skipped = stats.skipped,
            unigrams = stats.frequent_unigrams,
            bigrams = stats.frequent_bigrams,
            entries = stats.entries,
            "personal dictionary created"
        );
        Ok(stats)
    }
}
