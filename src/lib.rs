//! # smsdict-rs
//!
//! Build a GBoard personal dictionary from an "SMS Backup & Restore" export.
//!
//! Outgoing message bodies are tokenized, unigrams and bigrams are counted,
//! and everything used often enough becomes a dictionary entry.
//!
//! ## Quick Start
//!
//! ```rust
//! use smsdict_rs::{DictionaryBuilder, SmsReader};
//!
//! let xml = r#"<smses>
//!   <sms type="2" body="See you tomorrow" />
//!   <sms type="2" body="See you tomorrow!" />
//!   <sms type="2" body="see you soon" />
//!   <sms type="1" body="see you later" />
//! </smses>"#;
//!
//! let builder: DictionaryBuilder = DictionaryBuilder::default();
//! let output = builder.build(SmsReader::new(xml.as_bytes())).unwrap();
//!
//! // "see you" occurs in three outgoing messages
//! assert!(output.dictionary.to_text().contains("\tsee you\t"));
//! assert_eq!(output.statistics.skipped, 1);
//! ```
//!
//! ## Custom Tokenization
//!
//! Anything implementing [`WordTokenizer`] can replace the regex tokenizer:
//!
//! ```rust
//! use smsdict_rs::{DictionaryBuilder, SmsRecord, Thresholds, WordTokenizer};
//!
//! struct Whitespace;
//!
//! impl WordTokenizer for Whitespace {
//!     fn tokenize(&self, text: &str) -> Vec<String> {
//!         text.split_whitespace().map(str::to_lowercase).collect()
//!     }
//! }
//!
//! let builder = DictionaryBuilder::with_tokenizer(Whitespace, Thresholds { unigram: 1, bigram: 1 }, 1);
//! let output = builder.build(vec![Ok(SmsRecord::outgoing("Hi there"))]).unwrap();
//! assert_eq!(output.dictionary.len(), 3);
//! ```

pub mod config;
pub mod dictionary;
pub mod error;
pub mod filter;
pub mod frequency;
pub mod ngram;
pub mod pipeline;
pub mod selector;
pub mod sms;
pub mod tokenizer;

// Zip packing (only compiled when the "archive" feature is enabled)
#[cfg(feature = "archive")]
pub mod archive;

// Re-export main types for convenience
pub use config::DictionaryConfig;
pub use dictionary::{Dictionary, DictionaryEntry, Footer, Statistics, HEADER};
pub use error::{Error, Result};
pub use filter::{filter_file, filter_stream, FilterMode, FilterSummary};
pub use frequency::{count_ngrams, FrequencyCounter, FrequencyTable, NgramCounts};
pub use ngram::{bigrams, NgramKind};
pub use pipeline::{BuildOutput, BuildReport, DictionaryBuilder};
pub use selector::{Selection, Thresholds};
pub use sms::{MessageType, SmsReader, SmsRecord};
pub use tokenizer::{RegexTokenizer, WordTokenizer};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
