//! GBoard personal dictionary rendering.
//!
//! The file is a header line followed by one tab-separated line per entry:
//!
//! ```text
//! # Gboard Dictionary version:1
//! \tapple pie\t
//! \tbat\t
//! ```
//!
//! The first field is the shortcut and the last is the locale. Both stay
//! empty. GBoard only accepts single-word shortcuts, and no shortcut rules
//! exist for single words either.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ngram::NgramKind;
use crate::selector::{Selection, Thresholds};

/// First line of every dictionary file
pub const HEADER: &str = "# Gboard Dictionary version:1";

/// A word or phrase kept for the dictionary
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// The word or phrase
    pub text: String,
    /// Whether this is a single word or a pair
    pub kind: NgramKind,
}

impl DictionaryEntry {
    /// Create an entry, classifying it from its text
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = NgramKind::of(&text);
        DictionaryEntry { text, kind }
    }

    /// The shortcut field, always empty
    pub fn shortcut(&self) -> &str {
        ""
    }

    /// Check if this entry is a multi-word phrase
    pub fn is_phrase(&self) -> bool {
        self.kind == NgramKind::Bigram
    }

    /// Render the entry line (without newline)
    pub fn to_line(&self) -> String {
        format!("{}\t{}\t", self.shortcut(), self.text)
    }
}

/// Summary of one build run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Outgoing messages counted
    pub messages: usize,
    /// Records skipped because they were not outgoing
    pub skipped: usize,
    /// Unigrams at or above their threshold
    pub frequent_unigrams: usize,
    /// Bigrams at or above their threshold
    pub frequent_bigrams: usize,
    /// Lines written after the header
    pub entries: usize,
}

/// Settings echoed at the end of the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    pub statistics: Statistics,
    pub thresholds: Thresholds,
    pub min_word_length: usize,
}

/// A rendered-ready dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
    footer: Option<Footer>,
}

impl Dictionary {
    /// Create a dictionary from entries in any order
    pub fn new(entries: impl IntoIterator<Item = DictionaryEntry>) -> Self {
        let mut entries: Vec<DictionaryEntry> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.text.cmp(&b.text));
        entries.dedup_by(|a, b| a.text == b.text);
        Dictionary {
            entries,
            footer: None,
        }
    }

    /// Create a dictionary from a threshold selection
    pub fn from_selection(selection: &Selection) -> Self {
        Dictionary {
            entries: selection.entries(),
            footer: None,
        }
    }

    /// Append a statistics and configuration block after the entries
    pub fn with_footer(mut self, footer: Footer) -> Self {
        self.footer = Some(footer);
        self
    }

    /// Entries in output order
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the dictionary has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the whole file to `out`
    pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", HEADER)?;
        for entry in &self.entries {
            writeln!(out, "{}", entry.to_line())?;
        }

        if let Some(footer) = &self.footer {
            let stats = &footer.statistics;
            writeln!(out)?;
            writeln!(out, "# Statistics:")?;
            writeln!(out, "# Total outgoing SMS processed: {}", stats.messages)?;
            writeln!(out, "# Frequent unigrams count: {}", stats.frequent_unigrams)?;
            writeln!(out, "# Frequent bigrams count: {}", stats.frequent_bigrams)?;
            writeln!(out, "# Total dictionary entries: {}", stats.entries)?;
            writeln!(out)?;
            writeln!(out, "# Configuration:")?;
            writeln!(out, "# Unigram frequency threshold: {}", footer.thresholds.unigram)?;
            writeln!(out, "# Bigram frequency threshold: {}", footer.thresholds.bigram)?;
            writeln!(out, "# Minimum word length: {}", footer.min_word_length)?;
        }

        Ok(())
    }

    /// Render to a string
    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.render(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write the file atomically: a temporary file in the same directory is
    /// filled and then renamed over `path`.
    ///
    /// The parent directory must already exist.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !parent.is_dir() {
            return Err(Error::output_write(path, "parent directory does not exist"));
        }

        let temp = NamedTempFile::new_in(parent).map_err(|e| Error::output_write(path, e))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            self.render(&mut writer)
                .and_then(|_| writer.flush())
                .map_err(|e| Error::output_write(path, e))?;
        }
        temp.persist(path).map_err(|e| Error::output_write(path, e.error))?;

        debug!(path = %path.display(), entries = self.entries.len(), "dictionary written");
        Ok(())
    }
}

/// Read the entry texts back from a dictionary file.
///
/// Comment lines and the trailing statistics block are skipped.
pub fn read_entries(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| Error::source_read(path, e))?;
    Ok(parse_entries(&content))
}

/// Parse entry texts from dictionary file content
pub fn parse_entries(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let _shortcut = fields.next()?;
            let word = fields.next()?;
            if word.is_empty() {
                None
            } else {
                Some(word.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footer(stats: Statistics) -> Footer {
        Footer {
            statistics: stats,
            thresholds: Thresholds::default(),
            min_word_length: 2,
        }
    }

    #[test]
    fn test_entry_line() {
        let entry = DictionaryEntry::new("see you");
        assert!(entry.is_phrase());
        assert_eq!(entry.shortcut(), "");
        assert_eq!(entry.to_line(), "\tsee you\t");
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        let dict = Dictionary::new(
            ["zoo", "apple pie", "bat", "zoo"]
                .into_iter()
                .map(DictionaryEntry::new),
        );
        let texts: Vec<&str> = dict.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["apple pie", "bat", "zoo"]);
    }

    #[test]
    fn test_render_without_footer() {
        let dict = Dictionary::new(vec![DictionaryEntry::new("bat"), DictionaryEntry::new("apple pie")]);
        assert_eq!(dict.to_text(), "# Gboard Dictionary version:1\n\tapple pie\t\n\tbat\t\n");
    }

    #[test]
    fn test_render_empty_with_footer() {
        let dict = Dictionary::default().with_footer(footer(Statistics::default()));
        let text = dict.to_text();

        assert!(text.starts_with("# Gboard Dictionary version:1\n\n# Statistics:\n"));
        assert!(text.contains("# Total outgoing SMS processed: 0\n"));
        assert!(text.contains("# Unigram frequency threshold: 5\n"));
        assert!(text.contains("# Minimum word length: 2\n"));
        assert!(parse_entries(&text).is_empty());
    }

    #[test]
    fn test_footer_is_not_parsed_back() {
        let stats = Statistics {
            messages: 6,
            entries: 1,
            frequent_unigrams: 1,
            ..Default::default()
        };
        let dict = Dictionary::new(vec![DictionaryEntry::new("tomorrow")]).with_footer(footer(stats));
        assert_eq!(parse_entries(&dict.to_text()), vec!["tomorrow"]);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dict.txt");

        let err = Dictionary::default().write_to(&path).unwrap_err();
        assert!(matches!(err, Error::OutputWrite(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_to_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.txt");
        fs::write(&path, "old").unwrap();

        Dictionary::new(vec![DictionaryEntry::new("hello")]).write_to(&path).unwrap();

        assert_eq!(read_entries(&path).unwrap(), vec!["hello"]);
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
