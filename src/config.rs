//! Build configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. The command line applies its own flags last.
//!
//! ```toml
//! unigram_threshold = 5
//! bigram_threshold = 3
//! min_word_length = 2
//! include_statistics = true
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::selector::{Thresholds, DEFAULT_BIGRAM_THRESHOLD, DEFAULT_UNIGRAM_THRESHOLD};
use crate::tokenizer::{RegexTokenizer, DEFAULT_MIN_WORD_LENGTH};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "SMSDICT_CONFIG";

/// Environment variable overriding the unigram threshold
pub const UNIGRAM_THRESHOLD_ENV: &str = "UNIGRAM_THRESHOLD";

/// Environment variable overriding the bigram threshold
pub const BIGRAM_THRESHOLD_ENV: &str = "BIGRAM_THRESHOLD";

/// Environment variable overriding the minimum word length
pub const MIN_WORD_LENGTH_ENV: &str = "MIN_WORD_LENGTH";

/// Environment variable toggling the trailing statistics block
pub const INCLUDE_STATISTICS_ENV: &str = "SMSDICT_INCLUDE_STATISTICS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryConfig {
    #[serde(default = "default_unigram_threshold")]
    pub unigram_threshold: u64,
    #[serde(default = "default_bigram_threshold")]
    pub bigram_threshold: u64,
    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,
    #[serde(default = "default_include_statistics")]
    pub include_statistics: bool,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            unigram_threshold: default_unigram_threshold(),
            bigram_threshold: default_bigram_threshold(),
            min_word_length: default_min_word_length(),
            include_statistics: default_include_statistics(),
        }
    }
}

fn default_unigram_threshold() -> u64 {
    DEFAULT_UNIGRAM_THRESHOLD
}

fn default_bigram_threshold() -> u64 {
    DEFAULT_BIGRAM_THRESHOLD
}

fn default_min_word_length() -> usize {
    DEFAULT_MIN_WORD_LENGTH
}

fn default_include_statistics() -> bool {
    true
}

impl DictionaryConfig {
    /// Load the config file (if any), then apply environment overrides.
    ///
    /// An explicit `path` must exist. Otherwise `$SMSDICT_CONFIG` is tried,
    /// then `<config dir>/smsdict/config.toml`; a missing default file just
    /// means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match resolve_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {}: {}", path.display(), e)))?;
        let parsed: Self = toml::from_str(&raw).map_err(|e| {
            Error::Config(format!("failed to parse TOML from {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(parsed)
    }

    /// Parse TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("failed to parse TOML: {}", e)))
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// [`DictionaryConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_var(&lookup, UNIGRAM_THRESHOLD_ENV)? {
            self.unigram_threshold = value;
        }
        if let Some(value) = parse_var(&lookup, BIGRAM_THRESHOLD_ENV)? {
            self.bigram_threshold = value;
        }
        if let Some(value) = parse_var(&lookup, MIN_WORD_LENGTH_ENV)? {
            self.min_word_length = value;
        }
        if let Some(value) = parse_var(&lookup, INCLUDE_STATISTICS_ENV)? {
            self.include_statistics = value;
        }
        Ok(())
    }

    /// The inclusive selection thresholds
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            unigram: self.unigram_threshold,
            bigram: self.bigram_threshold,
        }
    }

    /// A tokenizer honouring the minimum word length
    pub fn tokenizer(&self) -> RegexTokenizer {
        RegexTokenizer::new(self.min_word_length)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("invalid {}={:?}: {}", key, raw, e))),
        _ => Ok(None),
    }
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|base| base.join("smsdict").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DictionaryConfig::default();
        assert_eq!(config.unigram_threshold, 5);
        assert_eq!(config.bigram_threshold, 3);
        assert_eq!(config.min_word_length, 2);
        assert!(config.include_statistics);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DictionaryConfig::from_toml("bigram_threshold = 7").unwrap();
        assert_eq!(config.bigram_threshold, 7);
        assert_eq!(config.unigram_threshold, 5);
    }

    #[test]
    fn test_bad_toml() {
        let err = DictionaryConfig::from_toml("unigram_threshold = \"many\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let mut config = DictionaryConfig::default();
        config
            .apply_overrides(lookup(&[
                ("UNIGRAM_THRESHOLD", "8"),
                ("MIN_WORD_LENGTH", " 3 "),
                ("SMSDICT_INCLUDE_STATISTICS", "false"),
            ]))
            .unwrap();

        assert_eq!(config.thresholds(), Thresholds { unigram: 8, bigram: 3 });
        assert_eq!(config.tokenizer().min_word_length(), 3);
        assert!(!config.include_statistics);
    }

    #[test]
    fn test_invalid_override() {
        let mut config = DictionaryConfig::default();
        let err = config
            .apply_overrides(lookup(&[("BIGRAM_THRESHOLD", "-1")]))
            .unwrap_err();
        assert!(err.to_string().contains("BIGRAM_THRESHOLD"));
    }

    #[test]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "unigram_threshold = 2\ninclude_statistics = false\n").unwrap();

        let config = DictionaryConfig::from_file(&path).unwrap();
        assert_eq!(config.unigram_threshold, 2);
        assert!(!config.include_statistics);

        let missing = DictionaryConfig::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(Error::Config(_))));
    }
}
