//! Configuration for the mention engine.
//!
//! Settings are plain data with sensible defaults; they can also be loaded
//! from a TOML file, either an explicit path or the platform config
//! directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default trigger delimiter.
pub const DEFAULT_DELIMITER: char = '@';

/// Default page size: entries rendered for any single query.
pub const DEFAULT_MAX_ITEMS: usize = 10;

/// Default lookup debounce in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Default lookup timeout in milliseconds.
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5000;

/// Default result cache TTL in milliseconds (0 disables the cache).
pub const DEFAULT_CACHE_TTL_MS: u64 = 30_000;

/// Default separator appended after a committed mention (non-breaking space).
pub const DEFAULT_SEPARATOR: &str = "\u{a0}";

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value failed validation.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Mention engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MentionConfig {
    /// Character that opens a mention session.
    pub delimiter: char,

    /// Maximum number of candidates rendered for a query.
    pub max_items: usize,

    /// Delay between a query change and the directory lookup, in
    /// milliseconds. Keystrokes inside this window supersede the pending
    /// lookup.
    pub debounce_ms: u64,

    /// Upper bound on a single directory lookup, in milliseconds. An
    /// overrun surfaces as a failed popup state, retried implicitly by the
    /// next keystroke.
    pub lookup_timeout_ms: u64,

    /// How long lookup results stay reusable for an identical query, in
    /// milliseconds. Zero disables caching.
    pub cache_ttl_ms: u64,

    /// Text appended after the inserted mention payload on commit.
    pub separator: String,
}

impl Default for MentionConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            max_items: DEFAULT_MAX_ITEMS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl MentionConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed, or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from the platform config directory, falling back
    /// to defaults when no file exists.
    ///
    /// # Errors
    /// Returns error only for an existing but unreadable/invalid file.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("atmention")
            .join("config.toml")
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` describing the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delimiter.is_alphanumeric() || self.delimiter.is_whitespace() {
            return Err(ConfigError::Invalid(format!(
                "delimiter {:?} must be a non-alphanumeric, non-whitespace character",
                self.delimiter
            )));
        }
        if self.max_items == 0 {
            return Err(ConfigError::Invalid(
                "max_items must be positive".to_string(),
            ));
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "debounce_ms must be positive".to_string(),
            ));
        }
        if self.lookup_timeout_ms <= self.debounce_ms {
            return Err(ConfigError::Invalid(format!(
                "lookup_timeout_ms ({}) must exceed debounce_ms ({})",
                self.lookup_timeout_ms, self.debounce_ms
            )));
        }
        if self.separator.is_empty() {
            return Err(ConfigError::Invalid(
                "separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the debounce delay as a `Duration`.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Returns the lookup timeout as a `Duration`.
    #[must_use]
    pub const fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Returns the cache TTL as a `Duration`, `None` when caching is off.
    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_ms > 0).then(|| Duration::from_millis(self.cache_ttl_ms))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_values() {
        let config = MentionConfig::default();
        assert_eq!(config.delimiter, '@');
        assert_eq!(config.max_items, 10);
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.separator, "\u{a0}");
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_partial_toml_keeps_defaults() {
        let config: MentionConfig = toml::from_str("max_items = 5\ndelimiter = \"#\"").unwrap();
        assert_eq!(config.max_items, 5);
        assert_eq!(config.delimiter, '#');
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "debounce_ms = 250\nseparator = \" \"").unwrap();

        let config = MentionConfig::load(file.path()).unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.separator, " ");
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_items = \"ten\"").unwrap();

        assert!(matches!(
            MentionConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_rejects_alphanumeric_delimiter() {
        let config = MentionConfig {
            delimiter: 'a',
            ..MentionConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config = MentionConfig {
            max_items: 0,
            ..MentionConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_timeout_below_debounce() {
        let config = MentionConfig {
            debounce_ms: 500,
            lookup_timeout_ms: 400,
            ..MentionConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_cache_ttl_zero_disables_cache() {
        let config = MentionConfig {
            cache_ttl_ms: 0,
            ..MentionConfig::default()
        };
        assert!(config.cache_ttl().is_none());
    }
}
