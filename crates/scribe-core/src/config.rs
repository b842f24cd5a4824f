#![forbid(unsafe_code)]

//! Buffer configuration, loadable from TOML.
//!
//! ```toml
//! # scribe.toml
//! initial_capacity = 10
//!
//! # Omit `max_depth` to keep every snapshot.
//! [history]
//! max_depth = 500
//!
//! [quirks]
//! double_record_paste = false
//! push_on_empty_history = false
//! load_bypasses_history = false
//! ```
//!
//! Every field has a default, so a partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::HistoryConfig;

/// Capacity of a freshly created buffer.
pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

/// Top-level configuration for a [`TextBuffer`](crate::TextBuffer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Slots allocated by an empty buffer. Must be at least 1 to hold the
    /// terminator.
    pub initial_capacity: usize,

    /// History depth limit. Unlimited unless set.
    pub history: HistoryConfig,

    /// Compatibility switches for legacy history behavior.
    pub quirks: Quirks,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            history: HistoryConfig::default(),
            quirks: Quirks::default(),
        }
    }
}

/// Legacy history behaviors, all off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quirks {
    /// Paste records two snapshots (one for the paste, one for the inner
    /// insert), so a single paste needs two undos to revert.
    pub double_record_paste: bool,

    /// Undo/redo push the live state onto the opposite stack before checking
    /// whether the source stack is empty.
    pub push_on_empty_history: bool,

    /// Loading replaces content without recording a snapshot.
    pub load_bypasses_history: bool,
}

impl Quirks {
    /// Every legacy behavior switched on.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            double_record_paste: true,
            push_on_empty_history: true,
            load_bypasses_history: true,
        }
    }
}

impl BufferConfig {
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    #[must_use]
    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.initial_capacity == 0 {
            errors.push("initial_capacity must be > 0".into());
        }

        if self.history.max_depth == Some(0) {
            errors.push("history.max_depth must be > 0".into());
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a buffer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Parsed fine but failed [`BufferConfig::validate`].
    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_validates_clean() {
        let config = BufferConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.initial_capacity, 10);
        assert_eq!(config.history.max_depth, None);
        assert_eq!(config.quirks, Quirks::default());
    }

    #[test]
    fn partial_override_preserves_defaults() {
        let config = BufferConfig::from_toml_str("initial_capacity = 64\n").unwrap();
        assert_eq!(config.initial_capacity, 64);
        assert_eq!(config.history, HistoryConfig::default());
        assert!(!config.quirks.double_record_paste);
    }

    #[test]
    fn nested_tables_parse() {
        let toml = r#"
            [history]
            max_depth = 5

            [quirks]
            double_record_paste = true
            push_on_empty_history = true
        "#;
        let config = BufferConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.history.max_depth, Some(5));
        assert!(config.quirks.double_record_paste);
        assert!(config.quirks.push_on_empty_history);
        assert!(!config.quirks.load_bypasses_history);
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = BufferConfig::from_toml_str("initial_capacity = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BufferConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn validate_collects_every_problem() {
        let config = BufferConfig::default()
            .with_initial_capacity(0)
            .with_history(HistoryConfig::new(0));
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("initial_capacity"));
        assert!(errors[1].contains("max_depth"));
    }

    #[test]
    fn toml_round_trip() {
        let config = BufferConfig::default()
            .with_initial_capacity(32)
            .with_quirks(Quirks::legacy());
        let text = config.to_toml_string().unwrap();
        assert!(!text.contains("max_depth"));
        assert_eq!(BufferConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn invalid_error_joins_messages() {
        let err = ConfigError::Invalid(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid config: a; b");
    }
}
