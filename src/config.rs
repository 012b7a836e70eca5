//! TOML configuration for a load.
//!
//! ```toml
//! dirname = "handlers"
//! filter = '^(.+)\.json$'
//! exclude_dirs = '^\.svn$'   # or true (default pattern) / false (disabled)
//! recursive = true
//! ```
//!
//! Only the declarative fields live here; `map` and `resolve` are code and
//! are set on the resulting [`LoaderOptions`].

use crate::error::{Error, Result};
use crate::options::{DEFAULT_EXCLUDE_DIRS_RE, DEFAULT_FILTER_RE, LoaderOptions};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Declarative part of [`LoaderOptions`], as read from a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Root directory; relative paths are resolved against the config file
    pub dirname: PathBuf,
    /// File filter regex, default filter when absent
    #[serde(default)]
    pub filter: Option<String>,
    /// Directory exclusion: default pattern, disabled, or a custom pattern
    #[serde(default)]
    pub exclude_dirs: ExcludeDirs,
    /// Descend into subdirectories of the root
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

/// `exclude_dirs` setting: a pattern, or a switch for the default one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExcludeDirs {
    /// `true` keeps the default pattern, `false` disables exclusion
    Enabled(bool),
    /// Custom pattern tested against directory paths relative to the root
    Pattern(String),
}

impl Default for ExcludeDirs {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

/// Serde default for `recursive`
const fn default_recursive() -> bool {
    true
}

impl LoaderConfig {
    /// Config for `dirname` with every other field at its default
    #[must_use]
    pub fn new(dirname: impl Into<PathBuf>) -> Self {
        Self {
            dirname: dirname.into(),
            filter: None,
            exclude_dirs: ExcludeDirs::default(),
            recursive: default_recursive(),
        }
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed TOML or invalid values and
    /// [`Error::Pattern`] for patterns that do not compile.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Read a config file; a relative `dirname` is taken relative to the
    /// file's own directory
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read, plus everything
    /// [`Self::from_toml_str`] rejects.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let mut config = Self::from_toml_str(&content)?;

        if config.dirname.is_relative()
            && let Some(parent) = path.parent()
        {
            config.dirname = parent.join(&config.dirname);
        }

        Ok(config)
    }

    /// Serialize back to TOML
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the config cannot be represented.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))
    }

    /// Reject values that would make a load meaningless
    ///
    /// # Errors
    ///
    /// See [`Self::from_toml_str`].
    pub fn validate(&self) -> Result<()> {
        if self.dirname.as_os_str().is_empty() {
            return Err(Error::Config("dirname must not be empty".to_string()));
        }

        if let Some(filter) = &self.filter {
            compile(filter)?;
        }

        if let ExcludeDirs::Pattern(pattern) = &self.exclude_dirs {
            compile(pattern)?;
        }

        Ok(())
    }

    /// Default options for JSON/TOML artifacts with this config applied
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if a pattern does not compile.
    pub fn into_options(self) -> Result<LoaderOptions<Value>> {
        let base = LoaderOptions::new(self.dirname.clone());
        self.apply(base)
    }

    /// Apply the declarative fields on top of existing options
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if a pattern does not compile.
    pub fn apply<V: 'static>(self, options: LoaderOptions<V>) -> Result<LoaderOptions<V>> {
        let mut options = options.recursive(self.recursive);
        options.dirname = self.dirname;

        options.filter = match self.filter {
            Some(pattern) => compile(&pattern)?,
            None => DEFAULT_FILTER_RE.clone(),
        };

        options.exclude_dirs = match self.exclude_dirs {
            ExcludeDirs::Enabled(true) => Some(DEFAULT_EXCLUDE_DIRS_RE.clone()),
            ExcludeDirs::Enabled(false) => None,
            ExcludeDirs::Pattern(pattern) => Some(compile(&pattern)?),
        };

        Ok(options)
    }
}

/// Compile a user-supplied pattern
fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}
