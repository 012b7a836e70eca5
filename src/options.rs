//! Loader options and their defaults.
//!
//! Defaults are plain values substituted when the caller does not set a
//! field; nothing here is process-wide mutable state.

use crate::artifact::{ArtifactLoader, DataLoader};
use crate::resolve;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Result mapping every resolution call writes into
pub type Memo<V = Value> = BTreeMap<String, V>;

/// Key-mapping callback: capture groups in, derived key out
pub type MapFn = Box<dyn Fn(&CaptureGroups<'_>) -> Result<String>>;

/// Resolution callback: `(memo, absolute path, derived key)`
pub type ResolveFn<V> = Box<dyn FnMut(&mut Memo<V>, &Path, &str) -> Result<()>>;

/// Default filter source: non-hidden `.json`/`.toml` paths, capturing the
/// path without extension and then the extension
///
/// Every path segment is checked, so `sub/.hidden.json` is rejected too.
pub const DEFAULT_FILTER: &str = r"^((?:[^./][^/]*/)*[^./][^/]*)\.(json|toml)$";

/// Default exclude source: directories whose own name starts with a dot
///
/// Tested at any depth, so `sub/.git` is skipped as well as `.git`.
pub const DEFAULT_EXCLUDE_DIRS: &str = r"(?:^|/)\.[^/]*$";

/// Compiled default filter
#[allow(clippy::expect_used)]
pub static DEFAULT_FILTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_FILTER).expect("Invalid default filter regex"));

/// Compiled default exclude pattern
#[allow(clippy::expect_used)]
pub static DEFAULT_EXCLUDE_DIRS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_EXCLUDE_DIRS).expect("Invalid default exclude regex"));

/// Capture groups of a filter match, full match excluded
///
/// Groups that did not participate in the match are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureGroups<'a> {
    /// Whole matched text
    full: &'a str,
    /// Groups 1..n in order
    groups: Vec<Option<&'a str>>,
}

impl<'a> CaptureGroups<'a> {
    /// Collect the groups of a regex match
    #[must_use]
    pub fn from_captures(captures: &regex::Captures<'a>) -> Self {
        let full = captures.get(0).map_or("", |m| m.as_str());
        let groups = captures
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str()))
            .collect();

        Self { full, groups }
    }

    /// Build groups by hand, mostly for custom mapping functions and tests
    #[must_use]
    pub fn new(full: &'a str, groups: Vec<Option<&'a str>>) -> Self {
        Self { full, groups }
    }

    /// Whole matched text
    #[must_use]
    pub const fn full(&self) -> &'a str {
        self.full
    }

    /// First group, if it participated
    #[must_use]
    pub fn first(&self) -> Option<&'a str> {
        self.get(0)
    }

    /// Group at `index` (0-based, full match not counted)
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.groups.get(index).copied().flatten()
    }

    /// Number of groups the filter declares
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when the filter has no capture groups
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Participating groups, in order
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.groups.iter().filter_map(|group| *group)
    }
}

/// Default key mapping: the first capture group
///
/// Further groups are ignored. Without a participating first group the whole
/// match is used.
///
/// # Errors
///
/// Never fails; the signature matches [`MapFn`].
pub fn first_capture(captures: &CaptureGroups<'_>) -> Result<String> {
    Ok(captures.first().unwrap_or(captures.full()).to_string())
}

/// Everything one `load` call needs
pub struct LoaderOptions<V = Value> {
    /// Root directory of the traversal
    pub dirname: PathBuf,
    /// Seed for the result mapping
    pub memo: Memo<V>,
    /// Pattern a file's relative path must match to be resolved
    pub filter: Regex,
    /// Pattern of directories to skip; `None` disables exclusion
    pub exclude_dirs: Option<Regex>,
    /// Whether directories below the root are entered
    pub recursive: bool,
    /// Derives a key from the filter's capture groups
    pub map: MapFn,
    /// Stores a matched artifact into the memo
    pub resolve: ResolveFn<V>,
}

impl LoaderOptions<Value> {
    /// Default options for JSON/TOML data files under `dirname`
    #[must_use]
    pub fn new(dirname: impl Into<PathBuf>) -> Self {
        Self::with_loader(dirname, DataLoader)
    }
}

impl<V: 'static> LoaderOptions<V> {
    /// Default options whose resolution step uses `loader`
    #[must_use]
    pub fn with_loader<L>(dirname: impl Into<PathBuf>, loader: L) -> Self
    where
        L: ArtifactLoader<Output = V> + 'static,
    {
        Self::with_resolve(dirname, resolve::assign(loader))
    }

    /// Default options with a custom resolution callback and no loader
    ///
    /// For callbacks that load artifacts themselves, possibly into a value
    /// type no [`ArtifactLoader`] produces directly.
    #[must_use]
    pub fn with_resolve<F>(dirname: impl Into<PathBuf>, resolve: F) -> Self
    where
        F: FnMut(&mut Memo<V>, &Path, &str) -> Result<()> + 'static,
    {
        Self {
            dirname: dirname.into(),
            memo: Memo::new(),
            filter: DEFAULT_FILTER_RE.clone(),
            exclude_dirs: Some(DEFAULT_EXCLUDE_DIRS_RE.clone()),
            recursive: true,
            map: Box::new(first_capture),
            resolve: Box::new(resolve),
        }
    }

    /// Pre-seed the result mapping
    #[must_use]
    pub fn memo(mut self, memo: Memo<V>) -> Self {
        self.memo = memo;
        self
    }

    /// Replace the file filter
    #[must_use]
    pub fn filter(mut self, filter: Regex) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the directory exclude pattern
    #[must_use]
    pub fn exclude_dirs(mut self, pattern: Regex) -> Self {
        self.exclude_dirs = Some(pattern);
        self
    }

    /// Traverse every directory, hidden ones included
    #[must_use]
    pub fn no_exclude_dirs(mut self) -> Self {
        self.exclude_dirs = None;
        self
    }

    /// Toggle descent below the root
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Replace the key-mapping function
    #[must_use]
    pub fn map<F>(mut self, map: F) -> Self
    where
        F: Fn(&CaptureGroups<'_>) -> Result<String> + 'static,
    {
        self.map = Box::new(map);
        self
    }

    /// Replace the resolution callback
    #[must_use]
    pub fn resolve<F>(mut self, resolve: F) -> Self
    where
        F: FnMut(&mut Memo<V>, &Path, &str) -> Result<()> + 'static,
    {
        self.resolve = Box::new(resolve);
        self
    }
}

impl<V> fmt::Debug for LoaderOptions<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderOptions")
            .field("dirname", &self.dirname)
            .field("memo_len", &self.memo.len())
            .field("filter", &self.filter.as_str())
            .field("exclude_dirs", &self.exclude_dirs.as_ref().map(Regex::as_str))
            .field("recursive", &self.recursive)
            .finish_non_exhaustive()
    }
}

impl From<&str> for LoaderOptions<Value> {
    fn from(dirname: &str) -> Self {
        Self::new(dirname)
    }
}

impl From<String> for LoaderOptions<Value> {
    fn from(dirname: String) -> Self {
        Self::new(dirname)
    }
}

impl From<&Path> for LoaderOptions<Value> {
    fn from(dirname: &Path) -> Self {
        Self::new(dirname)
    }
}

impl From<PathBuf> for LoaderOptions<Value> {
    fn from(dirname: PathBuf) -> Self {
        Self::new(dirname)
    }
}
