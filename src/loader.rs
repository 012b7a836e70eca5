//! Directory tree loader.
//!
//! Walks the subtree under `dirname` breadth-first through a
//! [`TreeReducer`] of relative paths. For each entry:
//!
//! - the root is always listed
//! - other directories are listed unless `recursive` is off or the exclude
//!   pattern matches their relative path
//! - files whose relative path matches the filter get a key from `map` and
//!   are handed to `resolve`
//!
//! Child batches go to the back of the queue, so a shallower artifact is
//! always resolved before a deeper one and the deeper one wins on a key
//! collision.

use crate::error::{Error, Result};
use crate::fs::{EntryKind, FileSystem, StdFileSystem};
use crate::options::{CaptureGroups, LoaderOptions, Memo};
use crate::reducer::TreeReducer;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span, trace};

/// Relative path of the root directory
pub const ROOT: &str = ".";

/// Load every matching artifact under a directory into a fresh mapping
///
/// Accepts either full [`LoaderOptions`] or a bare directory path for the
/// defaults. The returned mapping starts from `options.memo`.
///
/// # Errors
///
/// Fails on the first unreadable entry, artifact that cannot be loaded, or
/// failing callback. Use [`load_into`] when the partial result matters.
pub fn load<V, O>(options: O) -> Result<Memo<V>>
where
    O: Into<LoaderOptions<V>>,
{
    let mut options = options.into();
    let mut memo = std::mem::take(&mut options.memo);
    load_with(&StdFileSystem, options, &mut memo)?;
    Ok(memo)
}

/// Load into a caller-owned mapping
///
/// Entries already in `memo` stay unless an artifact maps onto the same key.
/// `options.memo` is merged into `memo` first. On error `memo` keeps every
/// entry written before the failure.
///
/// # Errors
///
/// See [`load`].
pub fn load_into<V, O>(options: O, memo: &mut Memo<V>) -> Result<()>
where
    O: Into<LoaderOptions<V>>,
{
    load_with(&StdFileSystem, options, memo)
}

/// Load through an explicit filesystem capability
///
/// # Errors
///
/// See [`load`].
pub fn load_with<V, O, F>(fs: &F, options: O, memo: &mut Memo<V>) -> Result<()>
where
    O: Into<LoaderOptions<V>>,
    F: FileSystem + ?Sized,
{
    let mut options = options.into();
    memo.append(&mut options.memo);

    let span = span!(Level::DEBUG, "load", root = %options.dirname.display());
    let _guard = span.enter();

    let mut walk = Walk {
        fs,
        options,
        stats: WalkStats::default(),
    };

    let mut reducer = TreeReducer::new(ROOT.to_string());
    let result: Result<&mut Memo<V>> = reducer.reduce(memo, |queue, memo, relative| {
        walk.visit(queue, memo, &relative)?;
        Ok(memo)
    });

    let stats = walk.stats;
    debug!(
        visited = stats.visited,
        resolved = stats.resolved,
        skipped_dirs = stats.skipped_dirs,
        skipped_files = stats.skipped_files,
        ok = result.is_ok(),
        "Load finished"
    );

    result.map(|_| ())
}

/// Counters reported once a load finishes
#[derive(Debug, Default, Clone, Copy)]
struct WalkStats {
    /// Entries dequeued
    visited: usize,
    /// Artifacts handed to `resolve`
    resolved: usize,
    /// Directories not entered
    skipped_dirs: usize,
    /// Files rejected by the filter
    skipped_files: usize,
}

/// State of one traversal
struct Walk<'f, V, F: ?Sized> {
    /// Filesystem capability
    fs: &'f F,
    /// Options for this invocation
    options: LoaderOptions<V>,
    /// Running counters
    stats: WalkStats,
}

impl<V, F: FileSystem + ?Sized> Walk<'_, V, F> {
    /// Process one dequeued relative path
    fn visit(
        &mut self,
        queue: &mut TreeReducer<String>,
        memo: &mut Memo<V>,
        relative: &str,
    ) -> Result<()> {
        self.stats.visited += 1;
        let absolute = absolute_path(&self.options.dirname, relative);

        let kind = self.fs.stat(&absolute).map_err(|source| Error::Lookup {
            path: absolute.clone(),
            source,
        })?;
        trace!(path = relative, ?kind, "Visiting entry");

        match kind {
            EntryKind::Directory => self.visit_dir(queue, relative, &absolute),
            EntryKind::File => self.visit_file(memo, relative, absolute),
        }
    }

    /// Enqueue a directory's children unless it is gated off
    fn visit_dir(
        &mut self,
        queue: &mut TreeReducer<String>,
        relative: &str,
        absolute: &Path,
    ) -> Result<()> {
        if relative != ROOT && !self.should_enter(relative) {
            self.stats.skipped_dirs += 1;
            debug!(path = relative, "Skipping directory");
            return Ok(());
        }

        let names = self.fs.list_dir(absolute).map_err(|source| Error::Lookup {
            path: absolute.to_path_buf(),
            source,
        })?;

        queue.extend(names.iter().map(|name| join_relative(relative, name)));
        Ok(())
    }

    /// Recursion gate and exclude pattern for non-root directories
    fn should_enter(&self, relative: &str) -> bool {
        if !self.options.recursive {
            return false;
        }

        !self
            .options
            .exclude_dirs
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(relative))
    }

    /// Match a file against the filter and resolve it
    fn visit_file(&mut self, memo: &mut Memo<V>, relative: &str, absolute: PathBuf) -> Result<()> {
        let Some(captures) = self.options.filter.captures(relative) else {
            self.stats.skipped_files += 1;
            return Ok(());
        };

        let groups = CaptureGroups::from_captures(&captures);
        let key = (self.options.map)(&groups)
            .map_err(|source| Error::from_callback(absolute.clone(), source))?;

        (self.options.resolve)(memo, absolute.as_path(), &key)
            .map_err(|source| Error::from_callback(absolute, source))?;

        self.stats.resolved += 1;
        debug!(path = relative, key = %key, "Resolved artifact");
        Ok(())
    }
}

/// `root` joined with a relative work item
fn absolute_path(root: &Path, relative: &str) -> PathBuf {
    if relative == ROOT {
        root.to_path_buf()
    } else {
        root.join(relative)
    }
}

/// Child work item of `parent`, always `/`-separated
fn join_relative(parent: &str, name: &str) -> String {
    if parent == ROOT {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}
