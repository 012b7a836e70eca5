#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Temporary directory tree for loader tests
pub struct TestTree {
    pub temp_dir: TempDir,
}

impl TestTree {
    /// Create an empty tree
    pub fn new() -> Result<Self> {
        init_tracing();
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Create a tree from `(relative path, content)` pairs
    pub fn with_files(files: &[(&str, &str)]) -> Result<Self> {
        let tree = Self::new()?;
        for (path, content) in files {
            tree.file(path, content)?;
        }
        Ok(tree)
    }

    /// Root directory of the tree
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file, creating parent directories
    pub fn file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create an (empty) directory
    pub fn dir(&self, relative: &str) -> Result<PathBuf> {
        let path = self.path().join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }
}

/// The controller fixture: two top-level controllers, one in a subdirectory,
/// plus files that do not match `Controller` filters
pub fn controllers_tree() -> Result<TestTree> {
    TestTree::with_files(&[
        ("main-Controller.json", r#"{"index": 1, "show": 2, "add": 3, "edit": 4}"#),
        ("other-Controller.json", r#"{"index": 1, "show": "nothing"}"#),
        ("notthis.json", r#"{"nope": true}"#),
        ("sub-dir/other-Controller.json", r#"{"index": 1, "show": 2}"#),
    ])
}

/// Route logs to the test output when `RUST_LOG` is set
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
