#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # dirload - convention-over-configuration registries
//!
//! dirload walks a directory subtree and assembles every matching artifact
//! into one keyed mapping, so a folder of handlers or data files becomes a
//! lookup table without anyone listing the files by hand.
//!
//! ## Features
//!
//! - **Breadth-first traversal**: shallower artifacts are resolved first, so on a key
//!   collision the deeper one wins
//! - **Pattern driven**: a regex filter selects files and its capture groups become keys
//! - **Pluggable**: the key-mapping function, the resolution callback and the artifact
//!   loader are all replaceable
//! - **Data files out of the box**: JSON and TOML load into `serde_json::Value`
//!
//! ## Architecture
//!
//! - [`reducer`]: generic breadth-first fold over a self-extending worklist
//! - [`loader`]: the directory tree loader built on it
//! - [`options`]: loader options and default policies
//! - [`resolve`]: resolution callbacks, including nested assignment
//! - [`artifact`]: the artifact-load capability and the JSON/TOML loader
//! - [`fs`]: the filesystem capability
//! - [`config`]: TOML configuration files
//!
//! ## Example Usage
//!
//! ```no_run
//! use dirload::{LoaderOptions, Memo, load, resolve};
//! use regex::Regex;
//!
//! # fn main() -> anyhow::Result<()> {
//! // Flat keys: `sub/config.json` lands at memo["sub/config"]
//! let flat: Memo = load("config.d")?;
//!
//! // Nested keys: `sub/config.json` lands at memo["sub"]["config"]
//! let options = LoaderOptions::new("config.d")
//!     .filter(Regex::new(r"^(.+)\.json$")?)
//!     .map(resolve::dotted_key)
//!     .resolve(resolve::nested(dirload::DataLoader));
//! let nested = load(options)?;
//! # let _ = (flat, nested);
//! # Ok(())
//! # }
//! ```

/// Artifact-load capability and the JSON/TOML data loader.
pub mod artifact;

/// TOML configuration for loader options.
pub mod config;

/// Error taxonomy shared by every operation.
pub mod error;

/// Filesystem capability (metadata and directory listing).
pub mod fs;

/// Directory tree loader.
pub mod loader;

/// Loader options, capture groups and default policies.
pub mod options;

/// Breadth-first worklist reducer.
pub mod reducer;

/// Resolution callbacks and key helpers.
pub mod resolve;

pub use artifact::{ArtifactLoader, DataLoader};
pub use config::{ExcludeDirs, LoaderConfig};
pub use error::{Error, Result};
pub use fs::{EntryKind, FileSystem, StdFileSystem};
pub use loader::{load, load_into, load_with};
pub use options::{CaptureGroups, LoaderOptions, Memo};
pub use reducer::TreeReducer;

/// Current version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
