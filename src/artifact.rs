//! Artifact-load capability.
//!
//! A loader turns the absolute path of a matched file into a value. The
//! crate ships [`DataLoader`] for JSON and TOML data files; anything else
//! (templates, compiled handlers, ...) is plugged in by implementing
//! [`ArtifactLoader`] or passing a closure.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{Level, debug, span};

/// Turns a matched file into a value
pub trait ArtifactLoader {
    /// Value produced for each artifact
    type Output;

    /// Load the artifact at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or understood
    fn load(&self, path: &Path) -> Result<Self::Output>;
}

impl<F, V> ArtifactLoader for F
where
    F: Fn(&Path) -> Result<V>,
{
    type Output = V;

    fn load(&self, path: &Path) -> Result<V> {
        self(path)
    }
}

/// Loads structured data files into `serde_json::Value`
///
/// Dispatches on the file extension: `.json` is parsed with `serde_json`,
/// `.toml` with `toml` and converted to the same value model.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataLoader;

impl ArtifactLoader for DataLoader {
    type Output = Value;

    fn load(&self, path: &Path) -> Result<Value> {
        let span = span!(Level::DEBUG, "load_artifact", path = %path.display());
        let _guard = span.enter();

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read artifact: {}", path.display()))?;

        let value = match extension {
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?,
            "toml" => {
                let table: toml::Table = toml::from_str(&content)
                    .with_context(|| format!("Invalid TOML in {}", path.display()))?;
                toml_to_json(toml::Value::Table(table))
                    .with_context(|| format!("Unrepresentable TOML in {}", path.display()))?
            }
            other => anyhow::bail!(
                "Unsupported artifact extension '{}' for {}",
                other,
                path.display()
            ),
        };

        debug!(bytes = content.len(), "Artifact parsed");
        Ok(value)
    }
}

/// Convert a TOML value into the JSON value model
///
/// Datetimes become their RFC 3339 string form.
fn toml_to_json(value: toml::Value) -> Result<Value> {
    Ok(match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .with_context(|| format!("Non-finite float {f}"))?,
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(toml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| Ok((key, toml_to_json(value)?)))
                .collect::<Result<serde_json::Map<_, _>>>()?,
        ),
    })
}
