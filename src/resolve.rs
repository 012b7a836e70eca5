//! Resolution callbacks and key helpers.
//!
//! [`assign`] is the default: the loaded value is stored under the derived
//! key verbatim, so `sub/c` stays one flat key. Nested output is opt-in:
//! combine [`dotted_key`] as the mapping function with [`nested`] as the
//! resolution callback and `sub/c` ends up at `memo["sub"]["c"]`.

use crate::artifact::ArtifactLoader;
use crate::error::Error;
use crate::options::{CaptureGroups, Memo};
use anyhow::Result;
use serde_json::{Map, Value};
use std::path::Path;

/// Default resolution: `memo[key] = loader.load(path)`
///
/// Loader failures are returned as [`Error::Load`].
pub fn assign<L>(loader: L) -> impl FnMut(&mut Memo<L::Output>, &Path, &str) -> Result<()>
where
    L: ArtifactLoader,
{
    move |memo: &mut Memo<L::Output>, path: &Path, key: &str| {
        let value = load_artifact(&loader, path)?;
        memo.insert(key.to_string(), value);
        Ok(())
    }
}

/// Nested resolution: loads like [`assign`] but stores at a dotted path
pub fn nested<L>(loader: L) -> impl FnMut(&mut Memo<Value>, &Path, &str) -> Result<()>
where
    L: ArtifactLoader<Output = Value>,
{
    move |memo: &mut Memo<Value>, path: &Path, key: &str| {
        let value = load_artifact(&loader, path)?;
        assign_nested(memo, key, value);
        Ok(())
    }
}

/// Run `loader`, tagging a failure as [`Error::Load`] for `path`
///
/// Custom resolution callbacks should load through this so their load
/// failures are reported the same way the default's are.
///
/// # Errors
///
/// Returns an [`Error::Load`] wrapped in `anyhow` when the loader fails.
pub fn load_artifact<L: ArtifactLoader + ?Sized>(loader: &L, path: &Path) -> Result<L::Output> {
    loader.load(path).map_err(|source| {
        anyhow::Error::new(Error::Load {
            path: path.to_path_buf(),
            source,
        })
    })
}

/// Mapping function turning `sub/dir/name` into `sub.dir.name`
///
/// # Errors
///
/// Never fails; the signature matches the mapping callback.
pub fn dotted_key(captures: &CaptureGroups<'_>) -> Result<String> {
    Ok(captures.first().unwrap_or(captures.full()).replace('/', "."))
}

/// Store `value` at the dotted `key`, creating intermediate objects
///
/// Intermediate entries that are not objects are replaced. Empty segments
/// are skipped, so `a..b` behaves like `a.b`.
pub fn assign_nested(memo: &mut Memo<Value>, key: &str, value: Value) {
    let mut segments = key.split('.').filter(|segment| !segment.is_empty());

    let Some(head) = segments.next() else {
        return;
    };

    let rest: Vec<&str> = segments.collect();
    let Some((last, middle)) = rest.split_last() else {
        memo.insert(head.to_string(), value);
        return;
    };

    let mut current = object_entry(memo.entry(head.to_string()).or_insert(Value::Null));
    for segment in middle {
        current = object_entry(current.entry(*segment).or_insert(Value::Null));
    }

    current.insert((*last).to_string(), value);
}

/// Coerce `slot` into an object and return its map
fn object_entry(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }

    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just made an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assign_nested_creates_intermediates() {
        let mut memo = Memo::new();
        assign_nested(&mut memo, "sub.config", json!({"settingA": "A"}));
        assign_nested(&mut memo, "sub.yes", json!(true));
        assign_nested(&mut memo, "foo", json!("bar"));

        assert_eq!(memo["foo"], json!("bar"));
        assert_eq!(
            memo["sub"],
            json!({"config": {"settingA": "A"}, "yes": true})
        );
    }

    #[test]
    fn test_assign_nested_replaces_scalar_intermediate() {
        let mut memo = Memo::new();
        memo.insert("a".to_string(), json!(1));

        assign_nested(&mut memo, "a.b.c", json!(2));
        assert_eq!(memo["a"], json!({"b": {"c": 2}}));
    }

    #[test]
    fn test_assign_nested_empty_key_is_noop() {
        let mut memo = Memo::new();
        assign_nested(&mut memo, "", json!(1));
        assign_nested(&mut memo, "..", json!(1));
        assert!(memo.is_empty());
    }

    #[test]
    fn test_dotted_key() {
        let groups = CaptureGroups::new("sub-dir/other.json", vec![Some("sub-dir/other")]);
        assert_eq!(dotted_key(&groups).unwrap(), "sub-dir.other");
    }

    #[test]
    fn test_assign_tags_load_failures() {
        let loader = |_: &Path| -> Result<Value> { anyhow::bail!("corrupt") };
        let mut resolve = assign(loader);
        let mut memo = Memo::new();

        let err = resolve(&mut memo, Path::new("/r/a.json"), "a").unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Load { .. })));
        assert!(memo.is_empty());
    }

    #[test]
    fn test_assign_stores_flat_key() {
        let loader = |path: &Path| -> Result<Value> { Ok(json!(path.display().to_string())) };
        let mut resolve = assign(loader);
        let mut memo = Memo::new();

        resolve(&mut memo, Path::new("/r/sub/c.json"), "sub/c").unwrap();

        assert_eq!(memo.get("sub/c"), Some(&json!("/r/sub/c.json")));
        assert!(!memo.contains_key("sub"));
    }
}
