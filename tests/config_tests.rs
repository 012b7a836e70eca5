mod common;

use anyhow::Result;
use common::{TestTree, controllers_tree};
use dirload::{Error, ExcludeDirs, LoaderConfig, LoaderOptions, Memo, load, resolve};
use regex::Regex;
use rstest::rstest;
use serde_json::json;

fn filter_tree() -> Result<TestTree> {
    TestTree::with_files(&[
        (".svn/entries.json", "1"),
        ("root/file.json", "2"),
        ("sub/file.json", "3"),
    ])
}

#[rstest]
#[case::svn_only(r"^\.svn$", &["root/file", "sub/file"])]
#[case::svn_and_sub(r"^(\.svn|sub)", &["root/file"])]
#[case::nothing_matches(r"^never$", &[".svn/entries", "root/file", "sub/file"])]
fn test_exclude_patterns(#[case] pattern: &str, #[case] expected: &[&str]) -> Result<()> {
    let tree = filter_tree()?;

    let memo = load(
        LoaderOptions::new(tree.path())
            .filter(Regex::new(r"(.+)\.json$")?)
            .exclude_dirs(Regex::new(pattern)?),
    )?;

    assert_eq!(memo.keys().collect::<Vec<_>>(), expected);
    Ok(())
}

/// Turn `sub-dir/main-Controller` into a dotted key with `-x` folded to `_x`
fn underscored(separators: String) -> impl Fn(&dirload::CaptureGroups<'_>) -> Result<String> {
    let dash = Regex::new(&format!("-([{separators}])")).expect("valid pattern");
    move |groups| {
        let dotted = resolve::dotted_key(groups)?;
        Ok(dash
            .replace_all(&dotted, |caps: &regex::Captures<'_>| {
                format!("_{}", caps[1].to_lowercase())
            })
            .into_owned())
    }
}

#[rstest]
#[case::upper_only("A-Z", "sub-dir")]
#[case::any_letter("A-Za-z", "sub_dir")]
fn test_camel_case_mapping(#[case] letters: &str, #[case] sub_key: &str) -> Result<()> {
    let tree = controllers_tree()?;

    let memo = load(
        LoaderOptions::new(tree.path())
            .filter(Regex::new(r"(.+Controller)\.json$")?)
            .map(underscored(letters.to_string()))
            .resolve(resolve::nested(dirload::DataLoader)),
    )?;

    let mut expected = Memo::new();
    expected.insert(
        "main_controller".to_string(),
        json!({"index": 1, "show": 2, "add": 3, "edit": 4}),
    );
    expected.insert(
        "other_controller".to_string(),
        json!({"index": 1, "show": "nothing"}),
    );
    expected.insert(
        sub_key.to_string(),
        json!({"other_controller": {"index": 1, "show": 2}}),
    );

    assert_eq!(memo, expected);
    Ok(())
}

#[test]
fn test_load_from_config_file() -> Result<()> {
    let tree = filter_tree()?;
    tree.file("extra/skip.json", "4")?;
    let config_path = tree.file(
        "dirload.toml",
        "dirname = \".\"\nfilter = '^(.+)\\.json$'\nexclude_dirs = '^(\\.svn|extra)$'\n",
    )?;

    let config = LoaderConfig::from_file(&config_path)?;
    assert_eq!(
        config.exclude_dirs,
        ExcludeDirs::Pattern(r"^(\.svn|extra)$".to_string())
    );

    let memo = load(config.into_options()?)?;

    assert_eq!(
        memo.keys().collect::<Vec<_>>(),
        vec!["root/file", "sub/file"]
    );
    Ok(())
}

#[test]
fn test_config_applies_to_custom_options() -> Result<()> {
    let tree = filter_tree()?;
    let config = LoaderConfig::from_toml_str(&format!(
        "dirname = {:?}\nrecursive = false\n",
        tree.path().display().to_string()
    ))?;

    let base = LoaderOptions::<String>::with_resolve("ignored", |memo, path, key| {
        memo.insert(key.to_string(), path.display().to_string());
        Ok(())
    });
    let memo = load(config.apply(base)?)?;

    // Only the root is listed and it holds no files
    assert!(memo.is_empty());
    Ok(())
}

#[test]
fn test_invalid_config_surfaces_before_traversal() {
    let err = LoaderConfig::from_toml_str("dirname = \"x\"\nexclude_dirs = '['\n").unwrap_err();
    assert!(matches!(err, Error::Pattern { .. }));
}
