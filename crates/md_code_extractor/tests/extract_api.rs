// crates/md_code_extractor/tests/extract_api.rs

use md_code_extractor::{extract, extract_with_report, ExtractConfig, ExtractError, SkipReason};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Writes `content` to `name` inside `dir` and returns the full path.
fn write_markdown(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Every regular file under `root`, relative and sorted.
fn files_under(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

#[test]
fn test_two_blocks_into_empty_destination() {
    let input = TempDir::new().unwrap();
    let md = write_markdown(
        &input,
        "doc.md",
        "### a.txt\n```\nhello\n```\n\n### dir/b.txt\n```\nworld\n```\n",
    );
    let dest = TempDir::new().unwrap();
    let root = dest.path().join("out");

    let count = extract(&md, &root).unwrap();

    assert_eq!(count, 2);
    assert_eq!(files_under(&root), vec!["a.txt", "dir/b.txt"]);
    assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "hello\n");
    assert_eq!(fs::read_to_string(root.join("dir/b.txt")).unwrap(), "world\n");
}

#[test]
fn test_no_blocks_writes_nothing() {
    let input = TempDir::new().unwrap();
    let md = write_markdown(&input, "plain.md", "# Notes\n\nNothing fenced here.\n");
    let dest = TempDir::new().unwrap();
    let root = dest.path().join("out");

    let count = extract(&md, &root).unwrap();

    assert_eq!(count, 0);
    assert!(!root.exists());
}

#[test]
fn test_missing_input_leaves_destination_untouched() {
    let dest = TempDir::new().unwrap();
    let root = dest.path().join("never_created");

    let err = extract(dest.path().join("missing.md"), &root).unwrap_err();

    assert!(matches!(err, ExtractError::InputNotFound { .. }));
    assert!(err.to_string().contains("missing.md"));
    assert!(!root.exists());
}

#[test]
fn test_content_is_byte_identical() {
    let body = "#!/bin/sh\r\nset -e\r\n\techo \"tabs  and  spaces\"   \r\n\r\n";
    let input = TempDir::new().unwrap();
    let md = write_markdown(
        &input,
        "doc.md",
        &format!("## FILE 1: scripts/run.sh\r\n```sh\r\n{}```\r\n", body),
    );
    let dest = TempDir::new().unwrap();

    extract(&md, dest.path()).unwrap();

    assert_eq!(
        fs::read(dest.path().join("scripts/run.sh")).unwrap(),
        body.as_bytes()
    );
}

#[test]
fn test_rerun_is_idempotent() {
    let input = TempDir::new().unwrap();
    let md = write_markdown(
        &input,
        "doc.md",
        "### src/utils/helper.py\n```\nx = 1\n```\n### src/main.py\n```\nimport utils\n```\n",
    );
    let dest = TempDir::new().unwrap();
    let config = ExtractConfig::new(&md, dest.path());

    let first = extract_with_report(&config).unwrap();
    let snapshot: Vec<(String, Vec<u8>)> = files_under(dest.path())
        .into_iter()
        .map(|rel| {
            let bytes = fs::read(dest.path().join(&rel)).unwrap();
            (rel, bytes)
        })
        .collect();
    let second = extract_with_report(&config).unwrap();
    let again: Vec<(String, Vec<u8>)> = files_under(dest.path())
        .into_iter()
        .map(|rel| {
            let bytes = fs::read(dest.path().join(&rel)).unwrap();
            (rel, bytes)
        })
        .collect();

    assert_eq!(snapshot, again);
    assert_eq!(first.files_written(), second.files_written());
    assert_eq!(
        first.created_dirs,
        vec![dest.path().join("src"), dest.path().join("src/utils")]
    );
    assert!(second.created_dirs.is_empty());
}

#[test]
fn test_skipped_blocks_are_reported_not_written() {
    let input = TempDir::new().unwrap();
    let md = write_markdown(
        &input,
        "doc.md",
        "\
Run this:

```
make all
```

### ../../escape.txt
```
nope
```

### kept.txt
```
kept
```

### dangling.txt
```
never closed
",
    );
    let dest = TempDir::new().unwrap();

    let report = extract_with_report(&ExtractConfig::new(&md, dest.path())).unwrap();

    assert_eq!(report.files_written(), 1);
    assert_eq!(files_under(dest.path()), vec!["kept.txt"]);
    let reasons: Vec<&SkipReason> = report.skipped.iter().map(|s| &s.reason).collect();
    assert_eq!(
        reasons,
        vec![
            &SkipReason::MissingPath,
            &SkipReason::UnsafePath("../../escape.txt".to_string()),
            &SkipReason::Unterminated,
        ]
    );
    assert!(!input.path().join("escape.txt").exists());
}

#[test]
fn test_write_failure_aborts_run() {
    let input = TempDir::new().unwrap();
    let md = write_markdown(
        &input,
        "doc.md",
        "### first.txt\n```\n1\n```\n### blocked/second.txt\n```\n2\n```\n### third.txt\n```\n3\n```\n",
    );
    let dest = TempDir::new().unwrap();
    fs::write(dest.path().join("blocked"), "a file, not a folder").unwrap();

    let err = extract(&md, dest.path()).unwrap_err();

    assert!(matches!(err, ExtractError::Write(_)));
    assert!(dest.path().join("first.txt").exists());
    assert!(!dest.path().join("third.txt").exists());
}

#[test]
fn test_directory_and_url_lines_do_not_abort_run() {
    let input = TempDir::new().unwrap();
    let md = write_markdown(
        &input,
        "doc.md",
        "\
### src/
```
not a file
```

https://example.com/install.sh
```sh
curl | sh
```

## FILE 3: My Docs/notes.txt
```
spaced
```

### kept.txt
```
kept
```
",
    );
    let dest = TempDir::new().unwrap();

    let report = extract_with_report(&ExtractConfig::new(&md, dest.path())).unwrap();

    assert_eq!(report.files_written(), 2);
    assert_eq!(files_under(dest.path()), vec!["My Docs/notes.txt", "kept.txt"]);
    assert_eq!(
        fs::read_to_string(dest.path().join("kept.txt")).unwrap(),
        "kept\n"
    );
    let reasons: Vec<&SkipReason> = report.skipped.iter().map(|s| &s.reason).collect();
    assert_eq!(reasons, vec![&SkipReason::MissingPath, &SkipReason::MissingPath]);
}
