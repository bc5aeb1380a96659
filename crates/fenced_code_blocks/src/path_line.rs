// crates/fenced_code_blocks/src/path_line.rs

//! The path-line convention.
//!
//! A fenced block takes its file path from the nearest non-blank line before
//! the opening fence. That line may be an ATX heading (`### src/main.rs`),
//! may carry a `FILE <n>:` label (`## FILE 2: Makefile`) and may wrap the
//! path in backticks. Unlabelled text must be a single whitespace-free token
//! with a `/` or a file extension so that ordinary headings such as
//! `### Usage` are not mistaken for paths; after a label inner spaces are
//! allowed. Either way the path has to end in a file name, and URLs are
//! never paths.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path};

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}#{1,6}[ \t]+(.*)$").unwrap());

static FILE_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^FILE\s+\d+:\s*(.*)$").unwrap());

static EXTENSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[A-Za-z0-9_-]+$").unwrap());

/// Returns the normalised relative path named by `line`, or `None` when the
/// line is not a path line.
pub fn path_from_line(line: &str) -> Option<String> {
    let mut text = line.trim();

    if let Some(caps) = HEADING_RE.captures(text) {
        text = caps.get(1).map_or("", |m| m.as_str()).trim();
    }

    let labelled = match FILE_LABEL_RE.captures(text) {
        Some(caps) => {
            text = caps.get(1).map_or("", |m| m.as_str()).trim();
            true
        }
        None => false,
    };

    let token = strip_backticks(text);
    if !is_path_token(token, labelled) {
        return None;
    }

    let normalised = normalise_separators(token);
    if names_a_file(&normalised) {
        Some(normalised)
    } else {
        None
    }
}

/// Checks that `path` stays inside whatever root it is joined to: it must be
/// relative, have at least one normal component and never climb with `..`.
pub fn is_contained_relative_path(path: &str) -> bool {
    let mut has_normal = false;
    for component in Path::new(path).components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    has_normal
}

fn strip_backticks(text: &str) -> &str {
    text.strip_prefix('`')
        .and_then(|inner| inner.strip_suffix('`'))
        .map(str::trim)
        .unwrap_or(text)
}

fn is_path_token(token: &str, labelled: bool) -> bool {
    if token.is_empty() || token.starts_with('*') || token.contains("://") {
        return false;
    }
    if labelled {
        return true;
    }
    !token.chars().any(char::is_whitespace)
        && (token.contains('/') || token.contains('\\') || EXTENSION_RE.is_match(token))
}

/// The last segment must be a file name and the first may not be a scheme
/// or drive (`https:`, `C:`).
fn names_a_file(path: &str) -> bool {
    let first = path.split('/').next().unwrap_or("");
    let last = path.rsplit('/').next().unwrap_or("");
    !first.ends_with(':') && !matches!(last, "" | "." | "..")
}

fn normalise_separators(token: &str) -> String {
    let mut path = token.replace('\\', "/");
    while let Some(rest) = path.strip_prefix("./") {
        path = rest.to_string();
    }
    path
}
