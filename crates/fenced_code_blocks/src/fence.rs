// crates/fenced_code_blocks/src/fence.rs

//! Fence delimiter recognition.
//!
//! An opening fence is a line indented by at most three spaces holding a run
//! of three or more backticks (or tildes) followed by an optional info string.
//! The block closes at the first later line made only of the *same* fence
//! character, repeated at least as many times, so a four-backtick block can
//! carry three-backtick lines as ordinary content.

use once_cell::sync::Lazy;
use regex::Regex;

// ---------------------------------------------------------------------------
//  Regexes
// ---------------------------------------------------------------------------

static OPENING_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})(.*)$").unwrap());

static CLOSING_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})[ \t]*$").unwrap());

/// An open fence: which character it uses, how wide the run was and the
/// info string that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    marker: char,
    width: usize,
    info: String,
}

impl Fence {
    /// Returns the fence opened by `line`, if any.
    ///
    /// `line` must already be stripped of its line terminator.
    pub fn parse_opening(line: &str) -> Option<Fence> {
        let caps = OPENING_FENCE_RE.captures(line)?;
        let run = caps.get(1)?.as_str();
        let info = caps.get(2).map_or("", |m| m.as_str()).trim();
        let marker = run.chars().next()?;

        // A backtick in the info string means this is inline code, not a fence.
        if marker == '`' && info.contains('`') {
            return None;
        }

        Some(Fence {
            marker,
            width: run.chars().count(),
            info: info.to_string(),
        })
    }

    /// Checks whether `line` closes this fence.
    pub fn is_closed_by(&self, line: &str) -> bool {
        CLOSING_FENCE_RE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|run| {
                let run = run.as_str();
                run.starts_with(self.marker) && run.chars().count() >= self.width
            })
            .unwrap_or(false)
    }

    /// The trimmed text after the opening run (`rust`, `ts`, ...), possibly empty.
    pub fn info(&self) -> &str {
        &self.info
    }
}
