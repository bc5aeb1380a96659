// crates/fenced_code_blocks/src/lib.rs

//! `fenced_code_blocks` — finds the path-annotated fenced code blocks in a
//! Markdown document.
//!
//!  * **Pure** – takes the document text, returns [`ParsedDocument`]. No
//!    filesystem access, so the rules can be tested on string literals.
//!  * **One pass** – the document is scanned line by line, top to bottom.
//!  * **One convention** – a block's path comes from the nearest non-blank
//!    line before its opening fence (see [`path_from_line`]).

use std::fmt;

mod fence;
mod path_line;

pub use fence::Fence;
pub use path_line::{is_contained_relative_path, path_from_line};

/// A fenced block that resolved to a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Path relative to the destination root, `/`-separated.
    pub relative_path: String,
    /// Text between the fences, byte for byte, line endings included.
    pub content: String,
    /// Info string of the opening fence (`rust`, `ts`, ...), possibly empty.
    pub info: String,
    /// 1-based line number of the opening fence.
    pub line: usize,
}

/// Why a fenced block was not turned into a [`CodeBlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No path line precedes the opening fence.
    MissingPath,
    /// The path line names an absolute path or climbs out with `..`.
    UnsafePath(String),
    /// The document ends before the closing fence.
    Unterminated,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingPath => write!(f, "no file path before the opening fence"),
            SkipReason::UnsafePath(path) => {
                write!(f, "path `{}` points outside the destination root", path)
            }
            SkipReason::Unterminated => write!(f, "no closing fence before end of document"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    /// 1-based line number of the opening fence.
    pub line: usize,
    pub reason: SkipReason,
}

/// Everything found in one document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub blocks: Vec<CodeBlock>,
    pub skipped: Vec<SkippedBlock>,
}

// === Private Implementation === //

struct OpenBlock {
    fence: Fence,
    line: usize,
    path: Result<String, SkipReason>,
    content: String,
}

/// Scans `document` for fenced code blocks and pairs each with its path line.
///
/// Blocks whose path cannot be resolved, and a trailing block that is never
/// closed, end up in [`ParsedDocument::skipped`] instead of failing the parse.
pub fn parse_document(document: &str) -> ParsedDocument {
    let document = document.strip_prefix('\u{feff}').unwrap_or(document);
    let mut parsed = ParsedDocument::default();
    let mut last_text_line: Option<&str> = None;
    let mut open: Option<OpenBlock> = None;

    for (idx, raw_line) in document.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim_end_matches(['\n', '\r']);

        if let Some(mut block) = open.take() {
            if block.fence.is_closed_by(line) {
                finish_block(&mut parsed, block);
            } else {
                block.content.push_str(raw_line);
                open = Some(block);
            }
            continue;
        }

        if let Some(fence) = Fence::parse_opening(line) {
            open = Some(OpenBlock {
                fence,
                line: line_no,
                path: resolve_path(last_text_line.take()),
                content: String::new(),
            });
        } else if !line.trim().is_empty() {
            // Blank lines leave the pending path line in place.
            last_text_line = Some(line);
        }
    }

    if let Some(block) = open {
        log::warn!(
            "Fenced block opened on line {} is never closed; skipping it",
            block.line
        );
        parsed.skipped.push(SkippedBlock {
            line: block.line,
            reason: SkipReason::Unterminated,
        });
    }

    parsed
}

fn resolve_path(line: Option<&str>) -> Result<String, SkipReason> {
    let path = line.and_then(path_from_line).ok_or(SkipReason::MissingPath)?;
    if is_contained_relative_path(&path) {
        Ok(path)
    } else {
        Err(SkipReason::UnsafePath(path))
    }
}

fn finish_block(parsed: &mut ParsedDocument, block: OpenBlock) {
    match block.path {
        Ok(relative_path) => {
            log::debug!("Line {}: block for {}", block.line, relative_path);
            parsed.blocks.push(CodeBlock {
                relative_path,
                content: block.content,
                info: block.fence.info().to_string(),
                line: block.line,
            });
        }
        Err(reason) => {
            log::debug!("Line {}: skipping block ({})", block.line, reason);
            parsed.skipped.push(SkippedBlock {
                line: block.line,
                reason,
            });
        }
    }
}
