// crates/md_code_extractor/src/lib.rs

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fenced_code_blocks::parse_document;
use thiserror::Error;
use write_code_blocks::{write_blocks_with_sink, FsBlockSink};

pub use fenced_code_blocks::{SkipReason, SkippedBlock};
pub use write_code_blocks::{WriteError, WrittenFile};

/// Configuration for one extraction run.
#[derive(Clone, Debug)]
pub struct ExtractConfig {
    /// Markdown document to read.
    pub markdown_path: PathBuf,
    /// Directory the extracted files are written under.
    pub destination_root: PathBuf,
}

impl ExtractConfig {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(markdown_path: P, destination_root: Q) -> Self {
        Self {
            markdown_path: markdown_path.into(),
            destination_root: destination_root.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("markdown file {} not found", .path.display())]
    InputNotFound { path: PathBuf },
    #[error("failed to read markdown file {}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Outcome of a successful run.
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Files written, in the order they were first written.
    pub written: Vec<WrittenFile>,
    /// Directories that did not exist before the run, parents first.
    pub created_dirs: Vec<PathBuf>,
    /// Blocks that were found but not written.
    pub skipped: Vec<SkippedBlock>,
}

impl ExtractReport {
    pub fn files_written(&self) -> usize {
        self.written.len()
    }
}

/// Reads the whole document as UTF-8 text.
///
/// # Errors
///
/// `InputNotFound` when nothing exists at `path`, `InputUnreadable` for any
/// other read failure (permissions, a directory, invalid UTF-8).
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<String, ExtractError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ExtractError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ExtractError::InputUnreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Extracts every path-annotated block of `config.markdown_path` into
/// `config.destination_root`.
///
/// The document is read before the destination is touched, so a missing
/// input leaves the destination as it was. Writing stops at the first
/// failure; files written before it stay on disk.
pub fn extract_with_report(config: &ExtractConfig) -> Result<ExtractReport, ExtractError> {
    let document = read_document(&config.markdown_path)?;
    log::debug!(
        "Read {} bytes from {}",
        document.len(),
        config.markdown_path.display()
    );

    let parsed = parse_document(&document);
    for skipped in &parsed.skipped {
        log::warn!(
            "{}:{}: skipping block: {}",
            config.markdown_path.display(),
            skipped.line,
            skipped.reason
        );
    }

    let mut sink = FsBlockSink::new(&config.destination_root);
    let written = write_blocks_with_sink(&mut sink, &parsed.blocks)?;

    Ok(ExtractReport {
        written,
        created_dirs: sink.created_dirs().to_vec(),
        skipped: parsed.skipped,
    })
}

/// Extracts the blocks of `markdown_path` under `destination_root` and
/// returns how many files were written.
pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(
    markdown_path: P,
    destination_root: Q,
) -> Result<usize, ExtractError> {
    let config = ExtractConfig::new(markdown_path.as_ref(), destination_root.as_ref());
    extract_with_report(&config).map(|report| report.files_written())
}
