// crates/write_code_blocks/src/lib.rs

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fenced_code_blocks::{is_contained_relative_path, CodeBlock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("refusing to write `{path}`: it is not inside the destination root")]
    UnsafePath { path: String },
    #[error("failed to create directory {}", .dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file produced by a [`BlockSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub relative_path: String,
    pub target: PathBuf,
}

/// Trait that abstracts where code blocks end up.
pub trait BlockSink {
    /// Materialises one block, returning the path it was written to.
    fn write_block(&mut self, block: &CodeBlock) -> Result<PathBuf, WriteError>;
}

/// Writes blocks as files under a destination root, creating directories on
/// demand. Every directory is checked (and if needed created) at most once.
#[derive(Debug)]
pub struct FsBlockSink {
    root: PathBuf,
    known_dirs: HashSet<PathBuf>,
    created_dirs: Vec<PathBuf>,
}

impl FsBlockSink {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            known_dirs: HashSet::new(),
            created_dirs: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directories that did not exist before this sink created them, parents
    /// first.
    pub fn created_dirs(&self) -> &[PathBuf] {
        &self.created_dirs
    }

    /// Joins `relative_path` onto the root, rejecting anything that would
    /// land outside it.
    pub fn target_for(&self, relative_path: &str) -> Result<PathBuf, WriteError> {
        if !is_contained_relative_path(relative_path) {
            return Err(WriteError::UnsafePath {
                path: relative_path.to_string(),
            });
        }
        Ok(self.root.join(relative_path))
    }

    fn ensure_dir(&mut self, dir: &Path) -> Result<(), WriteError> {
        if self.known_dirs.contains(dir) {
            return Ok(());
        }

        let missing: Vec<PathBuf> = dir
            .ancestors()
            .take_while(|ancestor| !ancestor.as_os_str().is_empty() && !ancestor.is_dir())
            .map(Path::to_path_buf)
            .collect();

        if !missing.is_empty() {
            fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
                dir: dir.to_path_buf(),
                source,
            })?;
            for created in missing.into_iter().rev() {
                log::info!("Created directory {}", created.display());
                self.created_dirs.push(created);
            }
        }

        self.known_dirs.insert(dir.to_path_buf());
        Ok(())
    }
}

impl BlockSink for FsBlockSink {
    fn write_block(&mut self, block: &CodeBlock) -> Result<PathBuf, WriteError> {
        let target = self.target_for(&block.relative_path)?;
        if let Some(parent) = target.parent() {
            self.ensure_dir(parent)?;
        }
        fs::write(&target, block.content.as_bytes()).map_err(|source| WriteError::WriteFile {
            path: target.clone(),
            source,
        })?;
        log::info!("Wrote {} ({} bytes)", target.display(), block.content.len());
        Ok(target)
    }
}

/// Writes `blocks` in order through `sink`, stopping at the first failure.
///
/// Files already written before a failure stay on disk. When two blocks name
/// the same path the later one wins and the file is listed once.
pub fn write_blocks_with_sink(
    sink: &mut dyn BlockSink,
    blocks: &[CodeBlock],
) -> Result<Vec<WrittenFile>, WriteError> {
    let mut written: Vec<WrittenFile> = Vec::new();
    let mut seen = HashSet::new();

    for block in blocks {
        let target = sink.write_block(block)?;
        if seen.insert(target.clone()) {
            written.push(WrittenFile {
                relative_path: block.relative_path.clone(),
                target,
            });
        } else {
            log::warn!(
                "Line {}: {} overwrites a block written earlier in this run",
                block.line,
                block.relative_path
            );
        }
    }

    Ok(written)
}

/// Convenience wrapper writing `blocks` under `root` with an [`FsBlockSink`].
pub fn write_blocks<P: AsRef<Path>>(
    root: P,
    blocks: &[CodeBlock],
) -> Result<Vec<WrittenFile>, WriteError> {
    let mut sink = FsBlockSink::new(root);
    write_blocks_with_sink(&mut sink, blocks)
}
