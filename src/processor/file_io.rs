//! # File I/O Module
//!
//! This module provides file reading and replacement for the policies.
//! Every handle is scoped to a single call: opened, used and closed before
//! returning.

use std::io::Write as _;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;

use crate::error::FileError;

/// File I/O operations for the policies.
pub struct FileIO;

impl FileIO {
  /// Reads the complete file as UTF-8 text.
  ///
  /// # Errors
  ///
  /// [`FileError::Read`] when the file cannot be read and
  /// [`FileError::Decode`] when it is not valid UTF-8.
  pub fn read_text(path: &Path) -> Result<String, FileError> {
    let bytes = Self::read_bytes(path)?;
    String::from_utf8(bytes).map_err(|_| FileError::Decode {
      path: path.to_path_buf(),
    })
  }

  /// Reads the complete file as raw bytes.
  pub fn read_bytes(path: &Path) -> Result<Vec<u8>, FileError> {
    std::fs::read(path).map_err(|source| FileError::Read {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Replaces the file with `content`.
  ///
  /// The new payload is written to a temporary file next to the target and
  /// renamed over it, so a reader sees either the old or the new content and
  /// never a truncated file. The original permissions are carried over.
  pub fn replace_contents(path: &Path, content: &[u8]) -> Result<(), FileError> {
    let write_err = |source: std::io::Error| FileError::Write {
      path: path.to_path_buf(),
      source,
    };

    let dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let permissions = std::fs::metadata(path).map_err(write_err)?.permissions();

    let mut staged = NamedTempFile::new_in(dir).map_err(write_err)?;
    staged.write_all(content).map_err(write_err)?;
    staged.as_file().sync_all().map_err(write_err)?;
    std::fs::set_permissions(staged.path(), permissions).map_err(write_err)?;

    staged.persist(path).map_err(|e| write_err(e.error))?;
    trace!("Replaced {} ({} bytes)", path.display(), content.len());
    Ok(())
  }
}
