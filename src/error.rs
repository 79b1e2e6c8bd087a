//! # Error Module
//!
//! Typed errors for the scan engine.
//!
//! Two tiers exist. A [`FileError`] belongs to a single file and never stops a
//! scan: it is recorded in the report and the walk moves on. A [`ScanError`]
//! means the environment itself is misconfigured and aborts the whole run.

use std::path::PathBuf;

/// Per-file failure. Recorded in the report, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
  /// The file could not be opened or read.
  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  /// The file is not valid UTF-8 text.
  #[error("failed to decode {} as UTF-8", path.display())]
  Decode { path: PathBuf },

  /// A fix was computed but could not be persisted.
  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },

  /// The external formatter rejected the file.
  #[error("formatter failed on {} ({status}): {stderr}", path.display())]
  ToolInvocation {
    path: PathBuf,
    status: String,
    stderr: String,
  },
}

impl FileError {
  /// Short label used in progress lines and reports.
  pub const fn kind(&self) -> &'static str {
    match self {
      Self::Read { .. } => "read",
      Self::Decode { .. } => "decode",
      Self::Write { .. } => "write",
      Self::ToolInvocation { .. } => "tool",
    }
  }
}

/// Environment-level failure that aborts the whole scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
  /// The external formatter binary could not be located.
  #[error("command '{program}' not found; install it or set CLANG_FORMAT_BIN")]
  ToolNotFound { program: String },

  /// A configured root exists but cannot be listed, so none of its files
  /// could be evaluated.
  #[error("cannot read root directory '{root}': {message}")]
  UnreadableRoot { root: String, message: String },
}
