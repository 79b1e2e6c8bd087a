//! # Git Module
//!
//! Locates the working tree of the git repository enclosing a directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::{ErrorCode, Repository};
use tracing::debug;

/// Returns the working-tree root of the repository containing `start`.
///
/// Returns `Ok(None)` when `start` is not inside a repository or the
/// repository is bare.
///
/// # Errors
///
/// Returns an error if a repository was found but could not be opened.
pub fn discover_repo_root(start: &Path) -> Result<Option<PathBuf>> {
  let repo = match Repository::discover(start) {
    Ok(repo) => repo,
    Err(e) if e.code() == ErrorCode::NotFound => {
      debug!("No git repository above {}", start.display());
      return Ok(None);
    }
    Err(e) => {
      return Err(e).with_context(|| format!("Failed to open git repository above {}", start.display()));
    }
  };

  Ok(repo.workdir().map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_discovers_root_from_subdirectory() {
    let temp_dir = TempDir::new().expect("create temp dir");
    Repository::init(temp_dir.path()).expect("git init");
    let nested = temp_dir.path().join("src/std");
    fs::create_dir_all(&nested).expect("mkdir");

    let root = discover_repo_root(&nested).expect("discover").expect("repo root");

    assert_eq!(
      root.canonicalize().expect("canonicalize"),
      temp_dir.path().canonicalize().expect("canonicalize")
    );
  }

  #[test]
  fn test_no_repository_is_none() {
    let temp_dir = TempDir::new().expect("create temp dir");
    // Guard against a repository somewhere above the temp dir.
    if Repository::discover(temp_dir.path()).is_ok() {
      return;
    }

    assert_eq!(discover_repo_root(temp_dir.path()).expect("discover"), None);
  }
}
