//! # Workspace Module
//!
//! This module decides which directory is the project root. Scan roots and
//! exclusion prefixes are resolved against it, and report paths are relative
//! to it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::DEFAULT_CONFIG_FILENAME;
use crate::git;

/// Name of the tool directory whose parent is taken as the project root when
/// the executable is installed there.
pub const TOOL_DIR_NAME: &str = "scripts";

/// How the project root was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Workspace {
  /// Given with `--root`.
  Explicit { root: PathBuf },
  /// Parent of the tool directory the executable runs from.
  ToolDir { root: PathBuf },
  /// Nearest ancestor holding a configuration file.
  ConfigFile { root: PathBuf },
  /// Working tree of the enclosing git repository.
  Git { root: PathBuf },
  /// Fallback: the current directory.
  Directory { root: PathBuf },
}

impl Workspace {
  pub fn root(&self) -> &Path {
    match self {
      Self::Explicit { root }
      | Self::ToolDir { root }
      | Self::ConfigFile { root }
      | Self::Git { root }
      | Self::Directory { root } => root.as_path(),
    }
  }

  pub fn into_root(self) -> PathBuf {
    match self {
      Self::Explicit { root }
      | Self::ToolDir { root }
      | Self::ConfigFile { root }
      | Self::Git { root }
      | Self::Directory { root } => root,
    }
  }

  pub const fn describe(&self) -> &'static str {
    match self {
      Self::Explicit { .. } => "--root",
      Self::ToolDir { .. } => "tool directory",
      Self::ConfigFile { .. } => DEFAULT_CONFIG_FILENAME,
      Self::Git { .. } => "git repository",
      Self::Directory { .. } => "current directory",
    }
  }
}

/// Resolves the project root for this process.
///
/// # Errors
///
/// Returns an error if `--root` does not name a directory or the current
/// directory cannot be determined.
pub fn resolve_workspace(explicit_root: Option<&Path>) -> Result<Workspace> {
  let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
  let exe = std::env::current_exe().ok();
  let workspace = resolve_from(explicit_root, exe.as_deref(), &current_dir)?;
  debug!(
    "Project root {} (from {})",
    workspace.root().display(),
    workspace.describe()
  );
  Ok(workspace)
}

/// Resolution with every input passed in, so it can be tested.
pub fn resolve_from(explicit_root: Option<&Path>, exe: Option<&Path>, current_dir: &Path) -> Result<Workspace> {
  if let Some(root) = explicit_root {
    let root = abs_path_or_current(root, current_dir);
    if !root.is_dir() {
      anyhow::bail!("Project root '{}' is not a directory", root.display());
    }
    return Ok(Workspace::Explicit { root });
  }

  if let Some(root) = exe.and_then(root_from_tool_dir) {
    return Ok(Workspace::ToolDir { root });
  }

  if let Some(root) = find_config_ancestor(current_dir) {
    return Ok(Workspace::ConfigFile { root });
  }

  if let Some(root) = git::discover_repo_root(current_dir)? {
    return Ok(Workspace::Git { root });
  }

  Ok(Workspace::Directory {
    root: current_dir.to_path_buf(),
  })
}

/// `<root>/scripts/srcguard` resolves to `<root>`.
fn root_from_tool_dir(exe: &Path) -> Option<PathBuf> {
  let dir = exe.parent()?;
  if dir.file_name()? != TOOL_DIR_NAME {
    return None;
  }
  dir.parent().map(Path::to_path_buf)
}

fn find_config_ancestor(start: &Path) -> Option<PathBuf> {
  start
    .ancestors()
    .find(|dir| dir.join(DEFAULT_CONFIG_FILENAME).is_file())
    .map(Path::to_path_buf)
}

fn abs_path_or_current(path: &Path, current_dir: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    current_dir.join(path)
  }
}
