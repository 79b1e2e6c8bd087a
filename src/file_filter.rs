//! # File Filter Module
//!
//! This module decides, for a candidate path, whether it is in scope for a
//! policy (by extension) and whether it is excluded (by third-party path
//! prefix). Classification is a pure function of the path and the
//! [`ScanConfig`]: nothing here touches the filesystem.

use std::path::{Component, Path};

use crate::config::ScanConfig;

/// Result of classifying a candidate path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
  /// The file has a target extension and is not excluded.
  InScope,
  /// The file does not carry a target extension.
  OutOfScope,
  /// The file lives under a third-party prefix. Takes precedence over
  /// extension matching.
  Excluded,
}

/// Classifies a root-relative, forward-slash path.
///
/// # Parameters
///
/// * `relative_path` - Path relative to the project root, using `/`
/// * `config` - The scan configuration holding extensions and exclusions
pub fn classify(relative_path: &str, config: &ScanConfig) -> Classification {
  if is_excluded(relative_path, &config.excluded_prefixes) {
    return Classification::Excluded;
  }

  if has_target_extension(Path::new(relative_path), &config.extensions) {
    Classification::InScope
  } else {
    Classification::OutOfScope
  }
}

/// Plain string prefix match against the configured exclusions.
pub fn is_excluded(relative_path: &str, excluded_prefixes: &[String]) -> bool {
  excluded_prefixes
    .iter()
    .any(|prefix| relative_path.starts_with(prefix.as_str()))
}

/// Whether the file suffix (without the dot) is one of `extensions`.
pub fn has_target_extension(path: &Path, extensions: &[String]) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| extensions.iter().any(|target| target == ext))
}

/// Expresses `path` relative to `project_root` with `/` separators.
///
/// Paths outside the root are expressed with `..` segments so they can never
/// accidentally match a root-relative exclusion prefix.
pub fn relative_to_root(path: &Path, project_root: &Path) -> String {
  let relative = match path.strip_prefix(project_root) {
    Ok(stripped) => stripped.to_path_buf(),
    Err(_) => pathdiff::diff_paths(path, project_root).unwrap_or_else(|| path.to_path_buf()),
  };

  let segments: Vec<String> = relative
    .components()
    .filter(|c| !matches!(c, Component::CurDir))
    .map(|c| c.as_os_str().to_string_lossy().to_string())
    .collect();

  segments.join("/")
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;
  use crate::config::Mode;

  fn config(excluded: &[&str]) -> ScanConfig {
    ScanConfig::new(&["src", "tests"], &["c", "h"], excluded, Mode::Check)
  }

  #[test]
  fn test_in_scope_by_extension() {
    let cfg = config(&[]);
    assert_eq!(classify("src/main.c", &cfg), Classification::InScope);
    assert_eq!(classify("src/std/vector.h", &cfg), Classification::InScope);
  }

  #[test]
  fn test_out_of_scope_extension() {
    let cfg = config(&[]);
    assert_eq!(classify("src/build.py", &cfg), Classification::OutOfScope);
    assert_eq!(classify("src/Makefile", &cfg), Classification::OutOfScope);
    assert_eq!(classify("src/main.cc", &cfg), Classification::OutOfScope);
  }

  #[test]
  fn test_extension_is_case_sensitive() {
    let cfg = config(&[]);
    assert_eq!(classify("src/MAIN.C", &cfg), Classification::OutOfScope);
  }

  #[test]
  fn test_excluded_exact_file() {
    let cfg = config(&["src/std/hash/xxhash.h"]);
    assert_eq!(classify("src/std/hash/xxhash.h", &cfg), Classification::Excluded);
    assert_eq!(classify("src/std/hash/default.h", &cfg), Classification::InScope);
  }

  #[test]
  fn test_excluded_directory_prefix() {
    let cfg = config(&["third_party/"]);
    assert_eq!(classify("third_party/x.c", &cfg), Classification::Excluded);
    assert_eq!(classify("third_party/deep/nested/y.h", &cfg), Classification::Excluded);
  }

  #[test]
  fn test_exclusion_takes_precedence_over_extension() {
    let cfg = config(&["vendor"]);
    assert_eq!(classify("vendor/readme.txt", &cfg), Classification::Excluded);
  }

  #[test]
  fn test_exclusion_is_plain_string_prefix() {
    let cfg = config(&["src/std/hash/xxhash"]);
    assert_eq!(classify("src/std/hash/xxhash.c", &cfg), Classification::Excluded);
    assert_eq!(classify("src/std/hash/xxhash_impl.h", &cfg), Classification::Excluded);
  }

  #[test]
  fn test_relative_to_root_uses_forward_slashes() {
    let root = PathBuf::from("/work/project");
    let path = root.join("src").join("std").join("string.h");
    assert_eq!(relative_to_root(&path, &root), "src/std/string.h");
  }

  #[test]
  fn test_relative_to_root_outside_root() {
    let root = PathBuf::from("/work/project");
    let path = PathBuf::from("/work/other/x.c");
    assert_eq!(relative_to_root(&path, &root), "../other/x.c");
  }

  #[test]
  fn test_relative_to_root_strips_cur_dir() {
    let root = PathBuf::from("/work/project");
    let path = PathBuf::from("/work/project/./src/a.c");
    assert_eq!(relative_to_root(&path, &root), "src/a.c");
  }
}
