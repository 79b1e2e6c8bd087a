//! # File Collector Module
//!
//! This module walks the configured root directories and yields the files
//! whose extension is a scan target.
//!
//! The walk is lazy: [`Walk`] is an iterator that only descends into the next
//! directory when the caller asks for the next entry, so every file is fully
//! processed before the next one is discovered.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::file_filter::{has_target_extension, relative_to_root};

/// A file discovered during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
  /// Path used for reading and writing.
  pub path: PathBuf,
  /// Root-relative path with `/` separators, used for exclusion matching and
  /// reporting.
  pub relative: String,
}

impl CandidateFile {
  pub fn new(path: PathBuf, project_root: &Path) -> Self {
    let relative = relative_to_root(&path, project_root);
    Self { path, relative }
  }

  /// A symlink to a regular file. It is reported under the link's location
  /// and read and written through the resolved target, so the link survives
  /// a fix.
  pub fn linked(link: &Path, target: PathBuf, project_root: &Path) -> Self {
    Self {
      path: target,
      relative: relative_to_root(link, project_root),
    }
  }
}

/// One step of the walk.
#[derive(Debug)]
pub enum WalkEntry {
  /// A configured root is about to be scanned.
  Root { root: String, path: PathBuf },
  /// A configured root does not exist or is not a directory.
  MissingRoot { root: String },
  /// A configured root exists but cannot be inspected or listed.
  UnreadableRoot { root: String, message: String },
  /// A file with a target extension.
  File(CandidateFile),
  /// A directory below a root could not be listed.
  Unreadable { path: PathBuf, message: String },
}

/// Lazy, deterministic traversal over the configured roots.
///
/// Roots are visited in configuration order; inside a root entries are sorted
/// by file name at every level. Symlinked directories are not descended into;
/// symlinks to regular files are yielded.
pub struct Walk<'a> {
  project_root: &'a Path,
  roots: std::slice::Iter<'a, String>,
  extensions: &'a [String],
  current: Option<(String, walkdir::IntoIter)>,
}

fn candidate(entry: walkdir::DirEntry, project_root: &Path, extensions: &[String]) -> Option<CandidateFile> {
  if !has_target_extension(entry.path(), extensions) {
    return None;
  }
  if entry.file_type().is_file() {
    return Some(CandidateFile::new(entry.into_path(), project_root));
  }
  if entry.path_is_symlink() {
    // Dangling links and links to directories are skipped.
    let target = fs::canonicalize(entry.path()).ok().filter(|t| t.is_file())?;
    return Some(CandidateFile::linked(entry.path(), target, project_root));
  }
  None
}

impl Iterator for Walk<'_> {
  type Item = WalkEntry;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      if let Some((root, entries)) = self.current.as_mut() {
        match entries.next() {
          Some(Ok(entry)) => {
            if let Some(file) = candidate(entry, self.project_root, self.extensions) {
              trace!("Found candidate: {}", file.relative);
              return Some(WalkEntry::File(file));
            }
            continue;
          }
          // Depth 0 is the root itself: nothing below it can be listed.
          Some(Err(e)) if e.depth() == 0 => {
            let root = root.clone();
            self.current = None;
            return Some(WalkEntry::UnreadableRoot {
              root,
              message: e.to_string(),
            });
          }
          Some(Err(e)) => {
            let path = e.path().map(Path::to_path_buf).unwrap_or_default();
            return Some(WalkEntry::Unreadable {
              path,
              message: e.to_string(),
            });
          }
          None => {
            self.current = None;
          }
        }
      }

      let root = self.roots.next()?;
      let path = self.project_root.join(root);
      match fs::metadata(&path) {
        Ok(metadata) if metadata.is_dir() => {}
        Err(e) if !matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
          return Some(WalkEntry::UnreadableRoot {
            root: root.clone(),
            message: e.to_string(),
          });
        }
        _ => {
          debug!("Root directory does not exist: {}", path.display());
          return Some(WalkEntry::MissingRoot { root: root.clone() });
        }
      }

      debug!("Scanning directory: {}", path.display());
      self.current = Some((
        root.clone(),
        WalkDir::new(&path)
          .follow_links(false)
          .sort_by_file_name()
          .into_iter(),
      ));
      return Some(WalkEntry::Root {
        root: root.clone(),
        path,
      });
    }
  }
}

/// Walks `roots` (relative to `project_root`) yielding target files.
///
/// Calling `walk` again with the same arguments produces the same sequence.
///
/// # Parameters
///
/// * `project_root` - Directory the roots are resolved against
/// * `roots` - Root directories in scan order
/// * `extensions` - Target suffixes without the leading dot
pub fn walk<'a>(project_root: &'a Path, roots: &'a [String], extensions: &'a [String]) -> Walk<'a> {
  Walk {
    project_root,
    roots: roots.iter(),
    extensions,
    current: None,
  }
}
