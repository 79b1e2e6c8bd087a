//! # Diff Module
//!
//! Renders line diffs between a file's current content and the content a fix
//! would produce. Used in check mode to preview what apply mode would write.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use similar::{ChangeTag, TextDiff};

/// Manages diff creation and rendering for proposed fixes.
///
/// This struct handles:
/// - Generating diffs between original and proposed content
/// - Displaying diffs to stderr
/// - Appending diffs to a single consolidated file
#[derive(Debug, Clone, Default)]
pub struct DiffManager {
  /// Whether to print diffs to stderr
  pub show_diff: bool,

  /// Path to append diffs to
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Whether any diff output is requested at all.
  pub const fn is_enabled(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncates the save file so a run starts from an empty diff.
  pub fn init(&self) -> Result<()> {
    if let Some(ref path) = self.save_diff_path {
      std::fs::write(path, "").with_context(|| format!("Failed to create diff file: {}", path.display()))?;
    }
    Ok(())
  }

  /// Renders the diff between `original` and `proposed` in a unified-like
  /// `+`/`-`/` ` line format.
  pub fn render(label: &str, original: &str, proposed: &str) -> String {
    let diff = TextDiff::from_lines(original, proposed);

    let mut diff_content = format!("Diff for {label}:\n");
    for change in diff.iter_all_changes() {
      let sign = match change.tag() {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
      };
      diff_content.push_str(sign);
      diff_content.push_str(&change.to_string());
      if change.missing_newline() {
        diff_content.push('\n');
      }
    }
    diff_content
  }

  /// Displays and/or saves the diff for one file.
  ///
  /// Errors writing the diff file are reported on stderr and do not affect
  /// the scan.
  pub fn display_diff(&self, label: &str, original: &str, proposed: &str) {
    if !self.is_enabled() {
      return;
    }

    let diff_content = Self::render(label, original, proposed);

    if self.show_diff {
      eprintln!("{diff_content}");
    }

    if let Some(ref diff_path) = self.save_diff_path {
      let file_result = OpenOptions::new().create(true).append(true).open(diff_path);

      match file_result {
        Ok(mut file) => {
          if let Err(e) = writeln!(file, "{diff_content}") {
            eprintln!("Error writing to diff file: {e}");
          }
        }
        Err(e) => {
          eprintln!("Error opening diff file: {e}");
        }
      }
    }
  }
}
