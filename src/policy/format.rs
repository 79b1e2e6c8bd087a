//! # Format Policy
//!
//! Compliance is defined entirely by the external formatter: a file complies
//! when its stored bytes equal the formatter's canonical output. In apply mode
//! the canonical output is captured and compared byte-for-byte with the file,
//! and the file is only rewritten when the two differ, so already-canonical
//! files are never touched.

use tracing::debug;

use super::{Policy, ScanOutcome};
use crate::config::{Mode, PolicyKind};
use crate::diff::DiffManager;
use crate::error::{FileError, ScanError};
use crate::formatter::{Formatter, FormatterError, Verification};
use crate::processor::{CandidateFile, FileIO};

/// Enforces formatter-canonical content.
pub struct FormatPolicy<F: Formatter> {
  formatter: F,
  program: String,
  diff_manager: DiffManager,
}

impl<F: Formatter> FormatPolicy<F> {
  /// `program` is only used to name the tool in a fatal error.
  pub fn new(formatter: F, program: impl Into<String>) -> Self {
    Self {
      formatter,
      program: program.into(),
      diff_manager: DiffManager::default(),
    }
  }

  pub fn with_diff_manager(mut self, diff_manager: DiffManager) -> Self {
    self.diff_manager = diff_manager;
    self
  }

  /// Maps a formatter failure to either a per-file outcome or a fatal error.
  fn classify_failure(&self, file: &CandidateFile, err: FormatterError) -> Result<ScanOutcome, ScanError> {
    match err {
      FormatterError::NotFound { .. } => Err(ScanError::ToolNotFound {
        program: self.program.clone(),
      }),
      FormatterError::Invocation { status, stderr } => Ok(ScanOutcome::Error(FileError::ToolInvocation {
        path: file.path.clone(),
        status,
        stderr,
      })),
      FormatterError::Io(e) => Ok(ScanOutcome::Error(FileError::ToolInvocation {
        path: file.path.clone(),
        status: "not started".to_string(),
        stderr: e.to_string(),
      })),
    }
  }

  fn check(&self, file: &CandidateFile) -> Result<ScanOutcome, ScanError> {
    let verification = match self.formatter.verify(&file.path) {
      Ok(verification) => verification,
      Err(e) => return self.classify_failure(file, e),
    };

    match verification {
      Verification::Canonical => Ok(ScanOutcome::Compliant),
      Verification::Differs { diagnostics } => {
        if self.diff_manager.is_enabled() {
          self.preview(file)?;
        }
        let diagnostics = Some(diagnostics).filter(|d| !d.is_empty());
        Ok(ScanOutcome::NonCompliant { diagnostics })
      }
    }
  }

  /// Shows what apply mode would write. Failures here only lose the preview.
  fn preview(&self, file: &CandidateFile) -> Result<(), ScanError> {
    let original = match FileIO::read_bytes(&file.path) {
      Ok(bytes) => bytes,
      Err(e) => {
        debug!("No diff preview for {}: {}", file.relative, e);
        return Ok(());
      }
    };

    match self.formatter.render_canonical(&file.path) {
      Ok(canonical) => {
        self.diff_manager.display_diff(
          &file.relative,
          &String::from_utf8_lossy(&original),
          &String::from_utf8_lossy(&canonical),
        );
        Ok(())
      }
      Err(FormatterError::NotFound { .. }) => Err(ScanError::ToolNotFound {
        program: self.program.clone(),
      }),
      Err(e) => {
        debug!("No diff preview for {}: {}", file.relative, e);
        Ok(())
      }
    }
  }

  fn apply(&self, file: &CandidateFile) -> Result<ScanOutcome, ScanError> {
    let original = match FileIO::read_bytes(&file.path) {
      Ok(bytes) => bytes,
      Err(e) => return Ok(ScanOutcome::Error(e)),
    };

    let canonical = match self.formatter.render_canonical(&file.path) {
      Ok(canonical) => canonical,
      Err(e) => return self.classify_failure(file, e),
    };

    if canonical == original {
      debug!("Already canonical: {}", file.relative);
      return Ok(ScanOutcome::Compliant);
    }

    Ok(match FileIO::replace_contents(&file.path, &canonical) {
      Ok(()) => ScanOutcome::Fixed,
      Err(e) => ScanOutcome::Error(e),
    })
  }
}

impl<F: Formatter> Policy for FormatPolicy<F> {
  fn kind(&self) -> PolicyKind {
    PolicyKind::Format
  }

  fn evaluate(&self, file: &CandidateFile, mode: Mode) -> Result<ScanOutcome, ScanError> {
    match mode {
      Mode::Check => self.check(file),
      Mode::Apply => self.apply(file),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;
  use std::fs;
  use std::path::Path;

  use tempfile::TempDir;

  use super::*;

  /// Canonical form is the input with every tab replaced by four spaces.
  #[derive(Default)]
  struct FakeFormatter {
    missing: bool,
    reject: bool,
    /// Verifies fine but disappears before rendering.
    missing_on_render: bool,
    calls: Cell<usize>,
  }

  impl FakeFormatter {
    fn canonical(path: &Path) -> Result<Vec<u8>, FormatterError> {
      let content = fs::read_to_string(path)?;
      Ok(content.replace('\t', "    ").into_bytes())
    }

    fn precheck(&self) -> Result<(), FormatterError> {
      self.calls.set(self.calls.get() + 1);
      if self.missing {
        return Err(FormatterError::NotFound {
          program: "fake".to_string(),
        });
      }
      if self.reject {
        return Err(FormatterError::Invocation {
          status: "exit status: 1".to_string(),
          stderr: "expected ';'".to_string(),
        });
      }
      Ok(())
    }
  }

  impl Formatter for FakeFormatter {
    fn verify(&self, path: &Path) -> Result<Verification, FormatterError> {
      self.precheck()?;
      if fs::read(path)? == Self::canonical(path)? {
        Ok(Verification::Canonical)
      } else {
        Ok(Verification::Differs {
          diagnostics: format!("{}: code should be clang-formatted", path.display()),
        })
      }
    }

    fn render_canonical(&self, path: &Path) -> Result<Vec<u8>, FormatterError> {
      self.precheck()?;
      if self.missing_on_render {
        return Err(FormatterError::NotFound {
          program: "fake".to_string(),
        });
      }
      Self::canonical(path)
    }
  }

  fn candidate(root: &Path, name: &str, content: &str) -> CandidateFile {
    let path = root.join(name);
    fs::write(&path, content).expect("write");
    CandidateFile::new(path, root)
  }

  #[test]
  fn test_check_canonical_file_is_compliant() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let file = candidate(temp_dir.path(), "a.c", "int x;\n");
    let policy = FormatPolicy::new(FakeFormatter::default(), "fake");

    assert!(matches!(
      policy.evaluate(&file, Mode::Check).expect("evaluate"),
      ScanOutcome::Compliant
    ));
  }

  #[test]
  fn test_check_bad_format_surfaces_diagnostics_without_writing() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let file = candidate(temp_dir.path(), "b.h", "\tint y;\n");
    let policy = FormatPolicy::new(FakeFormatter::default(), "fake");

    match policy.evaluate(&file, Mode::Check).expect("evaluate") {
      ScanOutcome::NonCompliant { diagnostics } => {
        assert!(diagnostics.expect("diagnostics").contains("clang-formatted"));
      }
      other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(fs::read_to_string(&file.path).expect("read"), "\tint y;\n");
  }

  #[test]
  fn test_apply_canonical_file_is_not_written() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let file = candidate(temp_dir.path(), "a.c", "int x;\n");
    let before = fs::metadata(&file.path).expect("stat").modified().expect("mtime");
    let policy = FormatPolicy::new(FakeFormatter::default(), "fake");

    assert!(matches!(
      policy.evaluate(&file, Mode::Apply).expect("evaluate"),
      ScanOutcome::Compliant
    ));
    let after = fs::metadata(&file.path).expect("stat").modified().expect("mtime");
    assert_eq!(before, after);
  }

  #[test]
  fn test_apply_writes_exact_formatter_output() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let file = candidate(temp_dir.path(), "b.h", "\tint y;\n\tint z;\n");
    let policy = FormatPolicy::new(FakeFormatter::default(), "fake");

    assert!(matches!(
      policy.evaluate(&file, Mode::Apply).expect("evaluate"),
      ScanOutcome::Fixed
    ));
    assert_eq!(fs::read_to_string(&file.path).expect("read"), "    int y;\n    int z;\n");

    assert!(matches!(
      policy.evaluate(&file, Mode::Apply).expect("evaluate"),
      ScanOutcome::Compliant
    ));
  }

  #[test]
  fn test_rejected_file_is_per_file_error_and_untouched() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let file = candidate(temp_dir.path(), "broken.c", "\tint (;\n");
    let policy = FormatPolicy::new(
      FakeFormatter {
        reject: true,
        ..FakeFormatter::default()
      },
      "fake",
    );

    let outcome = policy.evaluate(&file, Mode::Apply).expect("evaluate");
    assert!(matches!(outcome, ScanOutcome::Error(FileError::ToolInvocation { .. })));
    assert_eq!(fs::read_to_string(&file.path).expect("read"), "\tint (;\n");
  }

  #[test]
  fn test_missing_tool_is_fatal_in_both_modes() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let file = candidate(temp_dir.path(), "a.c", "int x;\n");
    let policy = FormatPolicy::new(
      FakeFormatter {
        missing: true,
        ..FakeFormatter::default()
      },
      "clang-format-missing",
    );

    for mode in [Mode::Check, Mode::Apply] {
      let err = policy.evaluate(&file, mode).expect_err("should be fatal");
      assert!(matches!(err, ScanError::ToolNotFound { ref program } if program == "clang-format-missing"));
    }
  }

  #[test]
  fn test_unreadable_file_in_apply_skips_formatter() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let file = CandidateFile::new(temp_dir.path().join("gone.c"), temp_dir.path());
    let formatter = FakeFormatter::default();
    let policy = FormatPolicy::new(formatter, "fake");

    let outcome = policy.evaluate(&file, Mode::Apply).expect("evaluate");
    assert!(matches!(outcome, ScanOutcome::Error(FileError::Read { .. })));
    assert_eq!(policy.formatter.calls.get(), 0);
  }

  #[test]
  fn test_check_saves_preview_of_formatter_output() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let file = candidate(temp_dir.path(), "b.h", "int a;\n\tint y;\n");
    let diff_path = temp_dir.path().join("format.diff");
    let diff_manager = DiffManager::new(false, Some(diff_path.clone()));
    diff_manager.init().expect("init diff file");
    let policy = FormatPolicy::new(FakeFormatter::default(), "fake").with_diff_manager(diff_manager);

    let outcome = policy.evaluate(&file, Mode::Check).expect("evaluate");
    assert!(matches!(outcome, ScanOutcome::NonCompliant { .. }));

    let saved = fs::read_to_string(&diff_path).expect("read diff");
    assert!(saved.contains("Diff for b.h:"));
    assert!(saved.contains(" int a;\n"));
    assert!(saved.contains("-\tint y;\n"));
    assert!(saved.contains("+    int y;\n"));
    assert_eq!(fs::read_to_string(&file.path).expect("read"), "int a;\n\tint y;\n");
  }

  #[test]
  fn test_tool_lost_during_preview_is_fatal() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let file = candidate(temp_dir.path(), "b.h", "\tint y;\n");
    let policy = FormatPolicy::new(
      FakeFormatter {
        missing_on_render: true,
        ..FakeFormatter::default()
      },
      "clang-format-gone",
    )
    .with_diff_manager(DiffManager::new(true, None));

    let err = policy.evaluate(&file, Mode::Check).expect_err("should be fatal");
    assert!(matches!(err, ScanError::ToolNotFound { ref program } if program == "clang-format-gone"));
  }
}
