//! # Formatter Module
//!
//! The external code formatter is an opaque collaborator. The format policy
//! only talks to it through the [`Formatter`] trait, which makes it possible
//! to substitute a fake in tests. [`ClangFormat`] is the production
//! implementation and drives a `clang-format` compatible binary as a
//! subprocess.

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output};

use tracing::debug;

/// Result of a verify (dry-run) invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
  /// The file already matches the canonical form.
  Canonical,
  /// The formatter would change the file.
  Differs { diagnostics: String },
}

/// Failure talking to the formatter.
#[derive(Debug, thiserror::Error)]
pub enum FormatterError {
  /// The formatter binary could not be located.
  #[error("command '{program}' not found")]
  NotFound { program: String },

  /// The formatter ran but rejected the input.
  #[error("formatter exited with {status}: {stderr}")]
  Invocation { status: String, stderr: String },

  /// The subprocess could not be spawned for another reason.
  #[error("failed to run formatter: {0}")]
  Io(#[from] std::io::Error),
}

/// Interface to an external formatting tool.
pub trait Formatter {
  /// Checks whether the file at `path` is already canonical, without touching
  /// it.
  fn verify(&self, path: &Path) -> Result<Verification, FormatterError>;

  /// Returns the canonical bytes for the file at `path`, without touching it.
  fn render_canonical(&self, path: &Path) -> Result<Vec<u8>, FormatterError>;
}

/// `clang-format` driven as a subprocess.
///
/// Verification runs `<program> <args..> --dry-run -Werror <path>`; rendering
/// runs `<program> <args..> <path>` and captures standard output. Neither
/// invocation passes `-i`, so the file is never modified by the tool.
#[derive(Debug, Clone)]
pub struct ClangFormat {
  program: String,
  args: Vec<String>,
}

impl ClangFormat {
  pub const fn new(program: String, args: Vec<String>) -> Self {
    Self { program, args }
  }

  fn run(&self, extra: &[&str], path: &Path) -> Result<Output, FormatterError> {
    debug!("Running {} {:?} {:?} {}", self.program, self.args, extra, path.display());

    Command::new(&self.program)
      .args(&self.args)
      .args(extra)
      .arg(path)
      .output()
      .map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
          FormatterError::NotFound {
            program: self.program.clone(),
          }
        } else {
          FormatterError::Io(e)
        }
      })
  }
}

impl Formatter for ClangFormat {
  fn verify(&self, path: &Path) -> Result<Verification, FormatterError> {
    let output = self.run(&["--dry-run", "-Werror"], path)?;
    if output.status.success() {
      return Ok(Verification::Canonical);
    }

    let mut diagnostics = String::from_utf8_lossy(&output.stdout).to_string();
    diagnostics.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(Verification::Differs {
      diagnostics: diagnostics.trim_end().to_string(),
    })
  }

  fn render_canonical(&self, path: &Path) -> Result<Vec<u8>, FormatterError> {
    let output = self.run(&[], path)?;
    if !output.status.success() {
      return Err(FormatterError::Invocation {
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
      });
    }
    Ok(output.stdout)
  }
}
