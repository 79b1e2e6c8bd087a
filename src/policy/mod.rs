//! # Policy Module
//!
//! A policy decides whether one in-scope file complies and, in apply mode,
//! repairs it. Two policies exist:
//! - [`header`] - the file must start with the mandated license header
//! - [`format`] - the file must equal the external formatter's output
//!
//! Both return a [`ScanOutcome`] per file. Per-file failures are folded into
//! [`ScanOutcome::Error`]; only environment-level problems surface as a
//! [`ScanError`] and stop the scan.

pub mod format;
pub mod header;

pub use format::FormatPolicy;
pub use header::HeaderPolicy;

use crate::config::{Mode, PolicyKind};
use crate::error::{FileError, ScanError};
use crate::processor::CandidateFile;

/// Result of evaluating one file.
#[derive(Debug)]
pub enum ScanOutcome {
  /// The file already satisfies the policy. Nothing was written.
  Compliant,
  /// The file did not comply and was rewritten (apply mode).
  Fixed,
  /// The file does not comply (check mode).
  NonCompliant { diagnostics: Option<String> },
  /// The file is under a third-party prefix and was never evaluated.
  Excluded,
  /// The file could not be evaluated or its fix could not be persisted.
  Error(FileError),
}

/// A compliance rule applied to one file at a time.
pub trait Policy {
  /// Which policy this is; names it in banners and reports.
  fn kind(&self) -> PolicyKind;

  /// Evaluates `file` and, in [`Mode::Apply`], fixes it.
  ///
  /// # Errors
  ///
  /// Only fatal misconfiguration is returned as an error; everything that is
  /// specific to this file is reported through [`ScanOutcome::Error`].
  fn evaluate(&self, file: &CandidateFile, mode: Mode) -> Result<ScanOutcome, ScanError>;
}
