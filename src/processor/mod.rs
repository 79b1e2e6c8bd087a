//! # Processor Module
//!
//! This module drives a scan: it walks the configured roots, classifies every
//! discovered file and hands the in-scope ones to a [`Policy`].
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading and atomic replacement
//! - [`file_collector`] - Deterministic, lazy directory traversal
//!
//! The [`Processor`] struct is the main entry point. Files are handled one at
//! a time in discovery order, so progress output matches the walk.

mod file_collector;
mod file_io;

use std::path::PathBuf;

pub use file_collector::{CandidateFile, Walk, WalkEntry, walk};
pub use file_io::FileIO;
use tracing::{debug, trace, warn};

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::file_filter::{Classification, classify, relative_to_root};
use crate::policy::{Policy, ScanOutcome};
use crate::report::ScanReport;
use crate::{output, verbose_log};

/// Runs one policy over the files selected by a [`ScanConfig`].
pub struct Processor {
  config: ScanConfig,
  project_root: PathBuf,
  policy: Box<dyn Policy>,
}

impl Processor {
  pub fn new(config: ScanConfig, project_root: PathBuf, policy: Box<dyn Policy>) -> Self {
    Self {
      config,
      project_root,
      policy,
    }
  }

  /// Walks every root and records one outcome per discovered file.
  ///
  /// Exclusion is decided before a file is opened: excluded files are counted
  /// as skipped and never reach the policy.
  ///
  /// # Errors
  ///
  /// Returns an error for fatal conditions: a configured root that exists but
  /// cannot be listed, or a policy failure such as a missing formatter.
  /// Outcomes recorded so far stay in `report`.
  pub fn process(&self, report: &mut ScanReport) -> Result<(), ScanError> {
    // Files handed to the policy under the root currently being scanned
    let mut found_in_root: Option<usize> = None;

    for entry in walk(&self.project_root, &self.config.roots, &self.config.extensions) {
      match entry {
        WalkEntry::Root { root, path } => {
          Self::finish_root(found_in_root.take());
          debug!("Entering root {}", root);
          output::print_scanning(&path);
          found_in_root = Some(0);
        }
        WalkEntry::MissingRoot { root } => {
          Self::finish_root(found_in_root.take());
          warn!("Root directory '{}' does not exist", root);
          output::print_missing_root(&root);
          report.warn_missing_root(&root);
        }
        WalkEntry::UnreadableRoot { root, message } => {
          return Err(ScanError::UnreadableRoot { root, message });
        }
        WalkEntry::Unreadable { path, message } => {
          let relative = relative_to_root(&path, &self.project_root);
          warn!("Cannot list {}: {}", relative, message);
          output::print_unreadable(&path, &message);
          report.record_unreadable(&relative, &message);
        }
        WalkEntry::File(file) => {
          if self.process_file(&file, report)?
            && let Some(found) = found_in_root.as_mut()
          {
            *found += 1;
          }
        }
      }
    }

    Self::finish_root(found_in_root);
    Ok(())
  }

  /// Classifies and evaluates one file. Returns whether the policy saw it.
  fn process_file(&self, file: &CandidateFile, report: &mut ScanReport) -> Result<bool, ScanError> {
    let outcome = match classify(&file.relative, &self.config) {
      Classification::OutOfScope => {
        trace!("Out of scope: {}", file.relative);
        return Ok(false);
      }
      Classification::Excluded => {
        verbose_log!("Skipping third-party file: {}", file.relative);
        ScanOutcome::Excluded
      }
      Classification::InScope => {
        trace!("Evaluating {}", file.relative);
        self.policy.evaluate(file, self.config.mode)?
      }
    };

    if let ScanOutcome::Error(ref e) = outcome {
      warn!(kind = e.kind(), "Could not process {}: {}", file.relative, e);
    }

    let evaluated = !matches!(outcome, ScanOutcome::Excluded);
    output::print_file_outcome(self.policy.kind(), &file.relative, &outcome);
    report.record(&file.relative, &outcome);
    Ok(evaluated)
  }

  fn finish_root(found: Option<usize>) {
    if found == Some(0) {
      output::print_no_target_files();
    }
  }
}
