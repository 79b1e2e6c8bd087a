//! # Header Policy
//!
//! A file complies when its content starts with the header template,
//! byte-for-byte. No comment syntax is parsed, which keeps the check exact and
//! makes apply idempotent: a file that was fixed once starts with the template
//! and is left alone on the next run.

use tracing::debug;

use super::{Policy, ScanOutcome};
use crate::config::{HeaderTemplate, Mode, PolicyKind};
use crate::diff::DiffManager;
use crate::error::ScanError;
use crate::processor::{CandidateFile, FileIO};

/// Separation inserted between the header and the original content.
pub const HEADER_SPACING: &str = "\n\n";

/// Enforces the presence of the license header.
pub struct HeaderPolicy {
  template: HeaderTemplate,
  diff_manager: DiffManager,
}

impl HeaderPolicy {
  pub fn new(template: HeaderTemplate) -> Self {
    Self {
      template,
      diff_manager: DiffManager::default(),
    }
  }

  pub fn with_diff_manager(mut self, diff_manager: DiffManager) -> Self {
    self.diff_manager = diff_manager;
    self
  }

  pub fn has_header(&self, content: &str) -> bool {
    content.as_bytes().starts_with(self.template.as_str().as_bytes())
  }

  /// Content a fix writes: template, spacing, then the untouched original.
  pub fn with_header(&self, content: &str) -> String {
    let template = self.template.as_str();
    let mut fixed = String::with_capacity(template.len() + HEADER_SPACING.len() + content.len());
    fixed.push_str(template);
    fixed.push_str(HEADER_SPACING);
    fixed.push_str(content);
    fixed
  }
}

impl Policy for HeaderPolicy {
  fn kind(&self) -> PolicyKind {
    PolicyKind::Header
  }

  fn evaluate(&self, file: &CandidateFile, mode: Mode) -> Result<ScanOutcome, ScanError> {
    let content = match FileIO::read_text(&file.path) {
      Ok(content) => content,
      Err(e) => return Ok(ScanOutcome::Error(e)),
    };

    if self.has_header(&content) {
      debug!("Header present: {}", file.relative);
      return Ok(ScanOutcome::Compliant);
    }

    match mode {
      Mode::Check => {
        if self.diff_manager.is_enabled() {
          self
            .diff_manager
            .display_diff(&file.relative, &content, &self.with_header(&content));
        }
        Ok(ScanOutcome::NonCompliant { diagnostics: None })
      }
      Mode::Apply => {
        let fixed = self.with_header(&content);
        match FileIO::replace_contents(&file.path, fixed.as_bytes()) {
          Ok(()) => Ok(ScanOutcome::Fixed),
          Err(e) => Ok(ScanOutcome::Error(e)),
        }
      }
    }
  }
}
