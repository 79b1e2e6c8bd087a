//! # Report Module
//!
//! This module aggregates per-file outcomes across a whole scan and turns them
//! into totals, a process exit status and optional machine-readable report
//! files (JSON, CSV).
//!
//! Every discovered candidate lands in exactly one of two buckets: *processed*
//! (handed to a policy, whatever the result) or *skipped* (excluded as third
//! party). Directories below a root that could not be listed are not files,
//! but they hide files from the scan and so count as errors.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::config::{Mode, PolicyKind};
use crate::policy::ScanOutcome;

/// Final status of a file, as recorded in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
  Compliant,
  Fixed,
  NonCompliant,
  Excluded,
  Error,
}

impl std::fmt::Display for FileStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      FileStatus::Compliant => "compliant",
      FileStatus::Fixed => "fixed",
      FileStatus::NonCompliant => "non_compliant",
      FileStatus::Excluded => "excluded",
      FileStatus::Error => "error",
    };
    write!(f, "{label}")
  }
}

/// Information about one discovered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
  /// Path relative to the project root, `/`-separated.
  pub path: String,
  pub status: FileStatus,
  /// Formatter diagnostics or the error message, when there is one.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub detail: Option<String>,
}

impl FileReport {
  pub fn from_outcome(path: &str, outcome: &ScanOutcome) -> Self {
    let (status, detail) = match outcome {
      ScanOutcome::Compliant => (FileStatus::Compliant, None),
      ScanOutcome::Fixed => (FileStatus::Fixed, None),
      ScanOutcome::NonCompliant { diagnostics } => (FileStatus::NonCompliant, diagnostics.clone()),
      ScanOutcome::Excluded => (FileStatus::Excluded, None),
      ScanOutcome::Error(e) => (FileStatus::Error, Some(e.to_string())),
    };

    Self {
      path: path.to_string(),
      status,
      detail,
    }
  }
}

/// A directory below a root whose contents could not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadableDir {
  pub path: String,
  pub message: String,
}

/// Process exit status of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
  /// Everything complied, or apply mode finished without errors.
  Success = 0,
  /// Check mode found problems, or apply mode could not fix every file.
  Failure = 1,
  /// The environment is misconfigured (tool missing, bad config).
  ConfigError = 2,
}

impl ExitStatus {
  pub const fn code(self) -> u8 {
    self as u8
  }
}

impl From<ExitStatus> for std::process::ExitCode {
  fn from(status: ExitStatus) -> Self {
    std::process::ExitCode::from(status.code())
  }
}

/// Accumulates outcomes while the walk runs.
#[derive(Debug, Clone)]
pub struct ScanReport {
  policy: PolicyKind,
  mode: Mode,
  files: Vec<FileReport>,
  missing_roots: Vec<String>,
  unreadable_dirs: Vec<UnreadableDir>,
}

impl ScanReport {
  pub const fn new(policy: PolicyKind, mode: Mode) -> Self {
    Self {
      policy,
      mode,
      files: Vec::new(),
      missing_roots: Vec::new(),
      unreadable_dirs: Vec::new(),
    }
  }

  pub const fn policy(&self) -> PolicyKind {
    self.policy
  }

  pub const fn mode(&self) -> Mode {
    self.mode
  }

  pub fn files(&self) -> &[FileReport] {
    &self.files
  }

  pub fn missing_roots(&self) -> &[String] {
    &self.missing_roots
  }

  pub fn unreadable_dirs(&self) -> &[UnreadableDir] {
    &self.unreadable_dirs
  }

  /// Records the outcome for one discovered file.
  pub fn record(&mut self, path: &str, outcome: &ScanOutcome) {
    self.files.push(FileReport::from_outcome(path, outcome));
  }

  pub fn warn_missing_root(&mut self, root: &str) {
    self.missing_roots.push(root.to_string());
  }

  /// Records a directory whose files were never evaluated.
  pub fn record_unreadable(&mut self, path: &str, message: &str) {
    self.unreadable_dirs.push(UnreadableDir {
      path: path.to_string(),
      message: message.to_string(),
    });
  }

  /// Files with the given status, in discovery order.
  pub fn with_status(&self, status: FileStatus) -> impl Iterator<Item = &FileReport> {
    self.files.iter().filter(move |f| f.status == status)
  }

  pub fn summary(&self, processing_time: Duration) -> ProcessingSummary {
    let mut summary = ProcessingSummary::from_reports(&self.files, self.missing_roots.len(), processing_time);
    summary.unreadable_dirs = self.unreadable_dirs.len();
    summary.errors += summary.unreadable_dirs;
    summary
  }

  /// Exit status for this scan.
  ///
  /// Check mode fails when any processed file is non-compliant or erred.
  /// Apply mode fails only when a file could not be evaluated or its fix could
  /// not be persisted. In both modes a directory that could not be listed is
  /// an error.
  pub fn exit_status(&self) -> ExitStatus {
    let summary = self.summary(Duration::ZERO);
    let failed = match self.mode {
      Mode::Check => summary.outstanding() > 0,
      Mode::Apply => summary.errors > 0,
    };

    if failed {
      ExitStatus::Failure
    } else {
      ExitStatus::Success
    }
  }
}

/// Totals over a whole scan.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
  /// Files handed to a policy, whatever the result
  pub processed: usize,
  /// Files excluded as third party
  pub skipped: usize,
  pub compliant: usize,
  pub fixed: usize,
  pub non_compliant: usize,
  /// Files that erred, plus directories that could not be listed
  pub errors: usize,
  /// Configured roots that did not exist
  pub missing_roots: usize,
  /// Directories below a root that could not be listed
  pub unreadable_dirs: usize,
  #[serde(skip_serializing)]
  pub processing_time: Duration,
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  /// Timestamp when the summary was produced
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<i64>,
}

impl ProcessingSummary {
  pub fn new(processing_time: Duration) -> Self {
    Self {
      processed: 0,
      skipped: 0,
      compliant: 0,
      fixed: 0,
      non_compliant: 0,
      errors: 0,
      missing_roots: 0,
      unreadable_dirs: 0,
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      timestamp: Some(Local::now().timestamp()),
    }
  }

  pub fn from_reports(files: &[FileReport], missing_roots: usize, processing_time: Duration) -> Self {
    let mut summary = Self::new(processing_time);
    summary.missing_roots = missing_roots;

    for file in files {
      if file.status == FileStatus::Excluded {
        summary.skipped += 1;
        continue;
      }

      summary.processed += 1;
      match file.status {
        FileStatus::Compliant => summary.compliant += 1,
        FileStatus::Fixed => summary.fixed += 1,
        FileStatus::NonCompliant => summary.non_compliant += 1,
        FileStatus::Error => summary.errors += 1,
        FileStatus::Excluded => {}
      }
    }

    summary
  }

  /// Problems left after the scan: non-compliant files, files whose
  /// evaluation or fix failed, and directories that could not be listed.
  pub const fn outstanding(&self) -> usize {
    self.non_compliant + self.errors
  }

  /// Files that erred, without the directories that could not be listed.
  pub const fn file_errors(&self) -> usize {
    self.errors - self.unreadable_dirs
  }
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  /// JSON format for machine readability
  Json,
  /// CSV format for spreadsheet compatibility
  Csv,
}

impl std::fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ReportFormat::Json => write!(f, "JSON"),
      ReportFormat::Csv => write!(f, "CSV"),
    }
  }
}

/// Writes a finished [`ScanReport`] to disk.
pub struct ReportGenerator<'a> {
  format: ReportFormat,
  output_path: &'a Path,
}

impl<'a> ReportGenerator<'a> {
  pub const fn new(format: ReportFormat, output_path: &'a Path) -> Self {
    Self { format, output_path }
  }

  pub fn generate(&self, report: &ScanReport, summary: &ProcessingSummary) -> Result<()> {
    let content = match self.format {
      ReportFormat::Json => generate_json(report, summary)?,
      ReportFormat::Csv => generate_csv(report, summary),
    };

    fs::write(self.output_path, content)
      .with_context(|| format!("Failed to write report to {}", self.output_path.display()))
  }
}

fn generate_json(report: &ScanReport, summary: &ProcessingSummary) -> Result<String> {
  let document = serde_json::json!({
    "policy": report.policy().to_string(),
    "mode": report.mode().to_string(),
    "generated_at": Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    "summary": summary,
    "missing_roots": report.missing_roots(),
    "unreadable_dirs": report.unreadable_dirs(),
    "files": report.files(),
  });

  Ok(serde_json::to_string_pretty(&document)?)
}

fn generate_csv(report: &ScanReport, summary: &ProcessingSummary) -> String {
  let mut csv = String::from("file_path,status,detail\n");

  for file in report.files() {
    let detail = file
      .detail
      .as_deref()
      .map(|d| d.replace(',', "%2C").replace('\n', " "))
      .unwrap_or_default();
    csv.push_str(&format!("{},{},{}\n", file.path.replace(',', "%2C"), file.status, detail));
  }

  csv.push_str("\n# Summary\n");
  csv.push_str(&format!("Policy,{}\n", report.policy()));
  csv.push_str(&format!("Mode,{}\n", report.mode()));
  csv.push_str(&format!("Files processed,{}\n", summary.processed));
  csv.push_str(&format!("Files skipped,{}\n", summary.skipped));
  csv.push_str(&format!("Files compliant,{}\n", summary.compliant));
  csv.push_str(&format!("Files fixed,{}\n", summary.fixed));
  csv.push_str(&format!("Files non-compliant,{}\n", summary.non_compliant));
  csv.push_str(&format!("Errors,{}\n", summary.errors));
  csv.push_str(&format!("Unreadable directories,{}\n", summary.unreadable_dirs));
  csv.push_str(&format!(
    "Processing time (seconds),{:.2}\n",
    summary.processing_time.as_secs_f64()
  ));
  csv
}
