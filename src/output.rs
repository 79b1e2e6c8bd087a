//! # Output Module
//!
//! This module centralizes all user-facing output for srcguard: the banner,
//! per-root progress, one line per file that needs attention, and the final
//! totals and verdict.
//!
//! Progress and results go to stdout; per-file errors go to stderr. With
//! `--quiet` only the paths of offending files are printed, one per line, so
//! the output can be piped.

use owo_colors::{OwoColorize, Stream};

use crate::config::{Mode, PolicyKind};
use crate::logging::{is_quiet, is_verbose};
use crate::policy::ScanOutcome;
use crate::report::ProcessingSummary;

/// Symbols used in output
pub mod symbols {
  /// Success
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Warning
  pub const WARNING: &str = "!";
}

/// Print the `--- srcguard <policy> ---` banner and the mode line.
pub fn print_banner(policy: PolicyKind, mode: Mode) {
  if is_quiet() {
    return;
  }

  println!("--- srcguard {policy} ---");
  let mode_line = match mode {
    Mode::Check => "Mode: check (read-only)",
    Mode::Apply => "Mode: apply",
  };
  println!("{mode_line}");
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

pub fn print_scanning(path: &std::path::Path) {
  if is_quiet() {
    return;
  }
  println!();
  println!("Scanning {}...", path.display());
}

/// Warn that a configured root is missing. Shown even in quiet mode.
pub fn print_missing_root(root: &str) {
  let line = format!(
    "{} directory '{}' does not exist, skipping",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    root
  );
  eprintln!("{line}");
}

pub fn print_unreadable(path: &std::path::Path, message: &str) {
  eprintln!(
    "{} cannot list {}: {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    path.display(),
    message
  );
}

pub fn print_no_target_files() {
  if is_quiet() {
    return;
  }
  println!("  (no target files found)");
}

/// Tag shown in front of a file for the given outcome.
///
/// Returns `None` for outcomes that are only shown in verbose mode.
pub const fn outcome_tag(policy: PolicyKind, outcome: &ScanOutcome) -> Option<&'static str> {
  match (outcome, policy) {
    (ScanOutcome::NonCompliant { .. }, PolicyKind::Header) => Some("[MISSING]"),
    (ScanOutcome::NonCompliant { .. }, PolicyKind::Format) => Some("[BAD FORMAT]"),
    (ScanOutcome::Fixed, PolicyKind::Header) => Some("[APPLYING]"),
    (ScanOutcome::Fixed, PolicyKind::Format) => Some("[FORMATTED]"),
    (ScanOutcome::Error(_), _) => Some("[ERROR]"),
    (ScanOutcome::Compliant | ScanOutcome::Excluded, _) => None,
  }
}

/// Print the per-file progress line for `outcome`.
pub fn print_file_outcome(policy: PolicyKind, relative: &str, outcome: &ScanOutcome) {
  if let ScanOutcome::Error(e) = outcome {
    eprintln!(
      "  {} {}",
      "[ERROR]".if_supports_color(Stream::Stderr, |s| s.red()),
      e
    );
    return;
  }

  if is_quiet() {
    if matches!(outcome, ScanOutcome::NonCompliant { .. }) {
      println!("{relative}");
    }
    return;
  }

  match outcome_tag(policy, outcome) {
    Some(tag) => {
      let colored = match outcome {
        ScanOutcome::Fixed => tag.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
        _ => tag.if_supports_color(Stream::Stdout, |s| s.red()).to_string(),
      };
      println!("  {colored} {relative}");
    }
    None if is_verbose() => {
      let label = match outcome {
        ScanOutcome::Excluded => "[SKIPPED]",
        _ => "[OK]",
      };
      println!("  {} {relative}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()));
    }
    None => {}
  }

  if let ScanOutcome::NonCompliant {
    diagnostics: Some(diagnostics),
  } = outcome
  {
    for line in diagnostics.lines() {
      println!("    {line}");
    }
  }
}

/// Print the totals and the verdict line.
pub fn print_summary(policy: PolicyKind, mode: Mode, summary: &ProcessingSummary) {
  if is_quiet() {
    return;
  }

  println!();
  println!("--- scan complete ---");
  println!("Files processed: {}", summary.processed);
  println!("Files skipped: {} (third party)", summary.skipped);
  if mode == Mode::Apply {
    println!("Files fixed: {}", summary.fixed);
  }
  if summary.errors > 0 {
    println!(
      "Errors: {}",
      summary.errors.if_supports_color(Stream::Stdout, |s| s.red())
    );
  }
  if is_verbose() {
    println!("Elapsed: {:.2}s", summary.processing_time.as_secs_f64());
  }

  let (problem, verdict) = match policy {
    PolicyKind::Header => ("missing the license header", "carry the license header"),
    PolicyKind::Format => ("not formatted correctly", "are formatted correctly"),
  };

  if summary.unreadable_dirs > 0 {
    println!(
      "{} {} {} could not be listed.",
      symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
      summary.unreadable_dirs,
      if summary.unreadable_dirs == 1 { "directory" } else { "directories" }
    );
  }

  let outstanding_files = summary.non_compliant + summary.file_errors();
  match mode {
    Mode::Check if outstanding_files > 0 => {
      println!(
        "{} FAILED: {} {} {}.",
        symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
        outstanding_files,
        if outstanding_files == 1 { "file is" } else { "files are" },
        problem
      );
    }
    Mode::Apply if summary.file_errors() > 0 => {
      println!(
        "{} {} {} could not be fixed.",
        symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
        summary.file_errors(),
        if summary.file_errors() == 1 { "file" } else { "files" }
      );
    }
    _ if summary.unreadable_dirs > 0 => {}
    Mode::Apply if summary.fixed > 0 => {
      println!(
        "{} OK: fixed {} {}.",
        symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
        summary.fixed,
        if summary.fixed == 1 { "file" } else { "files" }
      );
    }
    _ => {
      println!(
        "{} OK: all processed files {}.",
        symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
        verdict
      );
    }
  }
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}
