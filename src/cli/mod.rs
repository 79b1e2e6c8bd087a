//! # CLI Module
//!
//! This module contains the command-line interface implementation. Each
//! policy is a subcommand sharing the same [`ScanArgs`].

mod scan;

use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand};
pub use scan::{ScanArgs, run_scan};

use crate::config::PolicyKind;
use crate::report::ExitStatus;

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Verify every C file carries the license header (CI)
  srcguard header --check

  # Prepend the header to files missing it
  srcguard header

  # Verify formatting and show what would change
  srcguard format --check --show-diff

  # Reformat in place with a specific clang-format
  CLANG_FORMAT_BIN=clang-format-18 srcguard format

  # Write a machine-readable report
  srcguard format --check --report-json format-report.json
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Ensure every source file starts with the license header
  Header(ScanArgs),
  /// Ensure every source file matches the formatter's canonical output
  Format(ScanArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Runs the selected subcommand.
  ///
  /// # Errors
  ///
  /// Returns an error for fatal conditions: invalid configuration, an
  /// unreadable header template or a missing formatter.
  pub fn run(self) -> anyhow::Result<ExitStatus> {
    match self.command {
      Command::Header(args) => run_scan(PolicyKind::Header, args),
      Command::Format(args) => run_scan(PolicyKind::Format, args),
    }
  }
}
