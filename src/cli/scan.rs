//! # Scan Command
//!
//! Shared implementation of the `header` and `format` subcommands: resolve the
//! project root, load configuration, build the policy, walk, then summarize.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::config::{Mode, PolicyKind, load_config};
use crate::diff::DiffManager;
use crate::formatter::ClangFormat;
use crate::info_log;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{print_banner, print_blank_line, print_hint, print_summary};
use crate::policy::{FormatPolicy, HeaderPolicy, Policy};
use crate::processor::Processor;
use crate::report::{ExitStatus, ReportFormat, ReportGenerator, ScanReport};
use crate::workspace::resolve_workspace;

/// Arguments shared by every policy subcommand
#[derive(Args, Debug, Default)]
pub struct ScanArgs {
  /// Check mode: report non-compliant files without modifying anything
  /// (default: fix files in place)
  #[arg(long)]
  pub check: bool,

  /// Project root (default: tool directory, config location, git root or
  /// current directory)
  #[arg(long, value_name = "DIR")]
  pub root: Option<PathBuf>,

  /// Path to config file (default: .srcguard.toml in the project root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long, conflicts_with = "config")]
  pub no_config: bool,

  /// Show a diff of the changes a fix would make (check mode)
  #[arg(long)]
  pub show_diff: bool,

  /// Save the diff of the changes a fix would make to a file (check mode)
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// Generate a JSON report and save it to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Generate a CSV report and save it to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_csv: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Only print offending paths and errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

/// Run one policy with the given arguments and return the exit status.
///
/// # Errors
///
/// Returns an error when the scan cannot start or had to stop: an invalid
/// config file, an unreadable header template, an unusable diff file or a
/// missing formatter.
pub fn run_scan(policy_kind: PolicyKind, args: ScanArgs) -> Result<ExitStatus> {
  // Initialize tracing subscriber for structured logging
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let workspace = resolve_workspace(args.root.as_deref())?;
  let project_root = workspace.into_root();

  let config = load_config(args.config.as_deref(), &project_root, args.no_config)?;
  let mode = Mode::from_check_flag(args.check);
  let scan_config = config.scan_config(policy_kind, mode);
  debug!(
    "Scanning roots {:?} for extensions {:?}, excluding {:?}",
    scan_config.roots, scan_config.extensions, scan_config.excluded_prefixes
  );

  let diff_manager = DiffManager::new(args.show_diff, args.save_diff.clone());
  diff_manager.init()?;

  let policy: Box<dyn Policy> = match policy_kind {
    PolicyKind::Header => {
      let template = config.header_template(&project_root)?;
      Box::new(HeaderPolicy::new(template).with_diff_manager(diff_manager))
    }
    PolicyKind::Format => {
      let (program, extra_args) = config.formatter_command();
      debug!("Using formatter: {}", program);
      let formatter = ClangFormat::new(program.clone(), extra_args);
      Box::new(FormatPolicy::new(formatter, program).with_diff_manager(diff_manager))
    }
  };

  print_banner(policy_kind, mode);

  let processor = Processor::new(scan_config, project_root, policy);
  let mut report = ScanReport::new(policy_kind, mode);

  let start_time = Instant::now();
  processor.process(&mut report)?;
  let summary = report.summary(start_time.elapsed());

  print_summary(policy_kind, mode, &summary);

  if mode.is_check() && summary.non_compliant > 0 {
    print_blank_line();
    print_hint("Run without --check to fix.");
  }

  if mode.is_check()
    && let Some(ref path) = args.save_diff
  {
    info_log!("Saved diff to {}", path.display());
  }

  let requested_reports = [
    (ReportFormat::Json, args.report_json.as_ref()),
    (ReportFormat::Csv, args.report_csv.as_ref()),
  ];
  for (format, output_path) in requested_reports {
    let Some(output_path) = output_path else {
      continue;
    };
    let report_generator = ReportGenerator::new(format, output_path);
    if let Err(e) = report_generator.generate(&report, &summary) {
      eprintln!("Error generating {format} report: {e:#}");
    } else {
      info_log!("Generated {} report at {}", format, output_path.display());
    }
  }

  Ok(report.exit_status())
}
