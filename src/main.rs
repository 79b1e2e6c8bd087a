//! # srcguard
//!
//! Enforces license headers and canonical formatting across a C source tree.

use std::process::ExitCode;

use owo_colors::{OwoColorize, Stream};
use srcguard::cli::Cli;
use srcguard::report::ExitStatus;

fn main() -> ExitCode {
  let cli = Cli::parse_args();

  match cli.run() {
    Ok(status) => status.into(),
    Err(e) => {
      eprintln!("{} {e:#}", "ERROR:".if_supports_color(Stream::Stderr, |s| s.red()));
      ExitStatus::ConfigError.into()
    }
  }
}
