//! # Logging Module
//!
//! Two channels exist side by side:
//! - Scan output (progress, per-file lines, summary) controlled by the global
//!   output mode and the [`verbose_log!`] / [`info_log!`] macros
//! - Diagnostic tracing through the `tracing` crate, set up by
//!   [`init_tracing`] and filtered with `RUST_LOG`
//!
//! ## Example
//!
//! ```rust
//! use srcguard::logging::{ColorMode, set_verbose};
//! use srcguard::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Never.apply();
//!
//! // Goes to stderr, only in verbose mode
//! verbose_log!("Skipping third-party file: {}", "src/vendor/lib.c");
//!
//! // Goes to stdout unless quiet
//! info_log!("Diff written to {}", "changes.diff");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Logs a message to stderr if verbose mode is enabled.
///
/// Uses the same format string syntax as [`eprintln!`].
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Logs a message to stdout unless quiet mode is enabled.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if !$crate::logging::is_quiet() {
            $crate::logging::print_info_log(&format!($($arg)*));
        }
    };
}

/// Used by [`info_log!`]; prints `message` in yellow when colors are on.
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}
