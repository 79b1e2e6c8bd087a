use std::sync::Once;
use std::sync::atomic::{AtomicU8, Ordering};

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Global atomic value holding the current [`OutputMode`].
///
/// Starts as `Normal` until [`set_quiet`] or [`set_verbose`] is called.
static OUTPUT_MODE: AtomicU8 = AtomicU8::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
  Normal = 0,
  Quiet = 1,
  Verbose = 2,
}

impl OutputMode {
  const fn from_u8(value: u8) -> Self {
    match value {
      1 => OutputMode::Quiet,
      2 => OutputMode::Verbose,
      _ => OutputMode::Normal,
    }
  }
}

/// Enum representing the color mode options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
  /// Use colors when the stream is a terminal
  #[default]
  Auto,
  /// Never use colors
  Never,
  /// Always use colors
  Always,
}

impl ColorMode {
  /// Applies this mode to every `if_supports_color` call in the process.
  pub fn apply(self) {
    match self {
      ColorMode::Auto => owo_colors::unset_override(),
      ColorMode::Never => owo_colors::set_override(false),
      ColorMode::Always => owo_colors::set_override(true),
    }
  }
}

/// Sets up the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level follows the command-line
/// verbosity. Diagnostics go to stderr so stdout stays
/// reserved for scan output. Calling this more than once is harmless.
///
/// # Parameters
///
/// * `quiet` - Only errors are logged
/// * `verbose` - Number of `-v` flags given
pub fn init_tracing(quiet: bool, verbose: u8) {
  INIT.call_once(|| {
    let default_level = match (quiet, verbose) {
      (true, _) => "error",
      (false, 0) => "warn",
      (false, 1) => "info",
      (false, 2) => "debug",
      (false, _) => "trace",
    };

    let filter =
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("srcguard={default_level}")));

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .with_target(false)
      .try_init();
  });
}

/// Enables verbose progress output ([`verbose_log!`](crate::verbose_log) and
/// `[OK]` lines).
pub fn set_verbose() {
  OUTPUT_MODE.store(OutputMode::Verbose as u8, Ordering::SeqCst);
}

/// Suppresses everything except offending paths and errors.
pub fn set_quiet() {
  OUTPUT_MODE.store(OutputMode::Quiet as u8, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
  matches!(
    OutputMode::from_u8(OUTPUT_MODE.load(Ordering::SeqCst)),
    OutputMode::Verbose
  )
}

/// Checks if quiet mode is currently enabled.
pub fn is_quiet() -> bool {
  matches!(OutputMode::from_u8(OUTPUT_MODE.load(Ordering::SeqCst)), OutputMode::Quiet)
}
