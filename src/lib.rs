//! # srcguard
//!
//! A compliance scanner for C source trees. It walks a fixed set of root
//! directories, skips third-party code under configured path prefixes, and
//! enforces one policy per run:
//!
//! * **header** - every `.c`/`.h` file starts with the mandated license header
//! * **format** - every `.c`/`.h` file equals `clang-format`'s canonical output
//!
//! Each policy runs in check mode (read-only, for CI) or apply mode (fixes
//! files in place). Process exit codes are `0` for success, `1` when files are
//! non-compliant or could not be fixed and `2` for a broken environment.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use srcguard::config::{Config, Mode, PolicyKind};
//! use srcguard::policy::HeaderPolicy;
//! use srcguard::processor::Processor;
//! use srcguard::report::ScanReport;
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = PathBuf::from(".");
//!     let config = Config::default();
//!     let policy = HeaderPolicy::new(config.header_template(&root)?);
//!
//!     let processor = Processor::new(
//!         config.scan_config(PolicyKind::Header, Mode::Check),
//!         root,
//!         Box::new(policy),
//!     );
//!
//!     let mut report = ScanReport::new(PolicyKind::Header, Mode::Check);
//!     processor.process(&mut report)?;
//!
//!     println!("exit status: {:?}", report.exit_status());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - Walks the roots and drives a policy over each file
//! * [`policy`] - The header and format policies
//! * [`config`] - Scan configuration and the `.srcguard.toml` file
//! * [`report`] - Totals, exit status and report files

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod file_filter;
pub mod formatter;
pub mod git;
pub mod logging;
pub mod output;
pub mod policy;
pub mod processor;
pub mod report;
pub mod workspace;
