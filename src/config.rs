//! # Configuration Module
//!
//! This module provides configuration support for srcguard: which directories
//! are scanned, which file extensions are targeted, which third-party paths are
//! excluded, the license header to enforce and the formatter to delegate to.
//!
//! Configuration can be specified in a `.srcguard.toml` file in the project
//! root or via the `SRCGUARD_CONFIG` environment variable. Every field has a
//! default, so a project without a config file still gets a useful scan.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".srcguard.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "SRCGUARD_CONFIG";

/// Environment variable overriding the formatter binary.
pub const FORMATTER_ENV_VAR: &str = "CLANG_FORMAT_BIN";

/// Formatter resolved through `PATH` when nothing else is configured.
pub const DEFAULT_FORMATTER: &str = "clang-format";

const DEFAULT_EXTENSIONS: &[&str] = &["c", "h"];
const DEFAULT_HEADER_ROOTS: &[&str] = &["src", "tests"];
const DEFAULT_FORMAT_ROOTS: &[&str] = &["src", "include", "tests"];

/// Values the built-in header is rendered with when `[header]` leaves them
/// unset. Pinned so the rendered header never drifts between runs.
pub const DEFAULT_HEADER_YEAR: &str = "2025";
pub const DEFAULT_HEADER_OWNER: &str = "Karesis";
pub const DEFAULT_HEADER_PROJECT: &str = "libkx";

/// Built-in LGPL-3.0 header used when no template is configured.
pub const DEFAULT_HEADER_TEMPLATE: &str = "/*
 * Copyright (C) {{year}} {{owner}}
 *
 * This file is part of {{project}}.
 *
 * {{project}} is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Lesser General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * {{project}} is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */
";

/// Whether a scan only reports or also repairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Read-only evaluation; non-compliance is reported, not corrected.
  Check,
  /// Corrective evaluation; non-compliance triggers an in-place rewrite.
  Apply,
}

impl Mode {
  pub const fn from_check_flag(check: bool) -> Self {
    if check { Self::Check } else { Self::Apply }
  }

  pub const fn is_check(self) -> bool {
    matches!(self, Self::Check)
  }
}

impl std::fmt::Display for Mode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Check => write!(f, "check"),
      Self::Apply => write!(f, "apply"),
    }
  }
}

/// The two policies the scanner knows how to enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
  Header,
  Format,
}

impl std::fmt::Display for PolicyKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Header => write!(f, "header"),
      Self::Format => write!(f, "format"),
    }
  }
}

/// Immutable description of one scan, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
  /// Directories to walk, relative to the project root, in scan order.
  pub roots: Vec<String>,
  /// Target file suffixes without the leading dot (e.g. `c`, `h`).
  pub extensions: Vec<String>,
  /// Root-relative, forward-slash path prefixes that are never evaluated.
  pub excluded_prefixes: Vec<String>,
  pub mode: Mode,
}

impl ScanConfig {
  /// Builds a scan config from string slices. Mostly useful in tests.
  pub fn new(roots: &[&str], extensions: &[&str], excluded_prefixes: &[&str], mode: Mode) -> Self {
    Self {
      roots: roots.iter().map(|s| (*s).to_string()).collect(),
      extensions: extensions.iter().map(|s| (*s).to_string()).collect(),
      excluded_prefixes: excluded_prefixes.iter().map(|s| normalize_prefix(s)).collect(),
      mode,
    }
  }
}

/// `[scan]` table: settings shared by both policies.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
  #[serde(default)]
  pub roots: Option<Vec<String>>,
  #[serde(default)]
  pub extensions: Option<Vec<String>>,
  #[serde(default)]
  pub exclude: Vec<String>,
}

/// `[header]` table.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct HeaderSection {
  #[serde(default)]
  pub roots: Option<Vec<String>>,
  /// Inline template text. Takes precedence over `template-file`.
  #[serde(default)]
  pub template: Option<String>,
  /// Template file, relative to the project root.
  #[serde(default)]
  pub template_file: Option<PathBuf>,
  #[serde(default)]
  pub year: Option<String>,
  #[serde(default)]
  pub owner: Option<String>,
  #[serde(default)]
  pub project: Option<String>,
}

/// `[format]` table.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FormatSection {
  #[serde(default)]
  pub roots: Option<Vec<String>>,
  #[serde(default)]
  pub command: Option<String>,
  /// Extra arguments placed before every formatter invocation.
  #[serde(default)]
  pub args: Vec<String>,
}

/// Main configuration struct for srcguard.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
  #[serde(default)]
  pub scan: ScanSection,
  #[serde(default)]
  pub header: HeaderSection,
  #[serde(default)]
  pub format: FormatSection,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{}': {source}", path.display())]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{}': {source}", path.display())]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A field holds a value the scanner cannot use.
  #[error("Invalid value for '{field}': {message}")]
  Invalid { field: String, message: String },
}

/// The fixed text a compliant file must start with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTemplate(String);

impl HeaderTemplate {
  pub fn new(text: impl Into<String>) -> Self {
    Self(text.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Values substituted into `{{year}}`, `{{owner}}` and `{{project}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderData {
  pub year: String,
  pub owner: String,
  pub project: String,
}

impl HeaderData {
  pub fn render(&self, template: &str) -> HeaderTemplate {
    HeaderTemplate::new(
      template
        .replace("{{year}}", &self.year)
        .replace("{{owner}}", &self.owner)
        .replace("{{project}}", &self.project),
    )
  }
}

impl Config {
  /// Load configuration from a file.
  ///
  /// # Arguments
  ///
  /// * `path` - Path to the configuration file
  ///
  /// # Returns
  ///
  /// The loaded configuration, or an error if the file cannot be read or
  /// parsed.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    Ok(config.normalize())
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - Extensions are non-empty and don't include the leading dot
  /// - Roots are non-empty strings
  /// - Exclusion prefixes are non-empty
  fn validate(&self) -> Result<(), ConfigError> {
    if let Some(ref extensions) = self.scan.extensions {
      for ext in extensions {
        if ext.is_empty() {
          return Err(invalid("scan.extensions", "extension cannot be empty"));
        }
        if ext.starts_with('.') {
          return Err(invalid(
            "scan.extensions",
            format!("extension '{ext}' should not include leading dot"),
          ));
        }
      }
    }

    let root_lists = [
      ("scan.roots", &self.scan.roots),
      ("header.roots", &self.header.roots),
      ("format.roots", &self.format.roots),
    ];
    for (field, roots) in root_lists {
      if let Some(roots) = roots
        && roots.iter().any(|r| r.trim().is_empty())
      {
        return Err(invalid(field, "root directory cannot be empty"));
      }
    }

    if self.scan.exclude.iter().any(|p| normalize_prefix(p).is_empty()) {
      return Err(invalid("scan.exclude", "exclusion prefix cannot be empty"));
    }

    if let Some(ref command) = self.format.command
      && command.trim().is_empty()
    {
      return Err(invalid("format.command", "command cannot be empty"));
    }

    Ok(())
  }

  /// Rewrite exclusion prefixes into the root-relative forward-slash form the
  /// classifier compares against.
  fn normalize(mut self) -> Self {
    self.scan.exclude = self.scan.exclude.iter().map(|p| normalize_prefix(p)).collect();
    self
  }

  /// Builds the immutable scan description for one policy run.
  pub fn scan_config(&self, policy: PolicyKind, mode: Mode) -> ScanConfig {
    let (policy_roots, default_roots) = match policy {
      PolicyKind::Header => (&self.header.roots, DEFAULT_HEADER_ROOTS),
      PolicyKind::Format => (&self.format.roots, DEFAULT_FORMAT_ROOTS),
    };

    let roots = policy_roots
      .clone()
      .or_else(|| self.scan.roots.clone())
      .unwrap_or_else(|| default_roots.iter().map(|s| (*s).to_string()).collect());

    let extensions = self
      .scan
      .extensions
      .clone()
      .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_string()).collect());

    ScanConfig {
      roots,
      extensions,
      excluded_prefixes: self.scan.exclude.clone(),
      mode,
    }
  }

  /// Resolves and renders the license header template.
  ///
  /// The inline `template` wins over `template-file`; with neither set the
  /// built-in LGPL header is used. Unset `year`, `owner` and `project` take
  /// the pinned defaults, so the result never depends on the clock or on the
  /// directory name.
  pub fn header_template(&self, project_root: &Path) -> Result<HeaderTemplate> {
    let raw = if let Some(ref inline) = self.header.template {
      inline.clone()
    } else if let Some(ref file) = self.header.template_file {
      let path = if file.is_absolute() {
        file.clone()
      } else {
        project_root.join(file)
      };
      std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read header template file: {}", path.display()))?
    } else {
      DEFAULT_HEADER_TEMPLATE.to_string()
    };

    let data = HeaderData {
      year: self.header.year.as_deref().unwrap_or(DEFAULT_HEADER_YEAR).to_string(),
      owner: self.header.owner.as_deref().unwrap_or(DEFAULT_HEADER_OWNER).to_string(),
      project: self.header.project.as_deref().unwrap_or(DEFAULT_HEADER_PROJECT).to_string(),
    };

    verbose_log!("Rendering header template with year: {}", data.year);

    let template = data.render(&raw);
    if template.as_str().is_empty() {
      anyhow::bail!("Header template is empty");
    }
    Ok(template)
  }

  /// The formatter program plus extra arguments.
  ///
  /// `CLANG_FORMAT_BIN` overrides `[format].command`, which overrides the
  /// default `clang-format` looked up on `PATH`.
  pub fn formatter_command(&self) -> (String, Vec<String>) {
    let program = std::env::var(FORMATTER_ENV_VAR)
      .ok()
      .filter(|v| !v.trim().is_empty())
      .or_else(|| self.format.command.clone())
      .unwrap_or_else(|| DEFAULT_FORMATTER.to_string());

    (program, self.format.args.clone())
  }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
  ConfigError::Invalid {
    field: field.to_string(),
    message: message.into(),
  }
}

/// Forward slashes, no leading `./`.
pub fn normalize_prefix(prefix: &str) -> String {
  let mut normalized = prefix.trim().replace('\\', "/");
  while let Some(rest) = normalized.strip_prefix("./") {
    normalized = rest.to_string();
  }
  normalized
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `SRCGUARD_CONFIG` environment variable
/// 3. `.srcguard.toml` in the project root
pub fn discover_config_path(explicit_path: Option<&Path>, project_root: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    verbose_log!("Using explicit config path: {}", path.display());
    return Some(path.to_path_buf());
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let project_config = project_root.join(DEFAULT_CONFIG_FILENAME);
  if project_config.is_file() {
    verbose_log!("Using project config: {}", project_config.display());
    return Some(project_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path, or return the defaults.
///
/// An explicit `--config` path that does not exist is an error; a missing
/// default config file is not.
pub fn load_config(explicit_path: Option<&Path>, project_root: &Path, no_config: bool) -> Result<Config> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(Config::default());
  }

  match discover_config_path(explicit_path, project_root) {
    Some(path) => {
      Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))
    }
    None => Ok(Config::default()),
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_parse_valid_config() {
    let config_content = concat!(
      "[scan]\n",
      "roots = [\"src\", \"tests\"]\n",
      "extensions = [\"c\", \"h\"]\n",
      "exclude = [\"src/std/hash/xxhash.h\"]\n",
      "\n",
      "[header]\n",
      "year = \"2025\"\n",
      "owner = \"Karesis\"\n",
      "template-file = \"LICENSE_HEADER\"\n",
      "\n",
      "[format]\n",
      "roots = [\"src\", \"include\"]\n",
      "args = [\"--style=file\"]\n",
    );

    let config: Config = toml::from_str(config_content).expect("valid config should parse");

    assert_eq!(config.scan.exclude, vec!["src/std/hash/xxhash.h".to_string()]);
    assert_eq!(config.header.year.as_deref(), Some("2025"));
    assert_eq!(config.header.template_file, Some(PathBuf::from("LICENSE_HEADER")));
    assert_eq!(config.format.args, vec!["--style=file".to_string()]);
  }

  #[test]
  fn test_parse_empty_config() {
    let config: Config = toml::from_str("").expect("empty config should parse");
    assert_eq!(config, Config::default());
  }

  #[test]
  fn test_unknown_key_rejected() {
    let result: Result<Config, _> = toml::from_str("[scan]\nrootz = [\"src\"]\n");
    assert!(result.is_err());
  }

  #[test]
  fn test_validate_leading_dot_extension() {
    let config = Config {
      scan: ScanSection {
        extensions: Some(vec![".c".to_string()]),
        ..ScanSection::default()
      },
      ..Config::default()
    };

    let err = config.validate().expect_err("should fail");
    assert!(matches!(err, ConfigError::Invalid { .. }));
  }

  #[test]
  fn test_validate_empty_root() {
    let config = Config {
      format: FormatSection {
        roots: Some(vec!["src".to_string(), " ".to_string()]),
        ..FormatSection::default()
      },
      ..Config::default()
    };

    assert!(config.validate().is_err());
  }

  #[test]
  fn test_scan_config_defaults() {
    let config = Config::default();

    let header = config.scan_config(PolicyKind::Header, Mode::Check);
    assert_eq!(header.roots, vec!["src", "tests"]);
    assert_eq!(header.extensions, vec!["c", "h"]);
    assert!(header.excluded_prefixes.is_empty());
    assert_eq!(header.mode, Mode::Check);

    let format = config.scan_config(PolicyKind::Format, Mode::Apply);
    assert_eq!(format.roots, vec!["src", "include", "tests"]);
  }

  #[test]
  fn test_scan_config_policy_roots_override_shared_roots() {
    let config = Config {
      scan: ScanSection {
        roots: Some(vec!["lib".to_string()]),
        ..ScanSection::default()
      },
      format: FormatSection {
        roots: Some(vec!["include".to_string()]),
        ..FormatSection::default()
      },
      ..Config::default()
    };

    assert_eq!(config.scan_config(PolicyKind::Header, Mode::Check).roots, vec!["lib"]);
    assert_eq!(config.scan_config(PolicyKind::Format, Mode::Check).roots, vec!["include"]);
  }

  #[test]
  fn test_load_normalizes_exclusions() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(
      &config_path,
      "[scan]\nexclude = [\"./third_party/\", \"src\\\\vendor\"]\n",
    )
    .expect("write config");

    let config = Config::load(&config_path).expect("load should succeed");
    assert_eq!(config.scan.exclude, vec!["third_party/", "src/vendor"]);
  }

  #[test]
  fn test_load_config_file_not_found() {
    let result = Config::load(Path::new("/nonexistent/path/.srcguard.toml"));
    assert!(matches!(result.expect_err("should fail"), ConfigError::ReadError { .. }));
  }

  #[test]
  fn test_load_config_missing_default_is_ok() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config = load_config(None, temp_dir.path(), false).expect("defaults");
    assert_eq!(config, Config::default());
  }

  #[test]
  fn test_load_config_missing_explicit_is_error() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let missing = temp_dir.path().join("nope.toml");
    assert!(load_config(Some(&missing), temp_dir.path(), false).is_err());
  }

  #[test]
  fn test_no_config_skips_discovery() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILENAME), "not = [valid").expect("write config");

    let config = load_config(None, temp_dir.path(), true).expect("no-config ignores the file");
    assert_eq!(config, Config::default());
  }

  #[test]
  fn test_header_template_inline_substitution() {
    let config = Config {
      header: HeaderSection {
        template: Some("// (C) {{year}} {{owner}} - {{project}}\n".to_string()),
        year: Some("2025".to_string()),
        owner: Some("Karesis".to_string()),
        project: Some("libkx".to_string()),
        ..HeaderSection::default()
      },
      ..Config::default()
    };

    let template = config.header_template(Path::new("/tmp")).expect("render");
    assert_eq!(template.as_str(), "// (C) 2025 Karesis - libkx\n");
  }

  #[test]
  fn test_header_template_from_file() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join("HEADER"), "/* {{year}} */\n").expect("write template");

    let config = Config {
      header: HeaderSection {
        template_file: Some(PathBuf::from("HEADER")),
        year: Some("1999".to_string()),
        ..HeaderSection::default()
      },
      ..Config::default()
    };

    let template = config.header_template(temp_dir.path()).expect("render");
    assert_eq!(template.as_str(), "/* 1999 */\n");
  }

  #[test]
  fn test_header_template_default_is_lgpl() {
    let config = Config {
      header: HeaderSection {
        year: Some("2025".to_string()),
        owner: Some("Karesis".to_string()),
        project: Some("libkx".to_string()),
        ..HeaderSection::default()
      },
      ..Config::default()
    };

    let template = config.header_template(Path::new("/tmp")).expect("render");
    assert!(template.as_str().starts_with("/*\n * Copyright (C) 2025 Karesis\n"));
    assert!(template.as_str().contains("This file is part of libkx."));
    assert!(template.as_str().ends_with(" */\n"));
  }

  #[test]
  fn test_header_template_defaults_are_pinned() {
    let config = Config::default();

    let first = config.header_template(Path::new("/work/some-checkout")).expect("render");
    let second = config.header_template(Path::new("/elsewhere")).expect("render");

    assert!(first.as_str().starts_with("/*\n * Copyright (C) 2025 Karesis\n *\n"));
    assert!(first.as_str().contains("This file is part of libkx."));
    assert_eq!(first, second);
  }

  #[test]
  fn test_normalize_prefix() {
    assert_eq!(normalize_prefix("./src/x.c"), "src/x.c");
    assert_eq!(normalize_prefix("src\\std\\x.h"), "src/std/x.h");
    assert_eq!(normalize_prefix("third_party/"), "third_party/");
  }

  #[test]
  fn test_mode_from_check_flag() {
    assert_eq!(Mode::from_check_flag(true), Mode::Check);
    assert_eq!(Mode::from_check_flag(false), Mode::Apply);
    assert!(Mode::Check.is_check());
  }
}
