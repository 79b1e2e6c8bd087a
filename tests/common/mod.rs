#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

/// Header every fixture expects. Matches the `[header]` table written by
/// [`write_config`].
pub const HEADER: &str = "/*\n * Copyright (C) 2025 Test Owner\n * This file is part of demo.\n */\n";

/// Stand-in for `clang-format`.
///
/// * `--dry-run -Werror FILE` fails when FILE contains `BAD`
/// * `FILE` prints the file with every `BAD` replaced by `GOOD`
/// * a file containing `SYNTAX` is rejected in both modes with status 3
pub const FAKE_FORMATTER: &str = r#"#!/bin/sh
if [ "$1" = "--dry-run" ]; then
  file="$3"
  if grep -q SYNTAX "$file"; then
    echo "$file:1:1: error: expected ';' after expression" >&2
    exit 3
  fi
  if grep -q BAD "$file"; then
    echo "$file:1:1: error: code should be clang-formatted [-Wclang-format-violations]" >&2
    exit 1
  fi
  exit 0
fi
file="$1"
if grep -q SYNTAX "$file"; then
  echo "$file:1:1: error: expected ';' after expression" >&2
  exit 3
fi
sed 's/BAD/GOOD/g' "$file"
"#;

/// Writes `content` to `relative` under `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(&path, content)?;
  Ok(path)
}

/// Writes the fake formatter script and returns its path.
pub fn write_fake_formatter(dir: &Path) -> Result<PathBuf> {
  write_file(dir, "fake-clang-format.sh", FAKE_FORMATTER)
}

/// Writes a `.srcguard.toml` that scans `roots`, excludes `exclude`, pins the
/// header and runs the fake formatter through `sh`.
pub fn write_config(root: &Path, formatter: &Path, roots: &[&str], exclude: &[&str]) -> Result<PathBuf> {
  let quoted = |items: &[&str]| {
    items
      .iter()
      .map(|item| format!("\"{item}\""))
      .collect::<Vec<_>>()
      .join(", ")
  };

  let config = format!(
    r#"[scan]
roots = [{roots}]
exclude = [{exclude}]

[header]
template = '''
/*
 * Copyright (C) {{{{year}}}} {{{{owner}}}}
 * This file is part of {{{{project}}}}.
 */
'''
year = "2025"
owner = "Test Owner"
project = "demo"

[format]
command = "sh"
args = ['{formatter}']
"#,
    roots = quoted(roots),
    exclude = quoted(exclude),
    formatter = formatter.display()
  );
  write_file(root, ".srcguard.toml", &config)
}

/// The tree used by the end-to-end scenarios:
///
/// * `src/a.c` - no header, clean formatting
/// * `src/b.h` - header present, bad formatting
/// * `src/third_party/x.c` - excluded, no header and bad formatting
pub fn scenario_a() -> Result<TempDir> {
  let temp_dir = TempDir::new()?;
  let root = temp_dir.path();

  write_file(root, "src/a.c", "int a(void) { return 0; }\n")?;
  write_file(root, "src/b.h", &format!("{HEADER}\n\nint BAD;\n"))?;
  write_file(root, "src/third_party/x.c", "int BAD;\n")?;

  let formatter = write_fake_formatter(root)?;
  write_config(root, &formatter, &["src"], &["src/third_party/"])?;

  Ok(temp_dir)
}
