//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A throwaway C# project on disk
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create an empty project directory
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Write a file relative to the project root, creating parent directories
  pub fn write_file(&self, path: &str, content: &str) -> Result<PathBuf> {
    let file_path = self.path.join(path);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&file_path, content)?;
    Ok(file_path)
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Run the CLI in the project root, expecting success
  pub fn run(&self, args: &[&str]) -> Result<Output> {
    run_xunit_convert(&self.path, args)
  }

  /// Run the CLI in the project root, returning the output whatever the status
  pub fn run_raw(&self, args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_xunit-convert"))
      .current_dir(&self.path)
      .args(args)
      .output()
      .context("Failed to run xunit-convert")
  }
}

/// Run xunit-convert CLI command
pub fn run_xunit_convert(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_xunit-convert");

  let output = Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run xunit-convert")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "xunit-convert command failed: xunit-convert {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}

/// A test class with an ignored method and a category
pub const IGNORED_METHOD: &str = r#"using Xunit;

namespace Sample.Tests
{
    public class MathTests
    {
        [Fact]
        [Ignore]
        public void Adds() { }

        [Fact]
        [TestCategory("Slow")]
        public void Multiplies() { }
    }
}
"#;

pub const IGNORED_METHOD_CONVERTED: &str = r#"using Xunit;

namespace Sample.Tests
{
    public class MathTests
    {
        [Fact(Skip="Ignored in MSTest")]
        public void Adds() { }

        [Fact]
        [Trait("Category", "Slow")]
        public void Multiplies() { }
    }
}
"#;

/// Nothing for any converter to do
pub const ALREADY_XUNIT: &str = r#"public class Done
{
    [Fact]
    public void Works() { }
}
"#;
