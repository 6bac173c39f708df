//! Integration tests for `xunit-convert init`

use crate::helpers::{TestProject, stdout};
use anyhow::Result;

#[test]
fn test_init_writes_default_config() -> Result<()> {
  let project = TestProject::new()?;

  let output = project.run(&["init"])?;
  assert!(stdout(&output).contains("xunit-convert.toml"));

  let config = project.read_file("xunit-convert.toml")?;
  assert!(config.contains("[convert]"));
  assert!(config.contains("\"ignore-to-skip\""));
  assert!(config.contains("\"test-category-to-trait\""));

  // The written defaults must load cleanly
  project.write_file("MathTests.cs", "class C { }\n")?;
  project.run(&["convert"])?;

  Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("xunit-convert.toml", "# mine\n[convert]\n")?;

  let output = project.run_raw(&["init"])?;
  assert_eq!(output.status.code(), Some(1));
  assert_eq!(project.read_file("xunit-convert.toml")?, "# mine\n[convert]\n");

  Ok(())
}

#[test]
fn test_init_force_replaces_broken_config() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("xunit-convert.toml", "this is not toml [")?;

  project.run(&["init", "--force"])?;
  assert!(project.read_file("xunit-convert.toml")?.contains("[convert]"));

  Ok(())
}
