//! Integration tests for `xunit-convert converters`

use crate::helpers::{TestProject, stdout};
use anyhow::Result;

#[test]
fn test_lists_converters() -> Result<()> {
  let project = TestProject::new()?;

  let output = project.run(&["converters"])?;
  let out = stdout(&output);

  assert!(out.contains("ignore-to-skip"));
  assert!(out.contains("test-category-to-trait"));
  assert!(out.contains("built-in defaults"));

  Ok(())
}

#[test]
fn test_json_reflects_config() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("xunit-convert.toml", "[convert]\nconverters = [\"test-category-to-trait\"]\n")?;

  let output = project.run(&["converters", "--json"])?;
  let list: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  let list = list.as_array().expect("converter array");

  assert_eq!(list.len(), 2);
  assert_eq!(list[0]["name"], "ignore-to-skip");
  assert_eq!(list[0]["enabled"], false);
  assert_eq!(list[1]["enabled"], true);

  Ok(())
}
