//! Integration tests for `xunit-convert convert`

use crate::helpers::{ALREADY_XUNIT, IGNORED_METHOD, IGNORED_METHOD_CONVERTED, TestProject, stderr, stdout};
use anyhow::Result;

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("tests/MathTests.cs", IGNORED_METHOD)?;

  let output = project.run(&["convert"])?;
  let out = stdout(&output);

  assert!(out.contains("Dry-run"), "expected dry-run banner, got: {}", out);
  assert!(out.contains("tests/MathTests.cs"), "expected document in plan, got: {}", out);
  assert_eq!(project.read_file("tests/MathTests.cs")?, IGNORED_METHOD);

  Ok(())
}

#[test]
fn test_apply_rewrites_documents() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("tests/MathTests.cs", IGNORED_METHOD)?;
  project.write_file("tests/Done.cs", ALREADY_XUNIT)?;

  project.run(&["convert", "--apply"])?;

  assert_eq!(project.read_file("tests/MathTests.cs")?, IGNORED_METHOD_CONVERTED);
  assert_eq!(project.read_file("tests/Done.cs")?, ALREADY_XUNIT);
  assert!(!project.file_exists("tests/MathTests.cs.xunit-convert.tmp"));

  Ok(())
}

#[test]
fn test_apply_twice_is_stable() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("MathTests.cs", IGNORED_METHOD)?;

  project.run(&["convert", "--apply"])?;
  let first = project.read_file("MathTests.cs")?;

  let output = project.run(&["convert", "--apply"])?;
  assert_eq!(project.read_file("MathTests.cs")?, first);
  assert!(stdout(&output).contains("Nothing to convert"));

  Ok(())
}

#[test]
fn test_only_limits_converters() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("MathTests.cs", IGNORED_METHOD)?;

  project.run(&["convert", "--apply", "--only", "test-category-to-trait"])?;
  let text = project.read_file("MathTests.cs")?;

  assert!(text.contains("[Trait(\"Category\", \"Slow\")]"));
  assert!(text.contains("[Ignore]"), "Ignore must survive when its converter is off");

  Ok(())
}

#[test]
fn test_explicit_path() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("a/One.cs", IGNORED_METHOD)?;
  project.write_file("b/Two.cs", IGNORED_METHOD)?;

  project.run(&["convert", "--apply", "a"])?;

  assert_eq!(project.read_file("a/One.cs")?, IGNORED_METHOD_CONVERTED);
  assert_eq!(project.read_file("b/Two.cs")?, IGNORED_METHOD);

  Ok(())
}

#[test]
fn test_missing_path_is_user_error() -> Result<()> {
  let project = TestProject::new()?;

  let output = project.run_raw(&["convert", "nowhere"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Path not found"));

  Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("MathTests.cs", IGNORED_METHOD)?;
  project.write_file("Done.cs", ALREADY_XUNIT)?;

  let output = project.run(&["convert", "--json"])?;
  let plan: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  assert_eq!(plan["metadata"]["documents_scanned"], 2);
  assert_eq!(plan["metadata"]["applied"], false);
  let operations = plan["operations"].as_array().expect("operations array");
  assert_eq!(operations.len(), 1);
  assert_eq!(operations[0]["path"], "MathTests.cs");

  Ok(())
}

#[test]
fn test_diff_output() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("MathTests.cs", IGNORED_METHOD)?;

  let output = project.run(&["convert", "--diff"])?;
  let out = stdout(&output);

  assert!(out.contains("--- a/MathTests.cs"));
  assert!(out.contains("+++ b/MathTests.cs"));
  assert!(out.contains("-        [Ignore]"));
  assert!(out.contains("+        [Fact(Skip=\"Ignored in MSTest\")]"));

  Ok(())
}

#[test]
fn test_strict_fails_when_changes_pending() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("MathTests.cs", IGNORED_METHOD)?;

  let output = project.run_raw(&["convert", "--strict"])?;
  assert_eq!(output.status.code(), Some(1));

  project.run(&["convert", "--apply"])?;
  project.run(&["convert", "--strict"])?;

  Ok(())
}

#[test]
fn test_malformed_document_is_isolated() -> Result<()> {
  let project = TestProject::new()?;
  let broken = "class C\n{\n    [TestCategory(\"a\", \"b\")]\n    public void M() { }\n}\n";
  project.write_file("Broken.cs", broken)?;
  project.write_file("MathTests.cs", IGNORED_METHOD)?;

  let output = project.run_raw(&["convert", "--apply"])?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stdout(&output).contains("Broken.cs"));
  assert_eq!(project.read_file("Broken.cs")?, broken);
  assert_eq!(project.read_file("MathTests.cs")?, IGNORED_METHOD_CONVERTED);

  Ok(())
}

#[test]
fn test_config_excludes_and_converters() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file(
    "xunit-convert.toml",
    r#"[convert]
converters = ["ignore-to-skip"]
exclude = ["legacy/**"]
"#,
  )?;
  project.write_file("MathTests.cs", IGNORED_METHOD)?;
  project.write_file("legacy/Old.cs", IGNORED_METHOD)?;

  project.run(&["convert", "--apply"])?;

  let text = project.read_file("MathTests.cs")?;
  assert!(text.contains("[Fact(Skip=\"Ignored in MSTest\")]"));
  assert!(text.contains("[TestCategory(\"Slow\")]"));
  assert_eq!(project.read_file("legacy/Old.cs")?, IGNORED_METHOD);

  Ok(())
}

#[test]
fn test_invalid_config_is_reported() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("xunit-convert.toml", "[convert]\nconverters = []\n")?;

  let output = project.run_raw(&["convert"])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}
