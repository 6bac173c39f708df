//! Converting a single document
//!
//! A document is read, parsed, run through the converter pipeline and rendered
//! back to text. Nothing here writes to disk; the engine decides that.

use crate::core::error::{ConvertError, ConvertResult, ResultExt};
use crate::rewrite::{ConverterKind, Rewrite, run_pipeline};
use crate::syntax::parse;
use log::{Level, debug, log_enabled};
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What happened to one document
#[derive(Debug)]
pub enum DocumentOutcome {
  /// No converter found anything to do
  Unchanged,
  /// The converted text, and the converters that changed it
  Rewritten { text: String, converters: Vec<ConverterKind> },
  /// The document could not be read or converted; it is left as is
  Failed(ConvertError),
}

/// A document and its conversion outcome
#[derive(Debug)]
pub struct ConvertedDocument {
  pub path: PathBuf,
  /// Forward-slash path relative to the project root
  pub relative: String,
  /// Source text as read (empty when reading failed)
  pub original: String,
  pub outcome: DocumentOutcome,
}

impl ConvertedDocument {
  /// Unified diff of the rewrite, `None` unless the document changed
  pub fn unified_diff(&self) -> Option<String> {
    match &self.outcome {
      DocumentOutcome::Rewritten { text, .. } => Some(unified_diff(&self.relative, &self.original, text)),
      _ => None,
    }
  }
}

/// Convert source text; `Ok(None)` when the text is already converted or has
/// nothing to convert
pub fn convert_text(
  source: &str,
  converters: &[ConverterKind],
) -> Result<Option<(String, Vec<ConverterKind>)>, crate::rewrite::RewriteError> {
  let unit = Arc::new(parse(source));
  if log_enabled!(Level::Debug) {
    debug!("recognized {} class(es), {} method(s)", unit.classes().len(), unit.methods().len());
  }
  let (rewritten, applied) = run_pipeline(converters, &unit)?;
  Ok(match Rewrite::of(&unit, rewritten) {
    Rewrite::Unchanged => None,
    Rewrite::Replaced(tree) => Some((tree.to_string(), applied)),
  })
}

/// Read and convert one document; failures land in the outcome, never in `Err`
pub fn convert_document(path: &Path, relative: String, converters: &[ConverterKind]) -> ConvertedDocument {
  let original = match read_source(path) {
    Ok(text) => text,
    Err(e) => {
      return ConvertedDocument {
        path: path.to_path_buf(),
        relative,
        original: String::new(),
        outcome: DocumentOutcome::Failed(e),
      };
    }
  };

  let outcome = match convert_text(&original, converters) {
    Ok(None) => DocumentOutcome::Unchanged,
    Ok(Some((text, converters))) if text != original => {
      debug!("{}: rewritten by {:?}", relative, converters);
      DocumentOutcome::Rewritten { text, converters }
    }
    Ok(Some(_)) => DocumentOutcome::Unchanged,
    Err(source) => DocumentOutcome::Failed(ConvertError::Rewrite {
      path: PathBuf::from(&relative),
      source,
    }),
  };

  ConvertedDocument {
    path: path.to_path_buf(),
    relative,
    original,
    outcome,
  }
}

fn read_source(path: &Path) -> ConvertResult<String> {
  let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
  String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8", path.display()))
}

/// Number of lines removed plus lines added
pub fn lines_changed(before: &str, after: &str) -> usize {
  TextDiff::from_lines(before, after)
    .iter_all_changes()
    .filter(|change| change.tag() != ChangeTag::Equal)
    .count()
}

/// Unified diff with `a/` and `b/` headers, three lines of context
pub fn unified_diff(relative: &str, before: &str, after: &str) -> String {
  TextDiff::from_lines(before, after)
    .unified_diff()
    .context_radius(3)
    .header(&format!("a/{}", relative), &format!("b/{}", relative))
    .to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  const IGNORED: &str = "class C\n{\n    [Ignore]\n    [Fact]\n    public void M() { }\n}\n";
  const SKIPPED: &str = "class C\n{\n    [Fact(Skip=\"Ignored in MSTest\")]\n    public void M() { }\n}\n";

  #[test]
  fn test_convert_text() {
    let (text, applied) = convert_text(IGNORED, &ConverterKind::ALL).unwrap().unwrap();
    assert_eq!(text, SKIPPED);
    assert_eq!(applied, vec![ConverterKind::IgnoreToSkip]);
    assert!(convert_text(SKIPPED, &ConverterKind::ALL).unwrap().is_none());
  }

  #[test]
  fn test_convert_text_respects_converter_selection() {
    let source = "class C { [Ignore] [TestCategory(\"x\")] void M() {} }";
    let (text, _) = convert_text(source, &[ConverterKind::TestCategoryToTrait]).unwrap().unwrap();
    assert_eq!(text, "class C { [Ignore] [Trait(\"Category\", \"x\")] void M() {} }");
  }

  #[test]
  fn test_convert_document_outcomes() {
    let dir = TempDir::new().unwrap();
    let changed = dir.path().join("Changed.cs");
    let clean = dir.path().join("Clean.cs");
    let broken = dir.path().join("Broken.cs");
    fs::write(&changed, IGNORED).unwrap();
    fs::write(&clean, SKIPPED).unwrap();
    fs::write(&broken, "class C { [TestCategory] void M() {} }").unwrap();

    let doc = convert_document(&changed, "Changed.cs".to_string(), &ConverterKind::ALL);
    assert!(matches!(doc.outcome, DocumentOutcome::Rewritten { .. }));
    assert_eq!(doc.original, IGNORED);

    let doc = convert_document(&clean, "Clean.cs".to_string(), &ConverterKind::ALL);
    assert!(matches!(doc.outcome, DocumentOutcome::Unchanged));
    assert!(doc.unified_diff().is_none());

    let doc = convert_document(&broken, "Broken.cs".to_string(), &ConverterKind::ALL);
    match doc.outcome {
      DocumentOutcome::Failed(ConvertError::Rewrite { path, .. }) => assert_eq!(path, PathBuf::from("Broken.cs")),
      other => panic!("expected rewrite failure, got {:?}", other),
    }
  }

  #[test]
  fn test_unreadable_document_fails() {
    let dir = TempDir::new().unwrap();
    let binary = dir.path().join("Binary.cs");
    fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();

    let doc = convert_document(&binary, "Binary.cs".to_string(), &ConverterKind::ALL);
    assert!(matches!(doc.outcome, DocumentOutcome::Failed(_)));

    let doc = convert_document(&dir.path().join("Missing.cs"), "Missing.cs".to_string(), &ConverterKind::ALL);
    assert!(matches!(doc.outcome, DocumentOutcome::Failed(_)));
  }

  #[test]
  fn test_diff_helpers() {
    assert_eq!(lines_changed(IGNORED, SKIPPED), 3);
    let diff = unified_diff("Tests/C.cs", IGNORED, SKIPPED);
    assert!(diff.starts_with("--- a/Tests/C.cs\n+++ b/Tests/C.cs\n"));
    assert!(diff.contains("-    [Ignore]\n"));
    assert!(diff.contains("+    [Fact(Skip=\"Ignored in MSTest\")]\n"));
  }
}
