//! Conversion plans: what a run will change, before it changes anything
//!
//! Every `convert` run produces a `ConversionPlan`, enabling:
//!
//! - **Dry-run mode**: show which documents would be rewritten without writing them
//! - **Idempotency**: same sources and converters give the same plan id
//! - **Auditability**: plans are JSON-serializable for CI logs and review
//!
//! # Architecture
//!
//! ```text
//! commands/convert.rs
//!   ↓
//! convert::engine (parse + rewrite every document)
//!   ↓
//! ConversionPlan (what changed, what failed)
//!   ↓
//! --apply: write the changed documents
//! ```

use crate::core::error::ConvertResult;
use crate::rewrite::ConverterKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Plan identifier (SHA256 hash of plan contents)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanId(String);

impl PlanId {
  /// Create a plan ID from plan contents
  pub fn from_contents(contents: &[u8]) -> Self {
    Self(sha256_hex(contents))
  }

  /// Get the short ID (first 12 characters)
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for PlanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

fn sha256_hex(contents: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(contents);
  format!("{:x}", hasher.finalize())
}

/// SHA256 of a document's text, used to pin the before/after state in a plan
pub fn content_digest(text: &str) -> String {
  sha256_hex(text.as_bytes())
}

/// One document-level entry in a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
  /// Replace a document with its converted text
  Rewrite {
    path: String,
    converters: Vec<ConverterKind>,
    lines_changed: usize,
    before: String,
    after: String,
  },

  /// A document that could not be converted; it is never written
  Failed { path: String, error: String },
}

impl Operation {
  pub fn path(&self) -> &str {
    match self {
      Operation::Rewrite { path, .. } | Operation::Failed { path, .. } => path,
    }
  }
}

/// Plan metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMetadata {
  /// Plan ID (content hash of the operations)
  pub id: PlanId,

  /// When the plan was built
  pub created_at: DateTime<Utc>,

  /// Project root the paths are relative to
  pub root: String,

  /// Converters that ran, in order
  pub converters: Vec<ConverterKind>,

  /// Documents parsed, changed or not
  pub documents_scanned: usize,

  /// Whether the rewrites have been written to disk
  pub applied: bool,
}

/// The outcome of converting a set of documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionPlan {
  /// Plan metadata
  pub metadata: PlanMetadata,

  /// Per-document operations, sorted by path
  pub operations: Vec<Operation>,
}

impl ConversionPlan {
  /// Create a new plan
  pub fn new(root: impl Into<String>, converters: Vec<ConverterKind>) -> Self {
    Self {
      metadata: PlanMetadata {
        id: PlanId::from_contents(&[]),
        created_at: Utc::now(),
        root: root.into(),
        converters,
        documents_scanned: 0,
        applied: false,
      },
      operations: Vec::new(),
    }
  }

  /// Add operations, keeping them in path order
  pub fn add_operations(&mut self, operations: impl IntoIterator<Item = Operation>) {
    self.operations.extend(operations);
    self.operations.sort_by(|a, b| a.path().cmp(b.path()));
    self.recompute_id();
  }

  pub fn set_documents_scanned(&mut self, count: usize) {
    self.metadata.documents_scanned = count;
  }

  pub fn mark_applied(&mut self) {
    self.metadata.applied = true;
  }

  /// Recompute plan ID based on current contents
  fn recompute_id(&mut self) {
    let json = serde_json::to_vec(&self.operations).unwrap_or_default();
    self.metadata.id = PlanId::from_contents(&json);
  }

  /// Documents that will be (or were) rewritten
  pub fn rewrites(&self) -> impl Iterator<Item = &Operation> {
    self.operations.iter().filter(|op| matches!(op, Operation::Rewrite { .. }))
  }

  /// Documents that failed to convert
  pub fn failures(&self) -> impl Iterator<Item = &Operation> {
    self.operations.iter().filter(|op| matches!(op, Operation::Failed { .. }))
  }

  pub fn has_changes(&self) -> bool {
    self.rewrites().next().is_some()
  }

  pub fn has_failures(&self) -> bool {
    self.failures().next().is_some()
  }

  /// Serialize to JSON
  pub fn to_json(&self) -> ConvertResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Get human-readable representation
  pub fn to_human_readable(&self) -> String {
    let mut output = String::new();

    output.push_str(&format!("📋 Plan: convert ({})\n", self.metadata.id));
    output.push_str(&format!("   Root: {}\n", self.metadata.root));
    let converters: Vec<&str> = self.metadata.converters.iter().map(|c| c.name()).collect();
    output.push_str(&format!("   Converters: {}\n", converters.join(", ")));
    output.push_str(&format!("   Documents scanned: {}\n", self.metadata.documents_scanned));

    let rewrites: Vec<&Operation> = self.rewrites().collect();
    if rewrites.is_empty() {
      output.push_str("\n✅ Nothing to convert\n");
    } else {
      let verb = if self.metadata.applied { "Rewritten" } else { "To rewrite" };
      output.push_str(&format!("\n   {} ({}):\n", verb, rewrites.len()));
      for (i, op) in rewrites.iter().enumerate() {
        output.push_str(&format!("   {}. {}\n", i + 1, operation_to_string(op)));
      }
    }

    let failures: Vec<&Operation> = self.failures().collect();
    if !failures.is_empty() {
      output.push_str(&format!("\n❌ Failed ({}):\n", failures.len()));
      for op in failures {
        output.push_str(&format!("   - {}\n", operation_to_string(op)));
      }
    }

    if self.has_changes() && !self.metadata.applied {
      output.push_str("\n💡 Run with --apply to write these changes\n");
    }

    output
  }

  /// Get number of operations
  pub fn len(&self) -> usize {
    self.operations.len()
  }

  /// Check if plan is empty
  pub fn is_empty(&self) -> bool {
    self.operations.is_empty()
  }
}

/// Convert operation to human-readable string
fn operation_to_string(op: &Operation) -> String {
  match op {
    Operation::Rewrite {
      path,
      converters,
      lines_changed,
      ..
    } => {
      let names: Vec<&str> = converters.iter().map(|c| c.name()).collect();
      format!("{} ({} line(s); {})", path, lines_changed, names.join(", "))
    }
    Operation::Failed { path, error } => format!("{}: {}", path, error),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rewrite(path: &str) -> Operation {
    Operation::Rewrite {
      path: path.to_string(),
      converters: vec![ConverterKind::IgnoreToSkip],
      lines_changed: 2,
      before: content_digest("before"),
      after: content_digest("after"),
    }
  }

  #[test]
  fn test_plan_id_generation() {
    let mut plan = ConversionPlan::new("/src", ConverterKind::ALL.to_vec());
    let id1 = plan.metadata.id.clone();

    plan.add_operations(vec![rewrite("a.cs")]);
    let id2 = plan.metadata.id.clone();

    // ID should change when operations change
    assert_ne!(id1, id2);

    let mut same = ConversionPlan::new("/elsewhere", ConverterKind::ALL.to_vec());
    same.add_operations(vec![rewrite("a.cs")]);
    assert_eq!(same.metadata.id, id2);
    assert_eq!(id2.short().len(), 12);
  }

  #[test]
  fn test_operations_sorted_by_path() {
    let mut plan = ConversionPlan::new("/src", ConverterKind::ALL.to_vec());
    plan.add_operations(vec![
      rewrite("b.cs"),
      Operation::Failed {
        path: "a.cs".to_string(),
        error: "bad".to_string(),
      },
    ]);
    let paths: Vec<&str> = plan.operations.iter().map(Operation::path).collect();
    assert_eq!(paths, vec!["a.cs", "b.cs"]);
    assert!(plan.has_changes());
    assert!(plan.has_failures());
  }

  #[test]
  fn test_plan_serialization() {
    let mut plan = ConversionPlan::new("/src", ConverterKind::ALL.to_vec());
    plan.add_operations(vec![rewrite("a.cs")]);

    let json = plan.to_json().unwrap();
    assert!(json.contains("\"type\": \"rewrite\""));
    assert!(json.contains("\"ignore-to-skip\""));

    let deserialized: ConversionPlan = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.operations, plan.operations);
    assert_eq!(deserialized.metadata.id, plan.metadata.id);
  }

  #[test]
  fn test_human_readable_output() {
    let mut plan = ConversionPlan::new("/src", ConverterKind::ALL.to_vec());
    plan.set_documents_scanned(3);
    plan.add_operations(vec![
      rewrite("Tests/WidgetTests.cs"),
      Operation::Failed {
        path: "Tests/Broken.cs".to_string(),
        error: "malformed".to_string(),
      },
    ]);

    let output = plan.to_human_readable();
    assert!(output.contains("Documents scanned: 3"));
    assert!(output.contains("To rewrite (1)"));
    assert!(output.contains("Tests/WidgetTests.cs (2 line(s); ignore-to-skip)"));
    assert!(output.contains("Tests/Broken.cs: malformed"));
    assert!(output.contains("--apply"));

    plan.mark_applied();
    let output = plan.to_human_readable();
    assert!(output.contains("Rewritten (1)"));
    assert!(!output.contains("--apply"));
  }

  #[test]
  fn test_empty_plan() {
    let plan = ConversionPlan::new("/src", ConverterKind::ALL.to_vec());
    assert!(plan.is_empty());
    assert!(plan.to_human_readable().contains("Nothing to convert"));
  }
}
