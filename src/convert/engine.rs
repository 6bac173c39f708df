//! Batch conversion
//!
//! Documents are independent: each is parsed, converted and (with `apply`)
//! written on its own, in parallel with rayon. A document that fails is reported
//! and left untouched; it never stops the rest of the batch.

use super::document::{ConvertedDocument, DocumentOutcome, convert_document, lines_changed};
use crate::core::context::ProjectContext;
use crate::core::error::{ConvertError, ConvertResult, ResultExt};
use crate::core::plan::{ConversionPlan, Operation, content_digest};
use crate::rewrite::ConverterKind;
use crate::ui::progress::DocumentProgress;
use crate::utils::{path_to_slash_format, relative_display};
use log::{info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// How a batch runs
#[derive(Debug, Clone)]
pub struct ConvertOptions {
  /// Converters to run, in order
  pub converters: Vec<ConverterKind>,
  /// Write rewritten documents back to disk
  pub apply: bool,
  /// Convert on all cores
  pub parallel: bool,
  /// Draw a progress bar
  pub show_progress: bool,
}

/// A finished batch: the plan plus every document's outcome, sorted by path
#[derive(Debug)]
pub struct BatchOutcome {
  pub plan: ConversionPlan,
  pub documents: Vec<ConvertedDocument>,
}

impl BatchOutcome {
  pub fn failed(&self) -> usize {
    self
      .documents
      .iter()
      .filter(|d| matches!(d.outcome, DocumentOutcome::Failed(_)))
      .count()
  }
}

/// Convert `paths` and build the plan; with `apply`, also write the rewrites
pub fn convert_batch(ctx: &ProjectContext, paths: &[PathBuf], options: &ConvertOptions) -> BatchOutcome {
  info!(
    "converting {} document(s) with {:?} (apply={}, parallel={})",
    paths.len(),
    options.converters,
    options.apply,
    options.parallel
  );

  let progress = (options.show_progress && paths.len() > 1)
    .then(|| DocumentProgress::new(paths.len(), format!("Converting {} documents", paths.len())));

  let process = |path: &PathBuf| {
    let mut doc = convert_document(path, relative_display(ctx.project_root(), path), &options.converters);
    if options.apply {
      apply_document(&mut doc);
    }
    if let Some(p) = &progress {
      p.inc();
    }
    doc
  };

  let mut documents: Vec<ConvertedDocument> = if options.parallel {
    paths.par_iter().map(process).collect()
  } else {
    paths.iter().map(process).collect()
  };
  documents.sort_by(|a, b| a.relative.cmp(&b.relative));

  for doc in &documents {
    if let DocumentOutcome::Failed(e) = &doc.outcome {
      warn!("{}: {}", doc.relative, e);
    }
  }

  let mut plan = ConversionPlan::new(
    path_to_slash_format(ctx.project_root()),
    options.converters.clone(),
  );
  plan.set_documents_scanned(documents.len());
  plan.add_operations(documents.iter().filter_map(operation_for));
  if options.apply {
    plan.mark_applied();
  }

  info!(
    "plan {}: {} rewrite(s), {} failure(s)",
    plan.metadata.id,
    plan.rewrites().count(),
    plan.failures().count()
  );

  BatchOutcome { plan, documents }
}

/// Write a rewritten document; a failed write turns the outcome into a failure
fn apply_document(doc: &mut ConvertedDocument) {
  let DocumentOutcome::Rewritten { text, .. } = &doc.outcome else {
    return;
  };
  if let Err(e) = write_atomically(&doc.path, text) {
    doc.outcome = DocumentOutcome::Failed(e);
  }
}

/// Write through a sibling temp file and rename, so a document is either fully
/// rewritten or untouched
fn write_atomically(path: &Path, text: &str) -> ConvertResult<()> {
  let mut temp = path.as_os_str().to_owned();
  temp.push(".xunit-convert.tmp");
  let temp = PathBuf::from(temp);

  fs::write(&temp, text).with_context(|| format!("Failed to write {}", temp.display()))?;
  if let Err(e) = fs::rename(&temp, path) {
    let _ = fs::remove_file(&temp);
    return Err(ConvertError::from(e).context(format!("Failed to replace {}", path.display())));
  }
  Ok(())
}

fn operation_for(doc: &ConvertedDocument) -> Option<Operation> {
  match &doc.outcome {
    DocumentOutcome::Unchanged => None,
    DocumentOutcome::Rewritten { text, converters } => Some(Operation::Rewrite {
      path: doc.relative.clone(),
      converters: converters.clone(),
      lines_changed: lines_changed(&doc.original, text),
      before: content_digest(&doc.original),
      after: content_digest(text),
    }),
    DocumentOutcome::Failed(e) => Some(Operation::Failed {
      path: doc.relative.clone(),
      error: e.to_string(),
    }),
  }
}
