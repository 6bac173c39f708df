//! Convert command implementation

use crate::convert::{BatchOutcome, ConvertOptions, DocumentFilter, convert_batch, discover};
use crate::core::context::ProjectContext;
use crate::core::error::{ConvertError, ConvertResult};
use crate::rewrite::ConverterKind;
use std::path::PathBuf;

/// Run the convert command
///
/// Dry-run by default: prints the plan and writes nothing. `--apply` writes the
/// rewritten documents; `--strict` exits non-zero when anything would change.
pub fn run_convert(
  ctx: &ProjectContext,
  paths: Vec<PathBuf>,
  only: Vec<ConverterKind>,
  apply: bool,
  json: bool,
  diff: bool,
  strict: bool,
) -> ConvertResult<()> {
  let settings = &ctx.config.convert;
  let converters = select_converters(&settings.converters, &only);
  if converters.is_empty() {
    return Err(ConvertError::with_help(
      "None of the --only converters are enabled in the configuration",
      "Add them to `converters` under [convert], or drop --only",
    ));
  }

  let targets = if paths.is_empty() { vec![ctx.root.clone()] } else { paths };
  let filter = DocumentFilter::from_settings(settings)?;
  let documents = discover(ctx.project_root(), &targets, &filter)?;

  if documents.is_empty() && !json {
    println!("✅ No C# documents found");
    return Ok(());
  }

  if !json {
    if apply {
      println!("🚀 APPLY MODE - Converting {} document(s)\n", documents.len());
    } else {
      println!("🔍 Dry-run mode (no changes applied)\n");
    }
  }

  let options = ConvertOptions {
    converters,
    apply,
    parallel: settings.parallel,
    show_progress: !json,
  };
  let outcome = convert_batch(ctx, &documents, &options);

  if json {
    println!("{}", outcome.plan.to_json()?);
  } else {
    if diff {
      print_diffs(&outcome);
    }
    println!("{}", outcome.plan.to_human_readable());
  }

  if outcome.plan.has_failures() {
    return Err(ConvertError::Batch {
      failed: outcome.failed(),
      total: outcome.documents.len(),
    });
  }

  // Exit with error in strict mode if documents still need converting
  if strict && !apply && outcome.plan.has_changes() {
    if !json {
      eprintln!("⚠️  {} document(s) need converting (--strict)", outcome.plan.rewrites().count());
    }
    std::process::exit(1);
  }

  Ok(())
}

/// Configured converters, narrowed to `only` when given; configuration order wins
fn select_converters(configured: &[ConverterKind], only: &[ConverterKind]) -> Vec<ConverterKind> {
  configured
    .iter()
    .copied()
    .filter(|c| only.is_empty() || only.contains(c))
    .collect()
}

fn print_diffs(outcome: &BatchOutcome) {
  for doc in &outcome.documents {
    if let Some(diff) = doc.unified_diff() {
      print!("{}", diff);
      println!();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_select_converters() {
    let all = ConverterKind::ALL.to_vec();
    assert_eq!(select_converters(&all, &[]), all);
    assert_eq!(
      select_converters(&all, &[ConverterKind::TestCategoryToTrait]),
      vec![ConverterKind::TestCategoryToTrait]
    );
    assert!(select_converters(&[ConverterKind::IgnoreToSkip], &[ConverterKind::TestCategoryToTrait]).is_empty());

    let reversed = vec![ConverterKind::TestCategoryToTrait, ConverterKind::IgnoreToSkip];
    assert_eq!(select_converters(&reversed, &ConverterKind::ALL), reversed);
  }
}
