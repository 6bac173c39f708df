//! Converters command: list the pipeline

use crate::core::context::ProjectContext;
use crate::core::error::ConvertResult;
use crate::rewrite::ConverterKind;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ConverterInfo {
  name: &'static str,
  description: &'static str,
  enabled: bool,
}

/// Run the converters command
pub fn run_converters(ctx: &ProjectContext, json: bool) -> ConvertResult<()> {
  let enabled = &ctx.config.convert.converters;
  let infos: Vec<ConverterInfo> = ConverterKind::ALL
    .iter()
    .map(|c| ConverterInfo {
      name: c.name(),
      description: c.description(),
      enabled: enabled.contains(c),
    })
    .collect();

  if json {
    println!("{}", serde_json::to_string_pretty(&infos)?);
    return Ok(());
  }

  println!("🔧 Converters (run in configured order):\n");
  for info in &infos {
    let mark = if info.enabled { "✅" } else { "⏸️ " };
    println!("{} {}", mark, info.name);
    println!("   {}\n", info.description);
  }

  match &ctx.config.source {
    Some(path) => println!("Configuration: {}", path.display()),
    None => println!("Configuration: built-in defaults (run `xunit-convert init` to customize)"),
  }

  Ok(())
}
